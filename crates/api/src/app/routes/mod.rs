pub mod organisations;
pub mod system;
