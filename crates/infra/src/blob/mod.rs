//! Blob storage adapters for uploaded files.

pub mod local;
pub mod memory;

pub use local::LocalBlobStore;
pub use memory::InMemoryBlobStore;

use orgdesk_core::{DomainError, DomainResult};

/// Namespaces are single path segments: lowercase ASCII, digits, `-`, `_`.
pub(crate) fn check_namespace(namespace: &str) -> DomainResult<()> {
    let valid = !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DomainError::validation(format!("invalid blob namespace '{namespace}'")))
    }
}

/// Keep the original extension if it is short and alphanumeric; drop it otherwise.
pub(crate) fn object_name(file_name: Option<&str>) -> String {
    let extension = file_name
        .and_then(|name| std::path::Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase());

    let stem = uuid::Uuid::now_v7().to_string();
    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}
