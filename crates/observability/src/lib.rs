//! Process-wide logging setup shared by binaries and test harnesses.

pub mod subscriber;

pub use subscriber::{LogFormat, LogFormatError};

/// Initialize structured logging from the environment.
///
/// `RUST_LOG` sets the filter (default `info`); `LOG_FORMAT` picks `json`
/// (default) or `pretty`. Safe to call more than once.
pub fn init() {
    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default();
    subscriber::init(format, "info");
}
