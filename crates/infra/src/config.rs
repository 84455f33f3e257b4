//! Process configuration, loaded once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub use orgdesk_auth::{DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_UPLOAD_DIR: &str = "static/uploads";
pub const DEFAULT_UPLOAD_URL_PREFIX: &str = "/uploads";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub bind_addr: SocketAddr,
    /// Postgres connection string; `None` selects the in-memory directory.
    pub database_url: Option<String>,
    pub upload_dir: PathBuf,
    pub upload_url_prefix: String,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_secs = match get("TOKEN_TTL_SECS") {
            Some(raw) => {
                let secs: i64 = raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                    key: "TOKEN_TTL_SECS",
                    reason: e.to_string(),
                })?;
                if secs <= 0 {
                    return Err(ConfigError::Invalid {
                        key: "TOKEN_TTL_SECS",
                        reason: "must be positive".into(),
                    });
                }
                if secs > MAX_TOKEN_TTL_SECS {
                    return Err(ConfigError::Invalid {
                        key: "TOKEN_TTL_SECS",
                        reason: format!("must not exceed {MAX_TOKEN_TTL_SECS}"),
                    });
                }
                secs
            }
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let upload_url_prefix = get("UPLOAD_URL_PREFIX")
            .unwrap_or_else(|| DEFAULT_UPLOAD_URL_PREFIX.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            jwt_secret,
            token_ttl_secs,
            bind_addr,
            database_url: get("DATABASE_URL"),
            upload_dir: PathBuf::from(get("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string())),
            upload_url_prefix,
        })
    }
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("upload_dir", &self.upload_dir)
            .field("upload_url_prefix", &self.upload_url_prefix)
            .finish()
    }
}
