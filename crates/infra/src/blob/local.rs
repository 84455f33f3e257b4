//! Local filesystem blob store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use orgdesk_core::{BlobStore, DomainError, DomainResult};

use super::{check_namespace, object_name};

/// Stores objects as `{root}/{namespace}/{uuid}.{ext}` and hands out
/// `{url_prefix}/{namespace}/{uuid}.{ext}` references.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, namespace: &str, file_name: Option<&str>, data: &[u8]) -> DomainResult<String> {
        check_namespace(namespace)?;

        let dir = self.root.join(namespace);
        fs::create_dir_all(&dir).await.map_err(io_error)?;

        let name = object_name(file_name);
        let path = dir.join(&name);
        // Write then rename so a reader never sees a partial file.
        let staging = dir.join(format!(".{name}.partial"));
        fs::write(&staging, data).await.map_err(io_error)?;
        commit_staged(&staging, &path).await?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "stored blob");
        Ok(format!("{}/{namespace}/{name}", self.url_prefix))
    }
}

/// Move a fully written staging file into place, removing it if the move fails.
async fn commit_staged(staging: &Path, path: &Path) -> DomainResult<()> {
    if let Err(err) = fs::rename(staging, path).await {
        if let Err(cleanup) = fs::remove_file(staging).await {
            tracing::warn!(error = %cleanup, path = %staging.display(), "failed to remove staging file");
        }
        return Err(io_error(err));
    }
    Ok(())
}

fn io_error(err: std::io::Error) -> DomainError {
    tracing::error!(error = %err, "blob store failure");
    DomainError::storage(format!("blob store: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_file_and_returns_reference() {
        let root = std::env::temp_dir().join(format!("orgdesk-blob-{}", uuid::Uuid::now_v7()));
        let store = LocalBlobStore::new(&root, "/uploads/");

        let reference = store.store("logos", Some("acme.png"), b"\x89PNG").await.unwrap();
        assert!(reference.starts_with("/uploads/logos/"));
        assert!(reference.ends_with(".png"));

        let file_name = reference.rsplit('/').next().unwrap();
        let on_disk = fs::read(root.join("logos").join(file_name)).await.unwrap();
        assert_eq!(on_disk, b"\x89PNG");

        let again = store.store("logos", Some("acme.png"), b"\x89PNG").await.unwrap();
        assert_ne!(again, reference);

        let _ = fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn failed_commit_leaves_no_staging_file() {
        let root = std::env::temp_dir().join(format!("orgdesk-blob-{}", uuid::Uuid::now_v7()));
        let staging = root.join(".logo.png.partial");
        let occupied = root.join("logo.png");
        fs::create_dir_all(occupied.join("inner")).await.unwrap();
        fs::write(&staging, b"\x89PNG").await.unwrap();

        let err = commit_staged(&staging, &occupied).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
        assert!(!fs::try_exists(&staging).await.unwrap());

        let _ = fs::remove_dir_all(&root).await;
    }
}
