use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use orgdesk_core::{BlobStore, DomainError, DomainResult};

use super::{check_namespace, object_name};

/// In-memory blob store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, reference: &str) -> Option<Vec<u8>> {
        self.objects.lock().ok()?.get(reference).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn store(&self, namespace: &str, file_name: Option<&str>, data: &[u8]) -> DomainResult<String> {
        check_namespace(namespace)?;
        let reference = format!("memory://{namespace}/{}", object_name(file_name));
        self.objects
            .lock()
            .map_err(|_| DomainError::storage("blob store lock poisoned"))?
            .insert(reference.clone(), data.to_vec());
        Ok(reference)
    }
}
