use async_trait::async_trait;
use dashmap::DashMap;

use super::super::{ImmutableStorageConnector, ImmutableStorageError};

/// Immutable storage keeping credential blobs in a concurrent map.
#[derive(Default)]
pub struct MemoryImmutableStorage {
    items: DashMap<String, Vec<u8>>,
}

impl MemoryImmutableStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace a stored blob, bypassing the connector contract. Test hook
    /// for simulating external tampering.
    pub fn replace(&self, id: &str, data: Vec<u8>) {
        self.items.insert(id.to_owned(), data);
    }
}

#[async_trait]
impl ImmutableStorageConnector for MemoryImmutableStorage {
    async fn store(&self, data: Vec<u8>) -> Result<String, ImmutableStorageError> {
        let id = hex::encode(rand::random::<[u8; 32]>());
        self.items.insert(id.clone(), data);
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Vec<u8>, ImmutableStorageError> {
        self.items
            .get(id)
            .map(|item| item.clone())
            .ok_or_else(|| ImmutableStorageError::NotFound(id.to_owned()))
    }

    async fn remove(&self, id: &str) -> Result<(), ImmutableStorageError> {
        self.items
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ImmutableStorageError::NotFound(id.to_owned()))
    }
}
