use async_trait::async_trait;
use dashmap::DashMap;
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _};

use super::super::{VaultConnector, VaultError};

/// Vault holding Ed25519 keys in memory, generated on first signing use.
#[derive(Default)]
pub struct MemoryVaultConnector {
    keys: DashMap<String, SigningKey>,
}

impl MemoryVaultConnector {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VaultConnector for MemoryVaultConnector {
    async fn sign(&self, key_id: &str, data: &[u8]) -> Result<Vec<u8>, VaultError> {
        let key = self
            .keys
            .entry(key_id.to_owned())
            .or_insert_with(|| SigningKey::from_bytes(&rand::random()))
            .value()
            .clone();
        Ok(key.sign(data).to_bytes().to_vec())
    }

    async fn verify(
        &self,
        key_id: &str,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, VaultError> {
        let Some(key) = self.keys.get(key_id) else {
            return Err(VaultError::KeyNotFound(key_id.to_owned()));
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return Ok(false);
        };
        Ok(key.verifying_key().verify(data, &signature).is_ok())
    }
}
