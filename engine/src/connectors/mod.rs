//! Contracts for the external backends the engine consumes.
//!
//! The engine is written entirely against these traits; `memory` provides
//! reference implementations used by the test suite and embedded callers.

pub mod memory;

use async_trait::async_trait;
use ais_common::types::conditions::{Condition, SortKey};
use serde_json::Value;

#[derive(Debug, Clone, thiserror::Error)]
pub enum VaultError {
    #[error("vault key `{0}` not found")]
    KeyNotFound(String),
    #[error("signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentityError {
    #[error("credential issuance failed: {0}")]
    Issuance(String),
    #[error("credential check failed: {0}")]
    Check(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ImmutableStorageError {
    #[error("immutable item `{0}` not found")]
    NotFound(String),
    #[error("immutable storage backend: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("bad cursor `{0}`")]
    Cursor(String),
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("store backend: {0}")]
    Backend(String),
}

/// Signs and verifies bytes under named keys held by an external vault.
#[async_trait]
pub trait VaultConnector: Send + Sync {
    /// Sign `data` with the key named `key_id`, creating the key when the
    /// vault provisions on demand.
    async fn sign(&self, key_id: &str, data: &[u8]) -> Result<Vec<u8>, VaultError>;

    /// Verify `signature` over `data` under the key named `key_id`.
    async fn verify(&self, key_id: &str, data: &[u8], signature: &[u8])
    -> Result<bool, VaultError>;
}

/// Result of checking an anchoring credential.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialCheck {
    pub revoked: bool,
    /// The credential's `credentialSubject` payload.
    pub subject: Value,
}

/// Issues and checks verifiable credentials through the identity backend.
#[async_trait]
pub trait IdentityConnector: Send + Sync {
    /// Issue a credential of `credential_type` over `subject`, asserted by
    /// `issuer` under `assertion_method_id`. Returns the credential JWT.
    async fn issue_credential(
        &self,
        issuer: &str,
        assertion_method_id: &str,
        credential_type: &str,
        subject: Value,
    ) -> Result<String, IdentityError>;

    /// Decode and check a credential JWT.
    async fn check_credential(&self, jwt: &str) -> Result<CredentialCheck, IdentityError>;
}

/// Stores opaque credential blobs in immutable storage.
#[async_trait]
pub trait ImmutableStorageConnector: Send + Sync {
    /// Persist `data` and return the backend's opaque identifier for it.
    async fn store(&self, data: Vec<u8>) -> Result<String, ImmutableStorageError>;

    async fn get(&self, id: &str) -> Result<Vec<u8>, ImmutableStorageError>;

    async fn remove(&self, id: &str) -> Result<(), ImmutableStorageError>;
}

/// One page of a store query, with an opaque cursor when more rows follow.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPage<T> {
    pub entities: Vec<T>,
    pub cursor: Option<String>,
}

/// Typed persistence of stream or entry records.
///
/// `query` evaluates the comparator conditions as a logical AND, orders by
/// the sort keys in sequence, and pages from `cursor`. The store owns the
/// cursor format; the engine treats it as opaque.
#[async_trait]
pub trait EntityStore<T>: Send + Sync {
    /// Insert the entity, replacing any record with the same `id`.
    async fn set(&self, entity: T) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<T>, StoreError>;

    async fn query(
        &self,
        conditions: &[Condition],
        sort: &[SortKey],
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<EntityPage<T>, StoreError>;
}
