use serde::{Deserialize, Serialize};

pub const DEFAULT_VAULT_KEY_ID: &str = "auditable-item-stream";

pub const DEFAULT_ASSERTION_METHOD_ID: &str = "auditable-item-stream";

/// Interval applied to streams created without an explicit override.
pub const DEFAULT_IMMUTABLE_INTERVAL: u32 = 10;

/// Page size applied to list reads when the caller supplies none.
pub const DEFAULT_PAGE_SIZE: usize = 40;

/// Process-wide engine settings, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamEngineConfig {
    /// Vault key the engine signs record hashes with.
    pub vault_key_id: String,
    /// Assertion method named when issuing anchoring credentials.
    pub assertion_method_id: String,
    /// Immutable interval for streams that do not override it.
    pub default_immutable_interval: u32,
}

impl Default for StreamEngineConfig {
    fn default() -> Self {
        Self {
            vault_key_id: DEFAULT_VAULT_KEY_ID.to_owned(),
            assertion_method_id: DEFAULT_ASSERTION_METHOD_ID.to_owned(),
            default_immutable_interval: DEFAULT_IMMUTABLE_INTERVAL,
        }
    }
}
