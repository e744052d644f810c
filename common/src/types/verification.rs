/// Outcome of verifying a stream or entry record.
///
/// The checks run in a fixed order and the first mismatch wins: local hash,
/// local signature, then the anchored credential (revocation, hash,
/// signature and, for entries, index).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "camelCase")]
pub enum VerificationState {
    #[strum(serialize = "ok")]
    Ok,
    #[strum(serialize = "hashMismatch")]
    HashMismatch,
    #[strum(serialize = "signatureNotVerified")]
    SignatureNotVerified,
    #[strum(serialize = "credentialRevoked")]
    CredentialRevoked,
    #[strum(serialize = "immutableHashMismatch")]
    ImmutableHashMismatch,
    #[strum(serialize = "immutableSignatureMismatch")]
    ImmutableSignatureMismatch,
    #[strum(serialize = "indexMismatch")]
    IndexMismatch,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub state: VerificationState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Recomputed hash, reported on mismatching states.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Hash the record (or its anchored credential) claims.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_hash: Option<String>,
}

impl Verification {
    pub fn ok(id: impl Into<String>) -> Self {
        Self {
            state: VerificationState::Ok,
            id: Some(id.into()),
            hash: None,
            stored_hash: None,
        }
    }

    pub fn failed(state: VerificationState, id: impl Into<String>) -> Self {
        Self {
            state,
            id: Some(id.into()),
            hash: None,
            stored_hash: None,
        }
    }

    pub fn hash_mismatch(
        state: VerificationState,
        id: impl Into<String>,
        computed: impl Into<String>,
        stored: impl Into<String>,
    ) -> Self {
        Self {
            state,
            id: Some(id.into()),
            hash: Some(computed.into()),
            stored_hash: Some(stored.into()),
        }
    }
}
