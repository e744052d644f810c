use time::OffsetDateTime;

/// Credential subject type anchored for a stream record.
pub const STREAM_CREDENTIAL_TYPE: &str = "AuditableItemStreamCredential";

/// Credential subject type anchored for an entry record.
pub const ENTRY_CREDENTIAL_TYPE: &str = "AuditableItemStreamEntryCredential";

/// `credentialSubject` of the verifiable credential anchored when a stream
/// is created.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamCredential {
    #[serde(with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
    pub user_identity: String,
    pub hash: String,
    pub signature: String,
}

/// `credentialSubject` anchored for entries whose index lands on the
/// stream's immutable interval.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryCredential {
    #[serde(with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
    pub user_identity: String,
    pub hash: String,
    pub signature: String,
    pub index: u64,
}
