use enumset::{EnumSet, EnumSetType};
use serde_json::Value;
use time::OffsetDateTime;

use super::{
    conditions::{Condition, SortDirection},
    urn::{EntryUrn, RecordId},
    verification::Verification,
};

/// Persisted entry record.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    pub id: RecordId,
    pub stream_id: RecordId,
    #[serde(with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
    #[serde(
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_modified: Option<OffsetDateTime>,
    #[serde(
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_deleted: Option<OffsetDateTime>,
    pub user_identity: String,
    pub entry_object: Value,
    /// 0-based position assigned at creation; never reassigned.
    pub index: u64,
    pub hash: String,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutable_storage_id: Option<String>,
}

impl EntryRecord {
    /// Entity-store table this record lives in.
    pub const TABLE: &'static str = "auditable-item-stream-entry";

    pub fn urn(&self) -> EntryUrn {
        EntryUrn::new(self.stream_id, self.id)
    }

    pub fn is_deleted(&self) -> bool {
        self.date_deleted.is_some()
    }
}

/// Projectable entry properties; the entry `id` is always returned.
#[derive(EnumSetType, Debug, strum::Display, strum::EnumString)]
pub enum EntryField {
    #[strum(serialize = "dateCreated")]
    DateCreated,
    #[strum(serialize = "dateModified")]
    DateModified,
    #[strum(serialize = "dateDeleted")]
    DateDeleted,
    #[strum(serialize = "userIdentity")]
    UserIdentity,
    #[strum(serialize = "entryObject")]
    EntryObject,
    #[strum(serialize = "index")]
    Index,
    #[strum(serialize = "hash")]
    Hash,
    #[strum(serialize = "signature")]
    Signature,
    #[strum(serialize = "immutableStorageId")]
    ImmutableStorageId,
}

impl EntryField {
    /// The minimum a projection must expose for verification to run.
    pub fn verification_projection() -> EnumSet<EntryField> {
        EntryField::Hash | EntryField::Signature | EntryField::ImmutableStorageId | EntryField::Index
    }
}

/// Entry as surfaced by reads: `id` plus projected properties and, when
/// requested, the verification outcome.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryUrn,
    #[serde(
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_created: Option<OffsetDateTime>,
    #[serde(
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_modified: Option<OffsetDateTime>,
    #[serde(
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_deleted: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_object: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutable_storage_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
}

impl Entry {
    pub fn project(
        record: &EntryRecord,
        fields: EnumSet<EntryField>,
        verification: Option<Verification>,
    ) -> Self {
        Self {
            id: record.urn(),
            date_created: fields
                .contains(EntryField::DateCreated)
                .then_some(record.date_created),
            date_modified: fields
                .contains(EntryField::DateModified)
                .then_some(record.date_modified)
                .flatten(),
            date_deleted: fields
                .contains(EntryField::DateDeleted)
                .then_some(record.date_deleted)
                .flatten(),
            user_identity: fields
                .contains(EntryField::UserIdentity)
                .then(|| record.user_identity.clone()),
            entry_object: fields
                .contains(EntryField::EntryObject)
                .then(|| record.entry_object.clone()),
            index: fields.contains(EntryField::Index).then_some(record.index),
            hash: fields.contains(EntryField::Hash).then(|| record.hash.clone()),
            signature: fields
                .contains(EntryField::Signature)
                .then(|| record.signature.clone()),
            immutable_storage_id: fields
                .contains(EntryField::ImmutableStorageId)
                .then(|| record.immutable_storage_id.clone())
                .flatten(),
            verification,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetEntryOptions {
    pub verify_entry: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ListEntriesOptions {
    pub conditions: Vec<Condition>,
    pub include_deleted: bool,
    pub verify_entries: bool,
    pub order: SortDirection,
    pub properties: Option<EnumSet<EntryField>>,
    pub cursor: Option<String>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryPage {
    pub entries: Vec<Entry>,
    pub cursor: Option<String>,
}

/// Entry object plus its URN, as returned by the object-only list read.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryObject {
    pub id: EntryUrn,
    pub entry_object: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryObjectPage {
    pub entry_objects: Vec<EntryObject>,
    pub cursor: Option<String>,
}
