use enumset::{EnumSet, EnumSetType};
use serde_json::Value;
use time::OffsetDateTime;

use super::{
    conditions::{Condition, SortDirection},
    entry::Entry,
    urn::{RecordId, StreamUrn},
    verification::Verification,
};

/// Persisted stream record, the engine's canonical view of a stream.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRecord {
    pub id: RecordId,
    #[serde(with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
    #[serde(
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_modified: Option<OffsetDateTime>,
    pub node_identity: String,
    pub user_identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_object: Option<Value>,
    /// Count of entries ever created on this stream; never decremented.
    pub index_counter: u64,
    /// Modulus selecting which entry indices are anchored; 0 disables
    /// entry anchoring.
    pub immutable_interval: u32,
    pub hash: String,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutable_storage_id: Option<String>,
}

impl StreamRecord {
    /// Entity-store table this record lives in.
    pub const TABLE: &'static str = "auditable-item-stream";

    pub fn urn(&self) -> StreamUrn {
        StreamUrn::new(self.id)
    }
}

/// Projectable stream properties. The record `id` is always returned and is
/// not part of the set; entries are never expanded by a list query, so no
/// such member exists.
#[derive(EnumSetType, Debug, strum::Display, strum::EnumString)]
pub enum StreamField {
    #[strum(serialize = "dateCreated")]
    DateCreated,
    #[strum(serialize = "dateModified")]
    DateModified,
    #[strum(serialize = "nodeIdentity")]
    NodeIdentity,
    #[strum(serialize = "userIdentity")]
    UserIdentity,
    #[strum(serialize = "annotationObject")]
    AnnotationObject,
    #[strum(serialize = "indexCounter")]
    IndexCounter,
    #[strum(serialize = "immutableInterval")]
    ImmutableInterval,
    #[strum(serialize = "hash")]
    Hash,
    #[strum(serialize = "signature")]
    Signature,
    #[strum(serialize = "immutableStorageId")]
    ImmutableStorageId,
}

impl StreamField {
    /// Projection applied to list queries when the caller supplies none.
    pub fn default_projection() -> EnumSet<StreamField> {
        StreamField::DateCreated | StreamField::DateModified | StreamField::AnnotationObject
    }
}

/// Stream as returned from a list query: `id` plus whichever properties the
/// projection selected.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSummary {
    pub id: StreamUrn,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_object: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_counter: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutable_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutable_storage_id: Option<String>,
}

impl StreamSummary {
    pub fn project(record: &StreamRecord, fields: EnumSet<StreamField>) -> Self {
        Self {
            id: record.urn(),
            date_created: fields
                .contains(StreamField::DateCreated)
                .then_some(record.date_created),
            date_modified: fields
                .contains(StreamField::DateModified)
                .then_some(record.date_modified)
                .flatten(),
            node_identity: fields
                .contains(StreamField::NodeIdentity)
                .then(|| record.node_identity.clone()),
            user_identity: fields
                .contains(StreamField::UserIdentity)
                .then(|| record.user_identity.clone()),
            annotation_object: fields
                .contains(StreamField::AnnotationObject)
                .then(|| record.annotation_object.clone())
                .flatten(),
            index_counter: fields
                .contains(StreamField::IndexCounter)
                .then_some(record.index_counter),
            immutable_interval: fields
                .contains(StreamField::ImmutableInterval)
                .then_some(record.immutable_interval),
            hash: fields
                .contains(StreamField::Hash)
                .then(|| record.hash.clone()),
            signature: fields
                .contains(StreamField::Signature)
                .then(|| record.signature.clone()),
            immutable_storage_id: fields
                .contains(StreamField::ImmutableStorageId)
                .then(|| record.immutable_storage_id.clone())
                .flatten(),
        }
    }
}

/// Entry supplied inline to stream creation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInput {
    pub entry_object: Value,
}

impl From<Value> for EntryInput {
    fn from(entry_object: Value) -> Self {
        Self { entry_object }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateStreamOptions {
    /// Overrides the engine's default immutable interval when set.
    pub immutable_interval: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetStreamOptions {
    pub include_entries: bool,
    pub include_deleted: bool,
    pub verify_stream: bool,
    pub verify_entries: bool,
}

/// Property a stream list query orders on.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::IntoStaticStr,
    strum::EnumString,
)]
pub enum StreamOrderBy {
    #[default]
    #[strum(serialize = "dateCreated")]
    DateCreated,
    #[strum(serialize = "dateModified")]
    DateModified,
}

#[derive(Debug, Clone, Default)]
pub struct QueryStreamsRequest {
    pub conditions: Vec<Condition>,
    pub order_by: StreamOrderBy,
    pub order_direction: SortDirection,
    pub properties: Option<EnumSet<StreamField>>,
    pub cursor: Option<String>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamPage {
    pub streams: Vec<StreamSummary>,
    pub cursor: Option<String>,
}

/// Stream returned by a point read, optionally with its first page of
/// entries and verification outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamView {
    pub stream: StreamRecord,
    pub verification: Option<Verification>,
    pub entries: Option<Vec<Entry>>,
    pub entries_cursor: Option<String>,
}
