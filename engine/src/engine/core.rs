use std::sync::Arc;

use ais_common::types::{
    conditions::{Comparison, Condition},
    entry::EntryRecord,
    stream::StreamRecord,
    urn::RecordId,
};
use dashmap::DashMap;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::error::{EntryNotFoundError, FindEntryError, LoadStreamError, StreamNotFoundError};
use crate::{
    config::StreamEngineConfig,
    connectors::{
        EntityStore, IdentityConnector, ImmutableStorageConnector, VaultConnector,
    },
};

/// The auditable item stream engine.
///
/// All mutations of a stream (including its entries) serialize on a
/// per-stream mutex so that index assignment from `index_counter` stays
/// monotonic under concurrent writers. Reads never take the lock.
#[derive(Clone)]
pub struct StreamEngine {
    pub(super) config: StreamEngineConfig,
    pub(super) vault: Arc<dyn VaultConnector>,
    pub(super) identity: Arc<dyn IdentityConnector>,
    pub(super) immutable: Arc<dyn ImmutableStorageConnector>,
    pub(super) streams: Arc<dyn EntityStore<StreamRecord>>,
    pub(super) entries: Arc<dyn EntityStore<EntryRecord>>,
    write_locks: Arc<DashMap<RecordId, Arc<Mutex<()>>>>,
}

impl StreamEngine {
    pub fn new(
        config: StreamEngineConfig,
        vault: Arc<dyn VaultConnector>,
        identity: Arc<dyn IdentityConnector>,
        immutable: Arc<dyn ImmutableStorageConnector>,
        streams: Arc<dyn EntityStore<StreamRecord>>,
        entries: Arc<dyn EntityStore<EntryRecord>>,
    ) -> Self {
        Self {
            config,
            vault,
            identity,
            immutable,
            streams,
            entries,
            write_locks: Arc::new(DashMap::new()),
        }
    }

    pub fn config(&self) -> &StreamEngineConfig {
        &self.config
    }

    pub(super) fn now() -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    /// Write lock for a single stream. At most one lock is held per
    /// operation; no operation acquires two.
    pub(super) fn stream_lock(&self, stream_id: RecordId) -> Arc<Mutex<()>> {
        self.write_locks.entry(stream_id).or_default().clone()
    }

    pub(super) async fn load_stream(
        &self,
        stream_id: RecordId,
    ) -> Result<StreamRecord, LoadStreamError> {
        self.streams
            .get(&stream_id.to_hex())
            .await?
            .ok_or_else(|| {
                StreamNotFoundError {
                    stream: stream_id.to_hex(),
                }
                .into()
            })
    }

    /// First entry matching `(stream_id, entry_id)`.
    pub(super) async fn find_entry(
        &self,
        stream_id: RecordId,
        entry_id: RecordId,
    ) -> Result<EntryRecord, FindEntryError> {
        let conditions = [
            Condition::new("streamId", Comparison::Eq, stream_id.to_hex()),
            Condition::new("id", Comparison::Eq, entry_id.to_hex()),
        ];
        let page = self.entries.query(&conditions, &[], None, 1).await?;
        page.entities.into_iter().next().ok_or_else(|| {
            EntryNotFoundError {
                stream: stream_id.to_hex(),
                entry: entry_id.to_hex(),
            }
            .into()
        })
    }
}
