use std::sync::Arc;

use ais_common::types::{
    entry::EntryRecord,
    stream::StreamRecord,
    urn::{EntryUrn, StreamUrn},
};
use ais_engine::{
    StreamEngine,
    config::StreamEngineConfig,
    connectors::{
        EntityStore as _,
        memory::{
            MemoryEntityStore, MemoryIdentityConnector, MemoryImmutableStorage,
            MemoryVaultConnector,
        },
    },
};
use serde_json::{Value, json};

pub const USER: &str = "did:example:user";
pub const NODE: &str = "did:example:node";

pub struct TestContext {
    pub engine: StreamEngine,
    pub streams: Arc<MemoryEntityStore<StreamRecord>>,
    pub entries: Arc<MemoryEntityStore<EntryRecord>>,
    pub immutable: Arc<MemoryImmutableStorage>,
    pub identity: Arc<MemoryIdentityConnector>,
    pub vault: Arc<MemoryVaultConnector>,
}

pub fn create_engine() -> TestContext {
    create_engine_with_config(StreamEngineConfig::default())
}

pub fn create_engine_with_config(config: StreamEngineConfig) -> TestContext {
    let vault = Arc::new(MemoryVaultConnector::new());
    let identity = Arc::new(MemoryIdentityConnector::new());
    let immutable = Arc::new(MemoryImmutableStorage::new());
    let streams: Arc<MemoryEntityStore<StreamRecord>> = Arc::new(MemoryEntityStore::new());
    let entries: Arc<MemoryEntityStore<EntryRecord>> = Arc::new(MemoryEntityStore::new());
    let engine = StreamEngine::new(
        config,
        vault.clone(),
        identity.clone(),
        immutable.clone(),
        streams.clone(),
        entries.clone(),
    );
    TestContext {
        engine,
        streams,
        entries,
        immutable,
        identity,
        vault,
    }
}

pub fn note(content: &str) -> Value {
    json!({"@type": "Note", "content": content})
}

pub async fn stored_stream(ctx: &TestContext, stream_urn: &StreamUrn) -> StreamRecord {
    ctx.streams
        .get(&stream_urn.id().to_hex())
        .await
        .expect("stream store read")
        .expect("stream record present")
}

pub async fn stored_entry(ctx: &TestContext, entry_urn: &EntryUrn) -> EntryRecord {
    ctx.entries
        .get(&entry_urn.entry_id().to_hex())
        .await
        .expect("entry store read")
        .expect("entry record present")
}

/// All entry records of a stream, in index order.
pub async fn stored_entries(ctx: &TestContext, stream_urn: &StreamUrn) -> Vec<EntryRecord> {
    use ais_common::types::conditions::{Comparison, Condition, SortDirection, SortKey};

    let page = ctx
        .entries
        .query(
            &[Condition::new(
                "streamId",
                Comparison::Eq,
                stream_urn.id().to_hex(),
            )],
            &[SortKey::new("index", SortDirection::Asc)],
            None,
            1000,
        )
        .await
        .expect("entry store query");
    page.entities
}
