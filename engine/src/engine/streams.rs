use ais_common::{
    jsonld,
    types::{
        ValidationError,
        conditions::{Comparison, Condition, SortDirection, SortKey},
        entry::ListEntriesOptions,
        stream::{
            CreateStreamOptions, EntryInput, GetStreamOptions, QueryStreamsRequest, StreamField,
            StreamPage, StreamRecord, StreamSummary, StreamView,
        },
        urn::{RecordId, StreamUrn},
    },
};
use serde_json::Value;
use tracing::instrument;

use super::{
    RecordRef,
    entries::{EntryContext, EntryPartial},
    error::{
        CreateStreamError, GetStreamError, QueryStreamsError, RemoveImmutableError,
        UpdateStreamError,
    },
    hashing,
};
use crate::{config::DEFAULT_PAGE_SIZE, engine::StreamEngine};

pub(super) fn require_identity(value: &str, what: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(format!("{what} identity must not be empty").into());
    }
    Ok(())
}

impl StreamEngine {
    /// Create a stream, optionally seeded with entries, and anchor it.
    ///
    /// The stream record itself is persisted last, after every seed entry,
    /// so a failure part-way never surfaces a stream.
    pub async fn create(
        &self,
        annotation_object: Option<Value>,
        entries: Vec<EntryInput>,
        options: CreateStreamOptions,
        user_identity: &str,
        node_identity: &str,
    ) -> Result<StreamUrn, CreateStreamError> {
        require_identity(user_identity, "user")?;
        require_identity(node_identity, "node")?;
        if let Some(annotation) = &annotation_object {
            jsonld::validate_node(annotation)?;
        }

        let id = RecordId::random();
        let now = Self::now();
        let immutable_interval = options
            .immutable_interval
            .unwrap_or(self.config.default_immutable_interval);

        let mut stream = StreamRecord {
            id,
            date_created: now,
            date_modified: Some(now),
            node_identity: node_identity.to_owned(),
            user_identity: user_identity.to_owned(),
            annotation_object,
            index_counter: 0,
            immutable_interval,
            hash: String::new(),
            signature: String::new(),
            immutable_storage_id: None,
        };

        let digest = hashing::digest_record(node_identity, RecordRef::Stream(&stream));
        stream.hash = hashing::to_base64(&digest);
        let signature = self.vault.sign(&self.config.vault_key_id, &digest).await?;
        stream.signature = hashing::to_base64(&signature);
        stream.immutable_storage_id = Some(self.anchor_stream(&stream).await?);

        let lock = self.stream_lock(id);
        let _guard = lock.lock().await;

        let mut context = EntryContext {
            now,
            user_identity,
            node_identity,
            index_counter: 0,
            immutable_interval,
        };
        for input in entries {
            self.set_entry(&mut context, id, EntryPartial::from_object(input.entry_object))
                .await?;
        }
        stream.index_counter = context.index_counter;

        self.streams.set(stream).await?;
        Ok(StreamUrn::new(id))
    }

    /// Fetch a stream, optionally with its first page of entries and
    /// verification outcomes.
    pub async fn get(
        &self,
        stream_id: &str,
        options: GetStreamOptions,
    ) -> Result<StreamView, GetStreamError> {
        let urn: StreamUrn = stream_id.parse()?;
        let stream = self.load_stream(urn.id()).await?;

        let verification = if options.verify_stream {
            Some(
                self.verify_record(&stream.node_identity, RecordRef::Stream(&stream))
                    .await?,
            )
        } else {
            None
        };

        let (entries, entries_cursor) = if options.include_entries {
            let page = self
                .find_entries(
                    &stream,
                    ListEntriesOptions {
                        include_deleted: options.include_deleted,
                        verify_entries: options.verify_entries,
                        ..Default::default()
                    },
                )
                .await?;
            (Some(page.entries), page.cursor)
        } else {
            (None, None)
        };

        Ok(StreamView {
            stream,
            verification,
            entries,
            entries_cursor,
        })
    }

    /// Replace the stream's annotation object.
    ///
    /// The annotation is the only mutable stream attribute and is not
    /// covered by the stream hash, so no re-signing happens here; an
    /// unchanged annotation leaves the record untouched.
    pub async fn update(
        &self,
        stream_id: &str,
        annotation_object: Option<Value>,
        user_identity: &str,
        node_identity: &str,
    ) -> Result<(), UpdateStreamError> {
        require_identity(user_identity, "user")?;
        require_identity(node_identity, "node")?;
        if let Some(annotation) = &annotation_object {
            jsonld::validate_node(annotation)?;
        }

        let urn: StreamUrn = stream_id.parse()?;
        let lock = self.stream_lock(urn.id());
        let _guard = lock.lock().await;

        let mut stream = self.load_stream(urn.id()).await?;
        if !jsonld::nodes_equal(
            stream.annotation_object.as_ref(),
            annotation_object.as_ref(),
        ) {
            stream.annotation_object = annotation_object;
            stream.date_modified = Some(Self::now());
            self.streams.set(stream).await?;
        }
        Ok(())
    }

    /// List streams with filtering, ordering and cursor pagination.
    pub async fn query(
        &self,
        request: QueryStreamsRequest,
    ) -> Result<StreamPage, QueryStreamsError> {
        let QueryStreamsRequest {
            conditions,
            order_by,
            order_direction,
            properties,
            cursor,
            page_size,
        } = request;

        let sort = [SortKey::new(
            <&'static str>::from(order_by),
            order_direction,
        )];
        let page = self
            .streams
            .query(
                &conditions,
                &sort,
                cursor.as_deref(),
                page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            )
            .await?;

        let fields = properties.unwrap_or_else(StreamField::default_projection);
        let streams = page
            .entities
            .iter()
            .map(|stream| StreamSummary::project(stream, fields))
            .collect();

        Ok(StreamPage {
            streams,
            cursor: page.cursor,
        })
    }

    /// Remove every anchoring credential of the stream and its entries.
    ///
    /// Sweeps entries in ascending creation order. Verification against
    /// anchors is permanently broken for the affected records.
    #[instrument(err, skip(self))]
    pub async fn remove_immutable(
        &self,
        stream_id: &str,
        node_identity: &str,
    ) -> Result<(), RemoveImmutableError> {
        require_identity(node_identity, "node")?;
        let urn: StreamUrn = stream_id.parse()?;
        let lock = self.stream_lock(urn.id());
        let _guard = lock.lock().await;

        let mut stream = self.load_stream(urn.id()).await?;
        if let Some(storage_id) = stream.immutable_storage_id.take() {
            self.immutable.remove(&storage_id).await?;
            self.streams.set(stream).await?;
        }

        let conditions = [Condition::new(
            "streamId",
            Comparison::Eq,
            urn.id().to_hex(),
        )];
        let sort = [
            SortKey::new("dateCreated", SortDirection::Asc),
            SortKey::new("index", SortDirection::Asc),
        ];
        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .entries
                .query(&conditions, &sort, cursor.as_deref(), DEFAULT_PAGE_SIZE)
                .await?;
            for mut entry in page.entities {
                if let Some(storage_id) = entry.immutable_storage_id.take() {
                    self.immutable.remove(&storage_id).await?;
                    self.entries.set(entry).await?;
                }
            }
            cursor = page.cursor;
            if cursor.is_none() {
                break;
            }
        }
        Ok(())
    }
}
