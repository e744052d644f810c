use ais_common::{
    jsonld,
    types::{
        conditions::{Comparison, Condition, SortKey},
        entry::{
            Entry, EntryField, EntryObject, EntryObjectPage, EntryPage, EntryRecord,
            GetEntryOptions, ListEntriesOptions,
        },
        stream::StreamRecord,
        urn::{EntryUrn, RecordId, StreamUrn},
    },
};
use enumset::EnumSet;
use serde_json::Value;
use time::OffsetDateTime;

use super::{
    RecordRef, cursor,
    error::{
        CreateEntryError, FindEntriesError, GetEntriesError, GetEntryError, GetEntryObjectError,
        GetEntryObjectsError, RemoveEntryError, SetEntryError, UpdateEntryError,
    },
    hashing,
    streams::require_identity,
};
use crate::{config::DEFAULT_PAGE_SIZE, engine::StreamEngine};

/// Shared state for one mutating operation on a stream.
pub(super) struct EntryContext<'a> {
    pub now: OffsetDateTime,
    pub user_identity: &'a str,
    pub node_identity: &'a str,
    pub index_counter: u64,
    pub immutable_interval: u32,
}

/// Fields carried into `set_entry`; whatever is absent is filled from the
/// context. Updates and deletions pass the existing record through so the
/// entry keeps its identity, position and anchoring.
#[derive(Default)]
pub(super) struct EntryPartial {
    pub id: Option<RecordId>,
    pub date_created: Option<OffsetDateTime>,
    pub date_deleted: Option<OffsetDateTime>,
    pub entry_object: Option<Value>,
    pub index: Option<u64>,
    pub immutable_storage_id: Option<String>,
}

impl EntryPartial {
    pub fn from_object(entry_object: Value) -> Self {
        Self {
            entry_object: Some(entry_object),
            ..Default::default()
        }
    }

    pub fn from_existing(entry: EntryRecord) -> Self {
        Self {
            id: Some(entry.id),
            date_created: Some(entry.date_created),
            date_deleted: entry.date_deleted,
            entry_object: Some(entry.entry_object),
            index: Some(entry.index),
            immutable_storage_id: entry.immutable_storage_id,
        }
    }
}

impl StreamEngine {
    /// Compose, hash, sign, optionally anchor and persist one entry.
    ///
    /// A fresh entry takes the next index from the context's counter and is
    /// anchored when the index lands on the immutable interval. A carried
    /// `date_created` older than `context.now` marks an update or deletion:
    /// `date_modified` is stamped and the original anchoring is left as
    /// issued.
    pub(super) async fn set_entry(
        &self,
        context: &mut EntryContext<'_>,
        stream_id: RecordId,
        partial: EntryPartial,
    ) -> Result<RecordId, SetEntryError> {
        if let Some(entry_object) = &partial.entry_object {
            jsonld::validate_node(entry_object)?;
        }

        let id = partial.id.unwrap_or_else(RecordId::random);
        let date_created = partial.date_created.unwrap_or(context.now);
        let created_now = date_created == context.now;
        let index = match partial.index {
            Some(index) => index,
            None => {
                let index = context.index_counter;
                context.index_counter += 1;
                index
            }
        };

        let mut entry = EntryRecord {
            id,
            stream_id,
            date_created,
            date_modified: (!created_now).then_some(context.now),
            date_deleted: partial.date_deleted,
            user_identity: context.user_identity.to_owned(),
            entry_object: partial
                .entry_object
                .unwrap_or_else(|| Value::Object(Default::default())),
            index,
            hash: String::new(),
            signature: String::new(),
            immutable_storage_id: partial.immutable_storage_id,
        };

        let digest = hashing::digest_record(context.node_identity, RecordRef::Entry(&entry));
        entry.hash = hashing::to_base64(&digest);
        let signature = self.vault.sign(&self.config.vault_key_id, &digest).await?;
        entry.signature = hashing::to_base64(&signature);

        if created_now
            && context.immutable_interval > 0
            && index % u64::from(context.immutable_interval) == 0
        {
            entry.immutable_storage_id =
                Some(self.anchor_entry(context.node_identity, &entry).await?);
        }

        self.entries.set(entry).await?;
        Ok(id)
    }

    /// Append an entry to a stream.
    pub async fn create_entry(
        &self,
        stream_id: &str,
        entry_object: Value,
        user_identity: &str,
        node_identity: &str,
    ) -> Result<EntryUrn, CreateEntryError> {
        require_identity(user_identity, "user")?;
        require_identity(node_identity, "node")?;
        let urn: StreamUrn = stream_id.parse()?;

        let lock = self.stream_lock(urn.id());
        let _guard = lock.lock().await;

        let mut stream = self.load_stream(urn.id()).await?;
        let now = Self::now();
        let mut context = EntryContext {
            now,
            user_identity,
            node_identity,
            index_counter: stream.index_counter,
            immutable_interval: stream.immutable_interval,
        };
        let entry_id = self
            .set_entry(&mut context, urn.id(), EntryPartial::from_object(entry_object))
            .await?;

        stream.index_counter = context.index_counter;
        stream.date_modified = Some(now);
        self.streams.set(stream).await?;

        Ok(EntryUrn::new(urn.id(), entry_id))
    }

    /// Fetch a single entry, optionally verified.
    pub async fn get_entry(
        &self,
        stream_id: &str,
        entry_id: &str,
        options: GetEntryOptions,
    ) -> Result<Entry, GetEntryError> {
        let stream_urn: StreamUrn = stream_id.parse()?;
        let entry_urn: EntryUrn = entry_id.parse()?;

        let record = self
            .find_entry(stream_urn.id(), entry_urn.entry_id())
            .await?;
        let verification = if options.verify_entry {
            let stream = self.load_stream(stream_urn.id()).await?;
            Some(
                self.verify_record(&stream.node_identity, RecordRef::Entry(&record))
                    .await?,
            )
        } else {
            None
        };

        Ok(Entry::project(&record, EnumSet::all(), verification))
    }

    /// Fetch only the JSON-LD object carried by an entry.
    pub async fn get_entry_object(
        &self,
        stream_id: &str,
        entry_id: &str,
    ) -> Result<Value, GetEntryObjectError> {
        let stream_urn: StreamUrn = stream_id.parse()?;
        let entry_urn: EntryUrn = entry_id.parse()?;
        let record = self
            .find_entry(stream_urn.id(), entry_urn.entry_id())
            .await?;
        Ok(record.entry_object)
    }

    /// Replace an entry's object, superseding its hash and signature.
    ///
    /// The entry keeps its index, creation date and original anchoring
    /// credential; only the local hash and signature are recomputed.
    pub async fn update_entry(
        &self,
        stream_id: &str,
        entry_id: &str,
        entry_object: Value,
        user_identity: &str,
        node_identity: &str,
    ) -> Result<(), UpdateEntryError> {
        require_identity(user_identity, "user")?;
        require_identity(node_identity, "node")?;
        let stream_urn: StreamUrn = stream_id.parse()?;
        let entry_urn: EntryUrn = entry_id.parse()?;

        let lock = self.stream_lock(stream_urn.id());
        let _guard = lock.lock().await;

        let mut stream = self.load_stream(stream_urn.id()).await?;
        let existing = self
            .find_entry(stream_urn.id(), entry_urn.entry_id())
            .await?;

        let now = Self::now();
        let mut context = EntryContext {
            now,
            user_identity,
            node_identity,
            index_counter: stream.index_counter,
            immutable_interval: stream.immutable_interval,
        };
        let mut partial = EntryPartial::from_existing(existing);
        partial.entry_object = Some(entry_object);
        self.set_entry(&mut context, stream_urn.id(), partial).await?;

        stream.date_modified = Some(now);
        self.streams.set(stream).await?;
        Ok(())
    }

    /// Soft-delete an entry. Deleting an already-deleted entry is a no-op.
    pub async fn remove_entry(
        &self,
        stream_id: &str,
        entry_id: &str,
        user_identity: &str,
        node_identity: &str,
    ) -> Result<(), RemoveEntryError> {
        require_identity(user_identity, "user")?;
        require_identity(node_identity, "node")?;
        let stream_urn: StreamUrn = stream_id.parse()?;
        let entry_urn: EntryUrn = entry_id.parse()?;

        let lock = self.stream_lock(stream_urn.id());
        let _guard = lock.lock().await;

        let mut stream = self.load_stream(stream_urn.id()).await?;
        let existing = self
            .find_entry(stream_urn.id(), entry_urn.entry_id())
            .await?;
        if existing.is_deleted() {
            return Ok(());
        }

        let now = Self::now();
        let mut context = EntryContext {
            now,
            user_identity,
            node_identity,
            index_counter: stream.index_counter,
            immutable_interval: stream.immutable_interval,
        };
        let mut partial = EntryPartial::from_existing(existing);
        partial.date_deleted = Some(now);
        self.set_entry(&mut context, stream_urn.id(), partial).await?;

        stream.date_modified = Some(now);
        self.streams.set(stream).await?;
        Ok(())
    }

    /// List a stream's entries.
    pub async fn get_entries(
        &self,
        stream_id: &str,
        options: ListEntriesOptions,
    ) -> Result<EntryPage, GetEntriesError> {
        let urn: StreamUrn = stream_id.parse()?;
        let stream = self.load_stream(urn.id()).await?;
        Ok(self.find_entries(&stream, options).await?)
    }

    /// List only the JSON-LD objects carried by a stream's entries.
    pub async fn get_entry_objects(
        &self,
        stream_id: &str,
        options: ListEntriesOptions,
    ) -> Result<EntryObjectPage, GetEntryObjectsError> {
        let urn: StreamUrn = stream_id.parse()?;
        let stream = self.load_stream(urn.id()).await?;

        let options = ListEntriesOptions {
            verify_entries: false,
            properties: Some(EnumSet::only(EntryField::EntryObject)),
            ..options
        };
        let page = self.find_entries(&stream, options).await?;
        let entry_objects = page
            .entries
            .into_iter()
            .map(|entry| EntryObject {
                id: entry.id,
                entry_object: entry.entry_object.unwrap_or_default(),
            })
            .collect();
        Ok(EntryObjectPage {
            entry_objects,
            cursor: page.cursor,
        })
    }

    /// Query the entry store for one page of a stream's entries.
    ///
    /// The outward cursor carries the deletion filter so later pages keep
    /// the filter the first page was issued with. When verification is
    /// requested, a caller projection is expanded with the fields
    /// verification needs.
    pub(super) async fn find_entries(
        &self,
        stream: &StreamRecord,
        options: ListEntriesOptions,
    ) -> Result<EntryPage, FindEntriesError> {
        let ListEntriesOptions {
            conditions,
            mut include_deleted,
            verify_entries,
            order,
            properties,
            cursor,
            page_size,
        } = options;

        let (backend_cursor, cursor_flag) = cursor::decode(cursor.as_deref());
        if let Some(flag) = cursor_flag {
            include_deleted = flag;
        }

        let mut filter = vec![Condition::new(
            "streamId",
            Comparison::Eq,
            stream.id.to_hex(),
        )];
        if !include_deleted {
            filter.push(Condition::unset("dateDeleted"));
        }
        filter.extend(conditions);

        let sort = [
            SortKey::new("dateCreated", order),
            SortKey::new("index", order),
        ];
        let page = self
            .entries
            .query(
                &filter,
                &sort,
                backend_cursor.as_deref(),
                page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            )
            .await?;

        let mut fields = properties.unwrap_or_else(EnumSet::all);
        if verify_entries {
            fields |= EntryField::verification_projection();
        }

        let mut entries = Vec::with_capacity(page.entities.len());
        for record in &page.entities {
            let verification = if verify_entries {
                Some(
                    self.verify_record(&stream.node_identity, RecordRef::Entry(record))
                        .await?,
                )
            } else {
                None
            };
            entries.push(Entry::project(record, fields, verification));
        }

        Ok(EntryPage {
            entries,
            cursor: cursor::encode(page.cursor.as_deref(), include_deleted),
        })
    }
}
