use std::collections::BTreeSet;

use ais_common::types::{
    conditions::{Comparison, Condition, SortDirection},
    entry::{EntryField, GetEntryOptions, ListEntriesOptions},
    stream::CreateStreamOptions,
    urn::{EntryUrn, RecordId},
};
use ais_engine::engine::error::GetEntryError;
use enumset::EnumSet;

use super::common::*;

#[tokio::test]
async fn appended_entries_take_sequential_indices() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(None, Vec::new(), CreateStreamOptions::default(), USER, NODE)
        .await
        .expect("create stream");

    for i in 0..5 {
        ctx.engine
            .create_entry(&urn.to_string(), note(&format!("e{i}")), USER, NODE)
            .await
            .expect("create entry");
    }

    let stream = stored_stream(&ctx, &urn).await;
    assert_eq!(stream.index_counter, 5);

    let indices: BTreeSet<u64> = stored_entries(&ctx, &urn)
        .await
        .iter()
        .map(|e| e.index)
        .collect();
    assert_eq!(indices, (0..5).collect::<BTreeSet<u64>>());
}

#[tokio::test]
async fn get_entry_and_object() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(None, Vec::new(), CreateStreamOptions::default(), USER, NODE)
        .await
        .expect("create stream");
    let entry_urn = ctx
        .engine
        .create_entry(&urn.to_string(), note("payload"), USER, NODE)
        .await
        .expect("create entry");

    let entry = ctx
        .engine
        .get_entry(
            &urn.to_string(),
            &entry_urn.to_string(),
            GetEntryOptions::default(),
        )
        .await
        .expect("get entry");
    assert_eq!(entry.id, entry_urn);
    assert_eq!(entry.index, Some(0));
    assert_eq!(entry.entry_object.as_ref(), Some(&note("payload")));
    assert_eq!(entry.user_identity.as_deref(), Some(USER));
    assert!(entry.verification.is_none());

    let object = ctx
        .engine
        .get_entry_object(&urn.to_string(), &entry_urn.to_string())
        .await
        .expect("get entry object");
    assert_eq!(object, note("payload"));
}

#[tokio::test]
async fn update_entry_preserves_position_and_anchor() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(
            None,
            vec![note("original").into()],
            CreateStreamOptions::default(),
            USER,
            NODE,
        )
        .await
        .expect("create stream");
    let before = stored_entries(&ctx, &urn).await.remove(0);
    assert!(before.immutable_storage_id.is_some());

    let entry_urn = EntryUrn::new(urn.id(), before.id);
    ctx.engine
        .update_entry(
            &urn.to_string(),
            &entry_urn.to_string(),
            note("updated"),
            USER,
            NODE,
        )
        .await
        .expect("update entry");

    let after = stored_entry(&ctx, &entry_urn).await;
    assert_eq!(after.index, before.index);
    assert_eq!(after.date_created, before.date_created);
    assert!(after.date_modified.is_some());
    assert_eq!(after.entry_object, note("updated"));
    assert_ne!(after.hash, before.hash);
    assert_ne!(after.signature, before.signature);
    assert_eq!(after.immutable_storage_id, before.immutable_storage_id);
    assert_eq!(ctx.immutable.len(), 2);
}

#[tokio::test]
async fn remove_entry_soft_deletes() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(
            None,
            vec![note("first").into(), note("second").into()],
            CreateStreamOptions::default(),
            USER,
            NODE,
        )
        .await
        .expect("create stream");
    let entries = stored_entries(&ctx, &urn).await;
    let entry0_urn = EntryUrn::new(urn.id(), entries[0].id);

    ctx.engine
        .remove_entry(&urn.to_string(), &entry0_urn.to_string(), USER, NODE)
        .await
        .expect("remove entry");

    let page = ctx
        .engine
        .get_entries(&urn.to_string(), ListEntriesOptions::default())
        .await
        .expect("get entries");
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].index, Some(1));

    let page = ctx
        .engine
        .get_entries(
            &urn.to_string(),
            ListEntriesOptions {
                include_deleted: true,
                ..Default::default()
            },
        )
        .await
        .expect("get entries");
    assert_eq!(page.entries.len(), 2);

    let deleted = stored_entry(&ctx, &entry0_urn).await;
    assert!(deleted.date_deleted.is_some());
    assert_eq!(deleted.hash, entries[0].hash);
    assert_eq!(deleted.signature, entries[0].signature);
    assert_eq!(deleted.immutable_storage_id, entries[0].immutable_storage_id);
    assert_eq!(deleted.index, entries[0].index);
}

#[tokio::test]
async fn removing_a_deleted_entry_is_a_noop() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(
            None,
            vec![note("only").into()],
            CreateStreamOptions::default(),
            USER,
            NODE,
        )
        .await
        .expect("create stream");
    let entry_urn = EntryUrn::new(urn.id(), stored_entries(&ctx, &urn).await[0].id);

    ctx.engine
        .remove_entry(&urn.to_string(), &entry_urn.to_string(), USER, NODE)
        .await
        .expect("first removal");
    let after_first = stored_entry(&ctx, &entry_urn).await;
    let stream_after_first = stored_stream(&ctx, &urn).await;

    ctx.engine
        .remove_entry(&urn.to_string(), &entry_urn.to_string(), USER, NODE)
        .await
        .expect("second removal");
    assert_eq!(stored_entry(&ctx, &entry_urn).await, after_first);
    assert_eq!(stored_stream(&ctx, &urn).await, stream_after_first);
}

#[tokio::test]
async fn deletion_filter_is_pinned_by_the_cursor() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(None, Vec::new(), CreateStreamOptions::default(), USER, NODE)
        .await
        .expect("create stream");
    let mut entry_urns = Vec::new();
    for i in 0..5 {
        entry_urns.push(
            ctx.engine
                .create_entry(&urn.to_string(), note(&format!("e{i}")), USER, NODE)
                .await
                .expect("create entry"),
        );
    }
    ctx.engine
        .remove_entry(&urn.to_string(), &entry_urns[0].to_string(), USER, NODE)
        .await
        .expect("remove entry");

    let page = ctx
        .engine
        .get_entries(
            &urn.to_string(),
            ListEntriesOptions {
                include_deleted: true,
                page_size: Some(2),
                ..Default::default()
            },
        )
        .await
        .expect("first page");
    assert_eq!(page.entries.len(), 2);
    let cursor = page.cursor.expect("more entries expected");
    assert!(cursor.ends_with("|true"));

    // Later pages keep the original deletion filter even when the caller
    // flips the option.
    let mut collected = page.entries.len();
    let mut cursor = Some(cursor);
    while let Some(current) = cursor {
        let page = ctx
            .engine
            .get_entries(
                &urn.to_string(),
                ListEntriesOptions {
                    include_deleted: false,
                    page_size: Some(2),
                    cursor: Some(current),
                    ..Default::default()
                },
            )
            .await
            .expect("next page");
        collected += page.entries.len();
        cursor = page.cursor;
    }
    assert_eq!(collected, 5);
}

#[tokio::test]
async fn nested_conditions_filter_entry_objects() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(
            None,
            vec![note("a").into(), note("b").into()],
            CreateStreamOptions::default(),
            USER,
            NODE,
        )
        .await
        .expect("create stream");

    let page = ctx
        .engine
        .get_entries(
            &urn.to_string(),
            ListEntriesOptions {
                conditions: vec![Condition::new(
                    "entryObject.content",
                    Comparison::Eq,
                    "b",
                )],
                ..Default::default()
            },
        )
        .await
        .expect("get entries");
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].entry_object.as_ref(), Some(&note("b")));
}

#[tokio::test]
async fn ascending_order_returns_creation_order() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(None, Vec::new(), CreateStreamOptions::default(), USER, NODE)
        .await
        .expect("create stream");
    for i in 0..3 {
        ctx.engine
            .create_entry(&urn.to_string(), note(&format!("e{i}")), USER, NODE)
            .await
            .expect("create entry");
    }

    let page = ctx
        .engine
        .get_entries(
            &urn.to_string(),
            ListEntriesOptions {
                order: SortDirection::Asc,
                ..Default::default()
            },
        )
        .await
        .expect("get entries");
    let indices: Vec<u64> = page.entries.iter().filter_map(|e| e.index).collect();
    assert_eq!(indices, [0, 1, 2]);
}

#[tokio::test]
async fn projection_expands_for_verification() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(
            None,
            vec![note("a").into()],
            CreateStreamOptions::default(),
            USER,
            NODE,
        )
        .await
        .expect("create stream");

    let page = ctx
        .engine
        .get_entries(
            &urn.to_string(),
            ListEntriesOptions {
                verify_entries: true,
                properties: Some(EnumSet::only(EntryField::EntryObject)),
                ..Default::default()
            },
        )
        .await
        .expect("get entries");
    let entry = &page.entries[0];
    assert!(entry.entry_object.is_some());
    assert!(entry.hash.is_some());
    assert!(entry.signature.is_some());
    assert_eq!(entry.index, Some(0));
    // Unprojected fields stay hidden.
    assert!(entry.date_created.is_none());
    assert!(entry.user_identity.is_none());
    assert!(entry.verification.is_some());
}

#[tokio::test]
async fn entry_objects_list_returns_only_objects() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(
            None,
            vec![note("a").into(), note("b").into()],
            CreateStreamOptions::default(),
            USER,
            NODE,
        )
        .await
        .expect("create stream");

    let page = ctx
        .engine
        .get_entry_objects(
            &urn.to_string(),
            ListEntriesOptions {
                order: SortDirection::Asc,
                ..Default::default()
            },
        )
        .await
        .expect("get entry objects");
    assert_eq!(page.entry_objects.len(), 2);
    assert_eq!(page.entry_objects[0].entry_object, note("a"));
    assert_eq!(page.entry_objects[1].entry_object, note("b"));
}

#[tokio::test]
async fn missing_entry_is_not_found() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(None, Vec::new(), CreateStreamOptions::default(), USER, NODE)
        .await
        .expect("create stream");
    let ghost = EntryUrn::new(urn.id(), RecordId::random());

    let err = ctx
        .engine
        .get_entry(
            &urn.to_string(),
            &ghost.to_string(),
            GetEntryOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GetEntryError::EntryNotFound(_)));
}
