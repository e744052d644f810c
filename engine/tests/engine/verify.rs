use ais_common::types::{
    credential::{ENTRY_CREDENTIAL_TYPE, EntryCredential},
    entry::{GetEntryOptions, ListEntriesOptions},
    stream::{CreateStreamOptions, GetStreamOptions},
    urn::{EntryUrn, StreamUrn},
    verification::VerificationState,
};
use ais_engine::connectors::{EntityStore as _, IdentityConnector as _, ImmutableStorageConnector as _};

use super::common::*;

async fn anchored_jwt(ctx: &TestContext, storage_id: &str) -> String {
    let blob = ctx.immutable.get(storage_id).await.expect("anchored blob");
    String::from_utf8(blob).expect("utf-8 credential")
}

#[tokio::test]
async fn fresh_records_verify_ok() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(
            Some(note("n")),
            vec![note("a").into(), note("b").into()],
            CreateStreamOptions::default(),
            USER,
            NODE,
        )
        .await
        .expect("create stream");

    let view = ctx
        .engine
        .get(
            &urn.to_string(),
            GetStreamOptions {
                include_entries: true,
                verify_stream: true,
                verify_entries: true,
                ..Default::default()
            },
        )
        .await
        .expect("get stream");

    assert_eq!(
        view.verification.expect("stream verification").state,
        VerificationState::Ok
    );
    let entries = view.entries.expect("entries included");
    assert_eq!(entries.len(), 2);
    for entry in entries {
        assert_eq!(
            entry.verification.expect("entry verification").state,
            VerificationState::Ok
        );
    }
}

#[tokio::test]
async fn tampered_entry_object_is_a_hash_mismatch() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(
            None,
            vec![note("genuine").into()],
            CreateStreamOptions::default(),
            USER,
            NODE,
        )
        .await
        .expect("create stream");
    let mut record = stored_entries(&ctx, &urn).await.remove(0);
    let entry_urn = EntryUrn::new(urn.id(), record.id);

    // Mutate the payload behind the engine's back.
    record.entry_object = note("forged");
    ctx.entries.set(record).await.expect("tamper entry store");

    let entry = ctx
        .engine
        .get_entry(
            &urn.to_string(),
            &entry_urn.to_string(),
            GetEntryOptions { verify_entry: true },
        )
        .await
        .expect("get entry");
    let verification = entry.verification.expect("verification requested");
    assert_eq!(verification.state, VerificationState::HashMismatch);
    assert!(verification.hash.is_some());
    assert!(verification.stored_hash.is_some());
    assert_ne!(verification.hash, verification.stored_hash);
}

#[tokio::test]
async fn tampered_signature_does_not_verify() {
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
    let mut record = stored_entries(&ctx, &urn).await.remove(0);
    let entry_urn = EntryUrn::new(urn.id(), record.id);

    record.signature = "Zm9yZ2VkIHNpZ25hdHVyZQ==".to_owned();
    ctx.entries.set(record).await.expect("tamper entry store");

    let entry = ctx
        .engine
        .get_entry(
            &urn.to_string(),
            &entry_urn.to_string(),
            GetEntryOptions { verify_entry: true },
        )
        .await
        .expect("get entry");
    assert_eq!(
        entry.verification.expect("verification requested").state,
        VerificationState::SignatureNotVerified
    );
}

#[tokio::test]
async fn revoked_credential_is_reported() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(None, Vec::new(), CreateStreamOptions::default(), USER, NODE)
        .await
        .expect("create stream");
    let stream = stored_stream(&ctx, &urn).await;
    let storage_id = stream.immutable_storage_id.expect("stream anchored");

    let jwt = anchored_jwt(&ctx, &storage_id).await;
    ctx.identity.revoke(&jwt).expect("revoke credential");

    let view = ctx
        .engine
        .get(
            &urn.to_string(),
            GetStreamOptions {
                verify_stream: true,
                ..Default::default()
            },
        )
        .await
        .expect("get stream");
    assert_eq!(
        view.verification.expect("stream verification").state,
        VerificationState::CredentialRevoked
    );
}

/// Re-anchor an entry with a forged credential subject and report the
/// resulting verification state.
async fn forge_entry_credential(
    ctx: &TestContext,
    urn: &StreamUrn,
    mutate: impl FnOnce(&mut EntryCredential),
) -> VerificationState {
    let record = stored_entries(ctx, urn).await.remove(0);
    let entry_urn = EntryUrn::new(urn.id(), record.id);
    let storage_id = record.immutable_storage_id.expect("entry anchored");

    let mut subject = EntryCredential {
        date_created: record.date_created,
        user_identity: record.user_identity.clone(),
        hash: record.hash.clone(),
        signature: record.signature.clone(),
        index: record.index,
    };
    mutate(&mut subject);

    let jwt = ctx
        .identity
        .issue_credential(
            NODE,
            "auditable-item-stream",
            ENTRY_CREDENTIAL_TYPE,
            serde_json::to_value(&subject).expect("serializable"),
        )
        .await
        .expect("issue forged credential");
    ctx.immutable.replace(&storage_id, jwt.into_bytes());

    let entry = ctx
        .engine
        .get_entry(
            &urn.to_string(),
            &entry_urn.to_string(),
            GetEntryOptions { verify_entry: true },
        )
        .await
        .expect("get entry");
    entry.verification.expect("verification requested").state
}

#[tokio::test]
async fn anchored_hash_mismatch_is_distinct() {
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

    let state = forge_entry_credential(&ctx, &urn, |subject| {
        subject.hash = "b3RoZXIgaGFzaA==".to_owned();
    })
    .await;
    assert_eq!(state, VerificationState::ImmutableHashMismatch);
}

#[tokio::test]
async fn anchored_signature_mismatch_is_detected() {
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

    let state = forge_entry_credential(&ctx, &urn, |subject| {
        subject.signature = "b3RoZXIgc2lnbmF0dXJl".to_owned();
    })
    .await;
    assert_eq!(state, VerificationState::ImmutableSignatureMismatch);
}

#[tokio::test]
async fn anchored_index_mismatch_is_detected() {
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

    let state = forge_entry_credential(&ctx, &urn, |subject| {
        subject.index = 5;
    })
    .await;
    assert_eq!(state, VerificationState::IndexMismatch);
}

#[tokio::test]
async fn unanchored_entries_skip_credential_checks() {
    let ctx = create_engine();

    let urn = ctx
        .engine
        .create(
            None,
            vec![note("a").into()],
            CreateStreamOptions {
                immutable_interval: Some(0),
            },
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
                ..Default::default()
            },
        )
        .await
        .expect("get entries");
    assert_eq!(
        page.entries[0].verification.as_ref().expect("verified").state,
        VerificationState::Ok
    );
}

#[tokio::test]
async fn updating_an_anchored_entry_breaks_anchor_equality() {
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
    let entry_urn = EntryUrn::new(urn.id(), stored_entries(&ctx, &urn).await[0].id);

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

    // The anchored credential still carries the original hash; updates do
    // not re-anchor.
    let entry = ctx
        .engine
        .get_entry(
            &urn.to_string(),
            &entry_urn.to_string(),
            GetEntryOptions { verify_entry: true },
        )
        .await
        .expect("get entry");
    assert_eq!(
        entry.verification.expect("verification requested").state,
        VerificationState::ImmutableHashMismatch
    );
}
