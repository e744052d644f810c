use ais_common::types::{
    credential::{
        ENTRY_CREDENTIAL_TYPE, EntryCredential, STREAM_CREDENTIAL_TYPE, StreamCredential,
    },
    entry::EntryRecord,
    stream::StreamRecord,
};

use super::{StreamEngine, error::AnchorError};

impl StreamEngine {
    /// Issue the stream's anchoring credential and persist it to immutable
    /// storage. Returns the storage id.
    pub(super) async fn anchor_stream(
        &self,
        stream: &StreamRecord,
    ) -> Result<String, AnchorError> {
        let subject = StreamCredential {
            date_created: stream.date_created,
            user_identity: stream.user_identity.clone(),
            hash: stream.hash.clone(),
            signature: stream.signature.clone(),
        };
        let jwt = self
            .identity
            .issue_credential(
                &stream.node_identity,
                &self.config.assertion_method_id,
                STREAM_CREDENTIAL_TYPE,
                serde_json::to_value(&subject).expect("serializable"),
            )
            .await?;
        Ok(self.immutable.store(jwt.into_bytes()).await?)
    }

    /// Issue an entry's anchoring credential and persist it. Only called
    /// for entries whose index lands on the immutable interval.
    pub(super) async fn anchor_entry(
        &self,
        node_identity: &str,
        entry: &EntryRecord,
    ) -> Result<String, AnchorError> {
        let subject = EntryCredential {
            date_created: entry.date_created,
            user_identity: entry.user_identity.clone(),
            hash: entry.hash.clone(),
            signature: entry.signature.clone(),
            index: entry.index,
        };
        let jwt = self
            .identity
            .issue_credential(
                node_identity,
                &self.config.assertion_method_id,
                ENTRY_CREDENTIAL_TYPE,
                serde_json::to_value(&subject).expect("serializable"),
            )
            .await?;
        Ok(self.immutable.store(jwt.into_bytes()).await?)
    }
}
