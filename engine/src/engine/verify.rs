use ais_common::types::{
    credential::{EntryCredential, StreamCredential},
    verification::{Verification, VerificationState},
};

use super::{
    RecordRef,
    error::{CredentialDecodeError, VerifyError},
    hashing,
};
use crate::engine::StreamEngine;

impl StreamEngine {
    /// Verify a record against its hash, signature and, when anchored, the
    /// credential in immutable storage.
    ///
    /// Checks run in order and the first mismatch decides the state;
    /// backend failures while checking surface as errors, never as a
    /// verification state.
    pub(super) async fn verify_record(
        &self,
        node_identity: &str,
        record: RecordRef<'_>,
    ) -> Result<Verification, VerifyError> {
        let id = record.id_hex();
        let (stored_hash, stored_signature, immutable_storage_id) = match record {
            RecordRef::Stream(stream) => (
                &stream.hash,
                &stream.signature,
                stream.immutable_storage_id.as_deref(),
            ),
            RecordRef::Entry(entry) => (
                &entry.hash,
                &entry.signature,
                entry.immutable_storage_id.as_deref(),
            ),
        };

        let digest = hashing::digest_record(node_identity, record);
        let computed_hash = hashing::to_base64(&digest);
        if computed_hash != *stored_hash {
            return Ok(Verification::hash_mismatch(
                VerificationState::HashMismatch,
                id,
                computed_hash,
                stored_hash.clone(),
            ));
        }

        let signature_verified = match hashing::from_base64(stored_signature) {
            Some(signature) => {
                self.vault
                    .verify(&self.config.vault_key_id, &digest, &signature)
                    .await?
            }
            None => false,
        };
        if !signature_verified {
            return Ok(Verification::failed(
                VerificationState::SignatureNotVerified,
                id,
            ));
        }

        if let Some(storage_id) = immutable_storage_id {
            let blob = self.immutable.get(storage_id).await?;
            let jwt = String::from_utf8(blob)
                .map_err(|e| CredentialDecodeError(format!("credential blob is not UTF-8: {e}")))?;
            let check = self.identity.check_credential(&jwt).await?;
            if check.revoked {
                return Ok(Verification::failed(
                    VerificationState::CredentialRevoked,
                    id,
                ));
            }

            let (anchored_hash, anchored_signature, anchored_index) = match record {
                RecordRef::Stream(_) => {
                    let subject: StreamCredential = serde_json::from_value(check.subject)
                        .map_err(|e| CredentialDecodeError(e.to_string()))?;
                    (subject.hash, subject.signature, None)
                }
                RecordRef::Entry(_) => {
                    let subject: EntryCredential = serde_json::from_value(check.subject)
                        .map_err(|e| CredentialDecodeError(e.to_string()))?;
                    (subject.hash, subject.signature, Some(subject.index))
                }
            };

            if anchored_hash != *stored_hash {
                return Ok(Verification::hash_mismatch(
                    VerificationState::ImmutableHashMismatch,
                    id,
                    stored_hash.clone(),
                    anchored_hash,
                ));
            }
            if anchored_signature != *stored_signature {
                return Ok(Verification::failed(
                    VerificationState::ImmutableSignatureMismatch,
                    id,
                ));
            }
            if let (RecordRef::Entry(entry), Some(anchored_index)) = (record, anchored_index)
                && anchored_index != entry.index
            {
                return Ok(Verification::failed(VerificationState::IndexMismatch, id));
            }
        }

        Ok(Verification::ok(id))
    }
}
