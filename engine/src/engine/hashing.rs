use ais_common::jsonld;
use base64ct::{Base64, Encoding};
use blake2::{Blake2b, Digest, digest::consts::U32};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use super::RecordRef;

type Blake2b256 = Blake2b<U32>;

/// Digest of the identity-bound tuple of a record.
///
/// Byte layout is the UTF-8 concatenation of: id hex, RFC 3339
/// `dateCreated`, node identity, user identity — and, for entries, the
/// canonical bytes of the entry object followed by the decimal index. The
/// stream's annotation object is deliberately absent: it is the only
/// mutable stream attribute and updates must not invalidate the signature.
pub(super) fn digest_record(node_identity: &str, record: RecordRef<'_>) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    match record {
        RecordRef::Stream(stream) => {
            hasher.update(stream.id.to_hex().as_bytes());
            hasher.update(rfc3339(&stream.date_created).as_bytes());
            hasher.update(node_identity.as_bytes());
            hasher.update(stream.user_identity.as_bytes());
        }
        RecordRef::Entry(entry) => {
            hasher.update(entry.id.to_hex().as_bytes());
            hasher.update(rfc3339(&entry.date_created).as_bytes());
            hasher.update(node_identity.as_bytes());
            hasher.update(entry.user_identity.as_bytes());
            hasher.update(jsonld::canonical_bytes(&entry.entry_object));
            hasher.update(entry.index.to_string().as_bytes());
        }
    }
    hasher.finalize().into()
}

pub(super) fn to_base64(bytes: &[u8]) -> String {
    Base64::encode_string(bytes)
}

pub(super) fn from_base64(s: &str) -> Option<Vec<u8>> {
    Base64::decode_vec(s).ok()
}

fn rfc3339(timestamp: &OffsetDateTime) -> String {
    timestamp.format(&Rfc3339).expect("well formed timestamp")
}
