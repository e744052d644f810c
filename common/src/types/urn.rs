use std::{fmt, str::FromStr};

/// Namespace segment carried by every stream and entry URN.
pub const URN_NAMESPACE: &str = "ais";

const RAW_ID_LEN: usize = 32;
const HEX_ID_LEN: usize = RAW_ID_LEN * 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrnError {
    #[error("URN namespace `{found}` does not match `{URN_NAMESPACE}`")]
    NamespaceMismatch { found: String },
    #[error("malformed URN: {0}")]
    Malformed(String),
}

/// Random 64-hex identifier for a stream or an entry.
///
/// The raw form is 32 random bytes; the lowercase hex rendering is the
/// stable on-wire identifier and the primary key used by the entity stores.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId([u8; RAW_ID_LEN]);

impl RecordId {
    pub fn random() -> Self {
        Self(rand::random())
    }

    pub fn from_bytes(bytes: [u8; RAW_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; RAW_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for RecordId {
    type Err = UrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != HEX_ID_LEN || s.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(UrnError::Malformed(format!(
                "identifier must be {HEX_ID_LEN} lowercase hex characters: `{s}`"
            )));
        }
        let mut bytes = [0u8; RAW_ID_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| UrnError::Malformed(format!("identifier `{s}`: {e}")))?;
        Ok(Self(bytes))
    }
}

impl serde::Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// URN identifying a stream: `ais:<64 lowercase hex>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamUrn(RecordId);

impl StreamUrn {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }

    pub fn id(&self) -> RecordId {
        self.0
    }
}

impl fmt::Display for StreamUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{URN_NAMESPACE}:{}", self.0)
    }
}

impl fmt::Debug for StreamUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for StreamUrn {
    type Err = UrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_namespaced(s)?;
        match parts.as_slice() {
            [id] => Ok(Self(id.parse()?)),
            _ => Err(UrnError::Malformed(format!(
                "stream URN must carry exactly one identifier segment, found {}",
                parts.len()
            ))),
        }
    }
}

/// URN identifying an entry within a stream: `ais:<streamHex>:<entryHex>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryUrn {
    stream: RecordId,
    entry: RecordId,
}

impl EntryUrn {
    pub fn new(stream: RecordId, entry: RecordId) -> Self {
        Self { stream, entry }
    }

    pub fn stream_id(&self) -> RecordId {
        self.stream
    }

    pub fn entry_id(&self) -> RecordId {
        self.entry
    }
}

impl fmt::Display for EntryUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{URN_NAMESPACE}:{}:{}", self.stream, self.entry)
    }
}

impl fmt::Debug for EntryUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for EntryUrn {
    type Err = UrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_namespaced(s)?;
        match parts.as_slice() {
            [stream, entry] => Ok(Self {
                stream: stream.parse()?,
                entry: entry.parse()?,
            }),
            _ => Err(UrnError::Malformed(format!(
                "entry URN must carry exactly two identifier segments, found {}",
                parts.len()
            ))),
        }
    }
}

fn split_namespaced(s: &str) -> Result<Vec<&str>, UrnError> {
    let mut segments = s.split(':');
    let namespace = segments.next().unwrap_or_default();
    if namespace != URN_NAMESPACE {
        return Err(UrnError::NamespaceMismatch {
            found: namespace.to_owned(),
        });
    }
    Ok(segments.collect())
}

macro_rules! urn_serde {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

urn_serde!(StreamUrn);
urn_serde!(EntryUrn);
