use ais_common::types::{ValidationError, urn::UrnError};

use crate::connectors::{IdentityError, ImmutableStorageError, StoreError, VaultError};

#[derive(Debug, Clone, thiserror::Error)]
#[error("stream `{stream}` not found")]
pub struct StreamNotFoundError {
    pub stream: String,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("entry `{entry}` not found in stream `{stream}`")]
pub struct EntryNotFoundError {
    pub stream: String,
    pub entry: String,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("anchored credential could not be decoded: {0}")]
pub struct CredentialDecodeError(pub String);

#[derive(Debug, Clone, thiserror::Error)]
pub enum CreateStreamError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GetStreamError {
    #[error(transparent)]
    Urn(#[from] UrnError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
    #[error(transparent)]
    CredentialDecode(#[from] CredentialDecodeError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UpdateStreamError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Urn(#[from] UrnError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryStreamsError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CreateEntryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Urn(#[from] UrnError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GetEntryError {
    #[error(transparent)]
    Urn(#[from] UrnError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
    #[error(transparent)]
    EntryNotFound(#[from] EntryNotFoundError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
    #[error(transparent)]
    CredentialDecode(#[from] CredentialDecodeError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GetEntryObjectError {
    #[error(transparent)]
    Urn(#[from] UrnError),
    #[error(transparent)]
    EntryNotFound(#[from] EntryNotFoundError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UpdateEntryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Urn(#[from] UrnError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
    #[error(transparent)]
    EntryNotFound(#[from] EntryNotFoundError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoveEntryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Urn(#[from] UrnError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
    #[error(transparent)]
    EntryNotFound(#[from] EntryNotFoundError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GetEntriesError {
    #[error(transparent)]
    Urn(#[from] UrnError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
    #[error(transparent)]
    CredentialDecode(#[from] CredentialDecodeError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GetEntryObjectsError {
    #[error(transparent)]
    Urn(#[from] UrnError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
    #[error(transparent)]
    CredentialDecode(#[from] CredentialDecodeError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoveImmutableError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Urn(#[from] UrnError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub(super) enum LoadStreamError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    StreamNotFound(#[from] StreamNotFoundError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub(super) enum FindEntryError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    EntryNotFound(#[from] EntryNotFoundError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub(super) enum AnchorError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub(super) enum SetEntryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
}

impl From<AnchorError> for SetEntryError {
    fn from(e: AnchorError) -> Self {
        match e {
            AnchorError::Identity(e) => Self::Identity(e),
            AnchorError::ImmutableStorage(e) => Self::ImmutableStorage(e),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub(super) enum FindEntriesError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
    #[error(transparent)]
    CredentialDecode(#[from] CredentialDecodeError),
}

impl From<VerifyError> for FindEntriesError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::Vault(e) => Self::Vault(e),
            VerifyError::Identity(e) => Self::Identity(e),
            VerifyError::ImmutableStorage(e) => Self::ImmutableStorage(e),
            VerifyError::CredentialDecode(e) => Self::CredentialDecode(e),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub(super) enum VerifyError {
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ImmutableStorage(#[from] ImmutableStorageError),
    #[error(transparent)]
    CredentialDecode(#[from] CredentialDecodeError),
}

macro_rules! fold_into {
    ($from:ident => $to:ty { $($variant:ident),+ $(,)? }) => {
        impl From<$from> for $to {
            fn from(e: $from) -> Self {
                match e {
                    $($from::$variant(e) => Self::$variant(e),)+
                }
            }
        }
    };
}

fold_into!(LoadStreamError => GetStreamError { Store, StreamNotFound });
fold_into!(LoadStreamError => UpdateStreamError { Store, StreamNotFound });
fold_into!(LoadStreamError => CreateEntryError { Store, StreamNotFound });
fold_into!(LoadStreamError => GetEntryError { Store, StreamNotFound });
fold_into!(LoadStreamError => UpdateEntryError { Store, StreamNotFound });
fold_into!(LoadStreamError => RemoveEntryError { Store, StreamNotFound });
fold_into!(LoadStreamError => GetEntriesError { Store, StreamNotFound });
fold_into!(LoadStreamError => GetEntryObjectsError { Store, StreamNotFound });
fold_into!(LoadStreamError => RemoveImmutableError { Store, StreamNotFound });

fold_into!(FindEntryError => GetEntryError { Store, EntryNotFound });
fold_into!(FindEntryError => GetEntryObjectError { Store, EntryNotFound });
fold_into!(FindEntryError => UpdateEntryError { Store, EntryNotFound });
fold_into!(FindEntryError => RemoveEntryError { Store, EntryNotFound });

fold_into!(SetEntryError => CreateStreamError { Validation, Store, Vault, Identity, ImmutableStorage });
fold_into!(SetEntryError => CreateEntryError { Validation, Store, Vault, Identity, ImmutableStorage });
fold_into!(SetEntryError => UpdateEntryError { Validation, Store, Vault, Identity, ImmutableStorage });
fold_into!(SetEntryError => RemoveEntryError { Validation, Store, Vault, Identity, ImmutableStorage });

fold_into!(AnchorError => CreateStreamError { Identity, ImmutableStorage });

fold_into!(VerifyError => GetStreamError { Vault, Identity, ImmutableStorage, CredentialDecode });
fold_into!(VerifyError => GetEntryError { Vault, Identity, ImmutableStorage, CredentialDecode });
fold_into!(VerifyError => GetEntriesError { Vault, Identity, ImmutableStorage, CredentialDecode });

fold_into!(FindEntriesError => GetStreamError { Store, Vault, Identity, ImmutableStorage, CredentialDecode });
fold_into!(FindEntriesError => GetEntriesError { Store, Vault, Identity, ImmutableStorage, CredentialDecode });
fold_into!(FindEntriesError => GetEntryObjectsError { Store, Vault, Identity, ImmutableStorage, CredentialDecode });
