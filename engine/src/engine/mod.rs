//! The stream engine: orchestrates hashing, signing, anchoring,
//! persistence and verification for streams and their entries.

pub mod error;

mod core;
mod credential;
mod cursor;
mod entries;
mod hashing;
mod streams;
mod verify;

use ais_common::types::{entry::EntryRecord, stream::StreamRecord};

pub use core::StreamEngine;

/// Tagged reference to either record kind, dispatched on by hashing and
/// verification.
#[derive(Debug, Clone, Copy)]
pub enum RecordRef<'a> {
    Stream(&'a StreamRecord),
    Entry(&'a EntryRecord),
}

impl RecordRef<'_> {
    pub fn id_hex(&self) -> String {
        match self {
            RecordRef::Stream(stream) => stream.id.to_hex(),
            RecordRef::Entry(entry) => entry.id.to_hex(),
        }
    }
}
