//! Storage is organized through [journal_storage::JournalStorage].
//! The basic idea is:
//!  - There is a key-value store holding whole collections as JSON strings.
//!  - Entries and activity labels live under two independent keys.
//!  - Every mutation rewrites a full collection, there are no partial updates.

pub mod entities;
pub mod journal_storage;
pub mod key_value;
