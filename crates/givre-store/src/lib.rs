//! # givre-store
//!
//! Local persistence for crystallized whispers.
//!
//! The whole collection lives in a single JSON blob (50 records, newest
//! first) behind a pluggable [`StorageBackend`]. Reads are tolerant:
//! malformed legacy entries are repaired or dropped, never fatal, and an
//! empty store seeds itself with the built-in preset gallery. Storage
//! failures degrade the store to a volatile in-memory backend for the rest
//! of the session instead of surfacing errors.

pub mod backend;
pub mod records;

mod error;
mod presets;
mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::{Result, StoreError};
pub use records::SnowflakeRecord;
pub use store::RecordStore;
