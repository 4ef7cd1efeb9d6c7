//! # tally-storage
//!
//! Persistence for Tally: the [`LedgerStore`] interface the core relies on,
//! an in-memory implementation and JSON snapshots of it.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod memory;
mod snapshot;
mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use snapshot::StoreSnapshot;
pub use traits::{commit_changes, LedgerStore};
