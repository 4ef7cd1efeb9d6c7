//! # tally-state
//!
//! In-memory account ledger for Tally.
//!
//! [`AccountMap`] applies transfers and chunks of signed operations to a
//! layered identity-to-account mapping. A [`cow_copy`](AccountMap::cow_copy)
//! borrows its parent, so speculative validation never touches the
//! canonical state.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod account_map;
mod error;

pub use account_map::AccountMap;
pub use error::Rejection;
