//! # tally-core
//!
//! Ledger-level procedures built on the account map and the store:
//!
//! - [`GenesisConfig`] - the initial distribution of the currency supply
//! - [`ReplayChecker`] - replays every stored block from genesis and compares
//!   the result with the stored account table
//! - [`handle_query`] - answers a [`QueryMessage`](tally_types::QueryMessage)
//!   from the store

#![warn(missing_docs)]
#![warn(clippy::all)]

mod genesis;
mod query;
mod replay;

pub use genesis::{GenesisConfig, GenesisError, GenesisResult, MINT_PHRASE};
pub use query::handle_query;
pub use replay::{AccountMismatch, ReplayChecker, ReplayError, ReplayReport};
