//! # tally-primitives
//!
//! Primitive types for the Tally ledger.
//!
//! This crate provides the fundamental data types used throughout the system:
//! - [`Identity`] - checksummed 34-byte public identifiers
//! - currency units and the fixed total supply

#![warn(missing_docs)]
#![warn(clippy::all)]

mod identity;

pub use identity::{Identity, IdentityError};

/// Per-account transaction counter
pub type Sequence = u32;

/// Amount in the smallest currency unit
pub type Amount = u64;

/// Block slot number
pub type Slot = u32;

/// One million
pub const ONE_MILLION: u64 = 1000 * 1000;

/// Number of whole coins in existence
pub const NUM_COINS: u64 = 21 * ONE_MILLION;

/// Sub-units per coin
pub const ONE_BILLION: u64 = 1000 * ONE_MILLION;

/// Total supply in sub-units. Balances are only ever created by genesis.
pub const TOTAL_MONEY: Amount = NUM_COINS * ONE_BILLION;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_money() {
        assert_eq!(TOTAL_MONEY, 21_000_000_000_000_000);
        assert!(TOTAL_MONEY < u64::MAX);
    }
}
