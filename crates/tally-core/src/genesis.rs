//! Genesis distribution

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tally_crypto::KeyPair;
use tally_primitives::{Amount, Identity, TOTAL_MONEY};
use tally_state::AccountMap;
use thiserror::Error;

/// Secret phrase of the account holding the whole supply in the default genesis
pub const MINT_PHRASE: &str = "mint";

/// Genesis error types
#[derive(Debug, Error)]
pub enum GenesisError {
    /// Allocation does not add up to the currency supply
    #[error("allocations total {actual}, expected {expected}")]
    SupplyMismatch {
        /// Fixed currency supply
        expected: Amount,
        /// Sum of the allocations
        actual: u128,
    },

    /// Config file could not be parsed
    #[error("invalid genesis config: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for genesis operations
pub type GenesisResult<T> = Result<T, GenesisError>;

/// Initial balances. Every allocated account starts at sequence 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Balance per identity
    #[serde(default)]
    pub alloc: BTreeMap<Identity, Amount>,
}

impl Default for GenesisConfig {
    /// The whole supply held by the identity of [`MINT_PHRASE`]
    fn default() -> Self {
        let mint = KeyPair::from_secret_phrase(MINT_PHRASE).identity();
        Self {
            alloc: BTreeMap::from([(mint, TOTAL_MONEY)]),
        }
    }
}

impl GenesisConfig {
    /// Load a genesis config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> GenesisResult<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| GenesisError::InvalidConfig(e.to_string()))
    }

    /// Sum of all allocations
    pub fn total(&self) -> u128 {
        self.alloc.values().map(|&balance| balance as u128).sum()
    }

    /// Check that the allocation distributes exactly the currency supply
    pub fn validate(&self) -> GenesisResult<()> {
        let actual = self.total();
        if actual != TOTAL_MONEY as u128 {
            return Err(GenesisError::SupplyMismatch {
                expected: TOTAL_MONEY,
                actual,
            });
        }
        Ok(())
    }

    /// Validate, then write every allocation into `map`
    pub fn seed(&self, map: &mut AccountMap<'_>) -> GenesisResult<()> {
        self.validate()?;
        for (id, balance) in &self.alloc {
            map.set_balance(*id, *balance);
            tracing::debug!("Genesis allocation: {} balance={}", id, balance);
        }
        tracing::info!("Seeded genesis: allocations={}", self.alloc.len());
        Ok(())
    }
}
