//! Account state

use serde::{Deserialize, Serialize};
use tally_primitives::{Amount, Sequence};

/// Account data
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Sequence of the last operation authorized by this account.
    /// 0 means none yet; used to prevent replays.
    pub sequence: Sequence,
    /// Current balance in sub-units
    pub balance: Amount,
}

impl Account {
    /// Create an account
    pub fn new(sequence: Sequence, balance: Amount) -> Self {
        Self { sequence, balance }
    }

    /// Fresh account holding `balance` with no authorized operations
    pub fn with_balance(balance: Amount) -> Self {
        Self {
            sequence: 0,
            balance,
        }
    }
}
