//! Transfer transaction

use serde::{Deserialize, Serialize};
use std::fmt;
use tally_primitives::{Amount, Identity, Sequence};

/// Transfer of `amount` from `from` to `to`.
///
/// On the wire the sender is the operation `signer`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender, who must sign
    #[serde(rename = "signer")]
    pub from: Identity,
    /// Must be exactly one more than the sender's current sequence
    pub sequence: Sequence,
    /// Fee, burned on success
    pub fee: Amount,
    /// Recipient
    pub to: Identity,
    /// Amount credited to the recipient
    pub amount: Amount,
}

impl Transaction {
    /// Total debited from the sender, `None` on overflow
    pub fn cost(&self) -> Option<Amount> {
        self.amount.checked_add(self.fee)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "send {} from {} to {}, seq {} fee {}",
            self.amount,
            self.from.short(),
            self.to.short(),
            self.sequence,
            self.fee
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(amount: Amount, fee: Amount) -> Transaction {
        Transaction {
            from: Identity::from_payload([1u8; 32]),
            sequence: 1,
            fee,
            to: Identity::from_payload([2u8; 32]),
            amount,
        }
    }

    #[test]
    fn test_cost() {
        assert_eq!(tx(500, 1).cost(), Some(501));
        assert_eq!(tx(u64::MAX, 1).cost(), None);
    }

    #[test]
    fn test_sender_serialized_as_signer() {
        let json = serde_json::to_value(tx(5, 0)).unwrap();
        assert!(json.get("signer").is_some());
        assert!(json.get("from").is_none());
        assert_eq!(json["amount"], 5);
    }

    #[test]
    fn test_display() {
        let s = tx(500, 1).to_string();
        assert!(s.starts_with("send 500 from 010101 to 020202"));
    }
}
