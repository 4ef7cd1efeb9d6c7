//! Layered account state

use crate::error::Rejection;
use std::collections::{BTreeMap, HashMap};
use tally_primitives::{Amount, Identity, Sequence};
use tally_types::{Account, LedgerChunk, Operation, Transaction};
use tracing::debug;

/// Identity to account mapping with an optional read-only parent.
///
/// Reads that miss the own layer fall through to the parent; writes only
/// ever touch the own layer. The parent is borrowed for the lifetime of the
/// copy, so it cannot change underneath a live copy.
#[derive(Debug, Default)]
pub struct AccountMap<'a> {
    data: HashMap<Identity, Account>,
    fallback: Option<&'a AccountMap<'a>>,
}

impl<'a> AccountMap<'a> {
    /// Create an empty root map
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy-on-write child: empty own layer, falls back to `self`
    pub fn cow_copy(&self) -> AccountMap<'_> {
        AccountMap {
            data: HashMap::new(),
            fallback: Some(self),
        }
    }

    /// Look up an account, own layer first
    pub fn get(&self, id: &Identity) -> Option<Account> {
        match self.data.get(id) {
            Some(account) => Some(*account),
            None => self.fallback.and_then(|parent| parent.get(id)),
        }
    }

    /// Write an account into the own layer
    pub fn set(&mut self, id: Identity, account: Account) {
        self.data.insert(id, account);
    }

    /// Set a balance, keeping the existing sequence (0 for a new account)
    pub fn set_balance(&mut self, id: Identity, balance: Amount) {
        let sequence = self.get(&id).map(|a| a.sequence).unwrap_or(0);
        self.set(id, Account::new(sequence, balance));
    }

    /// True if the map holds exactly `expected` for `id`.
    /// `None` matches only an absent account.
    pub fn check_equal(&self, id: &Identity, expected: Option<&Account>) -> bool {
        self.get(id).as_ref() == expected
    }

    // ==================== Transfers ====================

    /// Check a transfer against the current state without applying it
    pub fn check(&self, tx: &Transaction) -> Result<(), Rejection> {
        let sender = self.charge(tx.from, tx.sequence)?;
        let cost = tx.cost().ok_or(Rejection::CostOverflow)?;
        if cost > sender.balance {
            return Err(Rejection::InsufficientBalance {
                required: cost,
                available: sender.balance,
            });
        }
        if tx.to != tx.from {
            let recipient = self.get(&tx.to).unwrap_or_default();
            if recipient.balance.checked_add(tx.amount).is_none() {
                return Err(Rejection::RecipientOverflow(tx.to));
            }
        }
        Ok(())
    }

    /// Whether a transfer would apply. Never mutates.
    pub fn validate(&self, tx: &Transaction) -> bool {
        self.check(tx).is_ok()
    }

    /// Apply a transfer. Returns false and leaves the map unchanged if it
    /// does not validate.
    ///
    /// The fee is burned. A transfer to oneself only pays the fee.
    pub fn process(&mut self, tx: &Transaction) -> bool {
        match self.apply_transfer(tx) {
            Ok(()) => true,
            Err(reason) => {
                debug!("Rejected transfer ({}): {}", tx, reason);
                false
            }
        }
    }

    fn apply_transfer(&mut self, tx: &Transaction) -> Result<(), Rejection> {
        self.check(tx)?;
        // checked above: sender exists and can pay
        let sender = self.get(&tx.from).unwrap_or_default();
        let cost = tx.cost().unwrap_or(Amount::MAX);

        if tx.to == tx.from {
            self.set(tx.from, Account::new(tx.sequence, sender.balance - tx.fee));
            return Ok(());
        }

        let recipient = self.get(&tx.to).unwrap_or_default();
        self.set(tx.from, Account::new(tx.sequence, sender.balance - cost));
        self.set(
            tx.to,
            Account::new(recipient.sequence, recipient.balance + tx.amount),
        );
        Ok(())
    }

    // ==================== Operations ====================

    /// Check any operation against the current state.
    ///
    /// Non-transfer operations only consume the signer's sequence and fee;
    /// their bucket and document effects belong to the document store.
    pub fn check_operation(&self, op: &Operation) -> Result<(), Rejection> {
        match op {
            Operation::Transfer(tx) => self.check(tx),
            other => {
                let signer = self.charge(other.signer(), other.sequence())?;
                if other.fee() > signer.balance {
                    return Err(Rejection::InsufficientBalance {
                        required: other.fee(),
                        available: signer.balance,
                    });
                }
                Ok(())
            }
        }
    }

    /// Whether an operation would apply. Never mutates.
    pub fn validate_operation(&self, op: &Operation) -> bool {
        self.check_operation(op).is_ok()
    }

    /// Apply an operation. Returns false and leaves the map unchanged on failure.
    pub fn process_operation(&mut self, op: &Operation) -> bool {
        match self.apply_operation(op) {
            Ok(()) => true,
            Err(reason) => {
                debug!("Rejected operation ({}): {}", op, reason);
                false
            }
        }
    }

    fn apply_operation(&mut self, op: &Operation) -> Result<(), Rejection> {
        match op {
            Operation::Transfer(tx) => self.apply_transfer(tx),
            other => {
                self.check_operation(other)?;
                let signer = self.get(&other.signer()).unwrap_or_default();
                self.set(
                    other.signer(),
                    Account::new(other.sequence(), signer.balance - other.fee()),
                );
                Ok(())
            }
        }
    }

    /// The signer's account, provided `sequence` is the next one it may use
    fn charge(&self, signer: Identity, sequence: Sequence) -> Result<Account, Rejection> {
        let account = self.get(&signer).ok_or(Rejection::UnknownSigner(signer))?;
        let expected = account
            .sequence
            .checked_add(1)
            .ok_or(Rejection::SequenceExhausted(signer))?;
        if sequence != expected {
            return Err(Rejection::BadSequence {
                expected,
                got: sequence,
            });
        }
        Ok(account)
    }

    // ==================== Chunks ====================

    /// Apply every operation of a chunk in order, then check the chunk's
    /// expected state.
    ///
    /// On failure the operations applied before the failing one stay applied.
    /// Use [`validate_chunk`](Self::validate_chunk) or a
    /// [`cow_copy`](Self::cow_copy) when that is not acceptable.
    pub fn process_chunk(&mut self, chunk: &LedgerChunk) -> bool {
        if chunk.is_oversized() {
            debug!("Rejected chunk: {} operations", chunk.len());
            return false;
        }

        for (index, signed) in chunk.operations.iter().enumerate() {
            if !signed.verify() {
                debug!("Rejected chunk: operation {} failed verification", index);
                return false;
            }
            if let Err(reason) = self.apply_operation(signed.operation()) {
                debug!(
                    "Rejected chunk: operation {} ({}): {}",
                    index,
                    signed.operation(),
                    reason
                );
                return false;
            }
        }

        for (id, expected) in &chunk.state {
            if !self.check_equal(id, expected.as_ref()) {
                debug!(
                    "Rejected chunk: state mismatch for {}: expected {:?}, have {:?}",
                    id.short(),
                    expected,
                    self.get(id)
                );
                return false;
            }
        }

        true
    }

    /// Whether [`process_chunk`](Self::process_chunk) would succeed.
    /// Runs on a throwaway copy, so `self` is never modified.
    pub fn validate_chunk(&self, chunk: &LedgerChunk) -> bool {
        self.cow_copy().process_chunk(chunk)
    }

    // ==================== Inspection ====================

    /// Largest balance in the own layer or any ancestor layer, including
    /// entries shadowed by a child
    pub fn max_balance(&self) -> Amount {
        let own = self.data.values().map(|a| a.balance).max().unwrap_or(0);
        let inherited = self.fallback.map(|parent| parent.max_balance()).unwrap_or(0);
        own.max(inherited)
    }

    /// Every visible account, children overriding parents
    pub fn accounts(&self) -> BTreeMap<Identity, Account> {
        let mut all = self
            .fallback
            .map(|parent| parent.accounts())
            .unwrap_or_default();
        all.extend(self.data.iter().map(|(id, account)| (*id, *account)));
        all
    }

    /// Accounts written to the own layer
    pub fn changes(&self) -> impl Iterator<Item = (&Identity, &Account)> {
        self.data.iter()
    }

    /// Number of accounts written to the own layer
    pub fn change_count(&self) -> usize {
        self.data.len()
    }

    /// Sum of every visible balance
    pub fn total_balance(&self) -> u128 {
        self.accounts().values().map(|a| a.balance as u128).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_crypto::KeyPair;
    use tally_types::{DeleteOperation, SignedOperation};

    const GENESIS_BALANCE: Amount = 1_000_000_000;

    fn genesis() -> KeyPair {
        KeyPair::from_secret_phrase("genesis")
    }

    fn bob() -> Identity {
        Identity::from_payload([0xb0; 32])
    }

    fn seeded() -> AccountMap<'static> {
        let mut map = AccountMap::new();
        map.set_balance(genesis().identity(), GENESIS_BALANCE);
        map
    }

    fn send(
        from: Identity,
        to: Identity,
        amount: Amount,
        fee: Amount,
        sequence: Sequence,
    ) -> Transaction {
        Transaction {
            from,
            sequence,
            fee,
            to,
            amount,
        }
    }

    // ==================== get/set tests ====================

    #[test]
    fn test_get_missing() {
        let map = AccountMap::new();
        assert_eq!(map.get(&bob()), None);
        assert!(map.check_equal(&bob(), None));
    }

    #[test]
    fn test_set_balance_keeps_sequence() {
        let mut map = AccountMap::new();
        map.set(bob(), Account::new(5, 10));
        map.set_balance(bob(), 99);
        assert_eq!(map.get(&bob()), Some(Account::new(5, 99)));

        let carol = Identity::from_payload([0xc0; 32]);
        map.set_balance(carol, 7);
        assert_eq!(map.get(&carol), Some(Account::new(0, 7)));
    }

    #[test]
    fn test_check_equal() {
        let map = seeded();
        let g = genesis().identity();
        assert!(map.check_equal(&g, Some(&Account::new(0, GENESIS_BALANCE))));
        let stale = Account::new(1, GENESIS_BALANCE);
        assert!(!map.check_equal(&g, Some(&stale)));
        assert!(!map.check_equal(&g, None));
        assert!(!map.check_equal(&bob(), Some(&Account::default())));
    }

    // ==================== Transfer tests ====================

    #[test]
    fn test_process_transfer() {
        let mut map = seeded();
        let g = genesis().identity();
        assert!(map.process(&send(g, bob(), 500, 1, 1)));
        assert_eq!(map.get(&g), Some(Account::new(1, 999_999_499)));
        assert_eq!(map.get(&bob()), Some(Account::new(0, 500)));
    }

    #[test]
    fn test_skipped_sequence_rejected() {
        let mut map = seeded();
        let g = genesis().identity();
        let tx = send(g, bob(), 500, 1, 2);
        assert_eq!(
            map.check(&tx),
            Err(Rejection::BadSequence {
                expected: 1,
                got: 2
            })
        );
        assert!(!map.process(&tx));
        assert_eq!(map.get(&g), Some(Account::new(0, GENESIS_BALANCE)));
        assert_eq!(map.get(&bob()), None);
    }

    #[test]
    fn test_replayed_sequence_rejected() {
        let mut map = seeded();
        let g = genesis().identity();
        let tx = send(g, bob(), 1, 0, 1);
        assert!(map.process(&tx));
        assert!(!map.process(&tx));
        assert!(!map.validate(&send(g, bob(), 1, 0, 0)));
    }

    #[test]
    fn test_unknown_sender_rejected() {
        let map = seeded();
        assert_eq!(
            map.check(&send(bob(), genesis().identity(), 0, 0, 1)),
            Err(Rejection::UnknownSigner(bob()))
        );
    }

    #[test]
    fn test_exact_balance_allowed() {
        let mut map = seeded();
        let g = genesis().identity();
        assert!(!map.validate(&send(g, bob(), GENESIS_BALANCE, 1, 1)));
        assert!(map.process(&send(g, bob(), GENESIS_BALANCE - 1, 1, 1)));
        assert_eq!(map.get(&g), Some(Account::new(1, 0)));
    }

    #[test]
    fn test_cost_overflow_rejected() {
        let map = seeded();
        let tx = send(genesis().identity(), bob(), Amount::MAX, 1, 1);
        assert_eq!(map.check(&tx), Err(Rejection::CostOverflow));
    }

    #[test]
    fn test_recipient_overflow_rejected() {
        let mut map = seeded();
        map.set(bob(), Account::new(0, Amount::MAX));
        let tx = send(genesis().identity(), bob(), 1, 0, 1);
        assert_eq!(map.check(&tx), Err(Rejection::RecipientOverflow(bob())));
    }

    #[test]
    fn test_self_transfer_only_burns_fee() {
        let mut map = seeded();
        let g = genesis().identity();
        assert!(map.process(&send(g, g, 400, 3, 1)));
        assert_eq!(map.get(&g), Some(Account::new(1, GENESIS_BALANCE - 3)));
        assert_eq!(map.total_balance(), (GENESIS_BALANCE - 3) as u128);
    }

    #[test]
    fn test_fee_is_burned() {
        let mut map = seeded();
        let g = genesis().identity();
        assert!(map.process(&send(g, bob(), 100, 10, 1)));
        assert_eq!(map.total_balance(), (GENESIS_BALANCE - 10) as u128);
    }

    #[test]
    fn test_sequence_exhausted() {
        let mut map = AccountMap::new();
        map.set(bob(), Account::new(Sequence::MAX, 10));
        let tx = send(bob(), genesis().identity(), 1, 0, 0);
        assert_eq!(map.check(&tx), Err(Rejection::SequenceExhausted(bob())));
    }

    // ==================== Non-transfer operation tests ====================

    #[test]
    fn test_delete_charges_signer() {
        let mut map = seeded();
        let g = genesis().identity();
        let op = Operation::Delete(DeleteOperation {
            signer: g,
            sequence: 1,
            fee: 5,
            id: 9,
        });
        assert!(map.validate_operation(&op));
        assert!(map.process_operation(&op));
        assert_eq!(map.get(&g), Some(Account::new(1, GENESIS_BALANCE - 5)));
        assert!(!map.process_operation(&op));
    }

    #[test]
    fn test_operation_fee_above_balance() {
        let mut map = AccountMap::new();
        map.set(bob(), Account::new(0, 4));
        let op = Operation::Delete(DeleteOperation {
            signer: bob(),
            sequence: 1,
            fee: 5,
            id: 9,
        });
        assert!(!map.process_operation(&op));
        assert_eq!(map.get(&bob()), Some(Account::new(0, 4)));
    }

    // ==================== Copy-on-write tests ====================

    #[test]
    fn test_cow_copy_isolation() {
        let parent = seeded();
        let g = genesis().identity();
        {
            let mut child = parent.cow_copy();
            assert_eq!(child.get(&g), parent.get(&g));
            assert!(child.process(&send(g, bob(), 500, 1, 1)));
            assert_eq!(child.get(&bob()), Some(Account::new(0, 500)));
            assert_eq!(child.change_count(), 2);
        }
        assert_eq!(parent.get(&g), Some(Account::new(0, GENESIS_BALANCE)));
        assert_eq!(parent.get(&bob()), None);
    }

    #[test]
    fn test_nested_copies() {
        let root = seeded();
        let g = genesis().identity();
        let mut child = root.cow_copy();
        assert!(child.process(&send(g, bob(), 10, 0, 1)));
        let mut grandchild = child.cow_copy();
        assert!(grandchild.process(&send(g, bob(), 10, 0, 2)));

        assert_eq!(grandchild.get(&bob()), Some(Account::new(0, 20)));
        assert_eq!(grandchild.accounts().len(), 2);
        assert_eq!(grandchild.changes().count(), 2);
        assert_eq!(grandchild.total_balance(), GENESIS_BALANCE as u128);
    }

    #[test]
    fn test_max_balance_includes_parent_layers() {
        let root = seeded();
        let g = genesis().identity();
        let mut child = root.cow_copy();
        child.set(g, Account::new(0, 3));
        child.set(bob(), Account::new(0, 7));
        assert_eq!(child.max_balance(), GENESIS_BALANCE);
        assert_eq!(AccountMap::new().max_balance(), 0);
    }

    // ==================== Chunk tests ====================

    fn signed_send(
        kp: &KeyPair,
        to: Identity,
        amount: Amount,
        sequence: Sequence,
    ) -> SignedOperation {
        let tx = send(kp.identity(), to, amount, 0, sequence);
        SignedOperation::sign(kp, Operation::Transfer(tx)).unwrap()
    }

    #[test]
    fn test_process_chunk_with_expected_state() {
        let kp = genesis();
        let mut map = seeded();
        let mut chunk = LedgerChunk::default();
        chunk.operations.push(signed_send(&kp, bob(), 100, 1));
        chunk.state.insert(kp.identity(), Some(Account::new(1, GENESIS_BALANCE - 100)));
        chunk.state.insert(bob(), Some(Account::new(0, 100)));

        assert!(map.validate_chunk(&chunk));
        assert!(map.process_chunk(&chunk));
        assert_eq!(map.get(&bob()), Some(Account::new(0, 100)));
    }

    #[test]
    fn test_chunk_expected_absent_account() {
        let kp = genesis();
        let carol = Identity::from_payload([0xc0; 32]);
        let mut map = seeded();
        let mut chunk = LedgerChunk::default();
        chunk.operations.push(signed_send(&kp, bob(), 100, 1));
        chunk.state.insert(carol, None);
        assert!(map.process_chunk(&chunk));

        chunk.state.insert(bob(), None);
        assert!(!seeded().validate_chunk(&chunk));
    }

    #[test]
    fn test_chunk_with_bad_signature() {
        let kp = genesis();
        let mallory = KeyPair::from_secret_phrase("mallory");
        let tx = send(kp.identity(), bob(), 100, 0, 1);
        let forged = SignedOperation::sign(&mallory, Operation::Transfer(tx)).unwrap();
        let chunk = LedgerChunk::new(vec![forged], BTreeMap::new());

        let mut map = seeded();
        assert!(!map.process_chunk(&chunk));
        assert_eq!(map.get(&bob()), None);
    }

    #[test]
    fn test_oversized_chunk_rejected() {
        let kp = genesis();
        let ops = (1..=101).map(|s| signed_send(&kp, bob(), 1, s)).collect();
        let chunk = LedgerChunk::new(ops, BTreeMap::new());
        let mut map = seeded();
        assert!(!map.process_chunk(&chunk));
        assert_eq!(map.get(&bob()), None);
    }

    #[test]
    fn test_partial_application_is_kept() {
        let kp = genesis();
        let mut map = seeded();
        map.set_balance(kp.identity(), 150);

        // second transfer spends more than is left after the first
        let chunk = LedgerChunk::new(
            vec![
                signed_send(&kp, bob(), 100, 1),
                signed_send(&kp, bob(), 100, 2),
            ],
            BTreeMap::new(),
        );

        assert!(!map.validate_chunk(&chunk));
        assert_eq!(map.get(&kp.identity()), Some(Account::new(0, 150)));
        assert_eq!(map.get(&bob()), None);

        assert!(!map.process_chunk(&chunk));
        assert_eq!(map.get(&kp.identity()), Some(Account::new(1, 50)));
        assert_eq!(map.get(&bob()), Some(Account::new(0, 100)));
    }

    #[test]
    fn test_state_mismatch_keeps_applied_operations() {
        let kp = genesis();
        let mut map = seeded();
        let mut chunk = LedgerChunk::default();
        chunk.operations.push(signed_send(&kp, bob(), 100, 1));
        chunk.state.insert(bob(), Some(Account::new(0, 101)));

        assert!(!map.process_chunk(&chunk));
        assert_eq!(map.get(&bob()), Some(Account::new(0, 100)));
    }

    #[test]
    fn test_copies_are_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AccountMap<'static>>();
    }
}
