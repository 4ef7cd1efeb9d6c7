//! Property tests for the account ledger

use proptest::prelude::*;
use tally_primitives::{Amount, Identity};
use tally_state::AccountMap;
use tally_types::{Account, Transaction};

fn identity(tag: u8) -> Identity {
    Identity::from_payload([tag; 32])
}

fn arb_transfer() -> impl Strategy<Value = Transaction> {
    let fields = (0u8..4, 0u8..4, 0u64..2_000, 0u64..20, 0u32..4);
    fields.prop_map(|(from, to, amount, fee, sequence)| Transaction {
        from: identity(from),
        sequence,
        fee,
        to: identity(to),
        amount,
    })
}

fn seeded() -> AccountMap<'static> {
    let mut map = AccountMap::new();
    for tag in 0..3u8 {
        map.set_balance(identity(tag), 1_000);
    }
    map
}

proptest! {
    #[test]
    fn prop_child_writes_never_reach_parent(
        txs in prop::collection::vec(arb_transfer(), 0..30),
        tag in 0u8..4,
        sequence in any::<u32>(),
        balance in any::<Amount>(),
    ) {
        let parent = seeded();
        let before = parent.accounts();
        {
            let mut child = parent.cow_copy();
            for tx in &txs {
                child.process(tx);
            }
            child.set(identity(tag), Account::new(sequence, balance));
            prop_assert_eq!(
                child.get(&identity(tag)),
                Some(Account::new(sequence, balance))
            );
        }
        prop_assert_eq!(parent.accounts(), before);
    }

    #[test]
    fn prop_process_matches_validate(txs in prop::collection::vec(arb_transfer(), 1..30)) {
        let mut map = seeded();
        for tx in &txs {
            let before = map.accounts();
            let sender = map.get(&tx.from);
            let valid = map.validate(tx);
            prop_assert_eq!(map.process(tx), valid);
            if valid {
                let sender = sender.unwrap_or_default();
                let after = map.get(&tx.from).unwrap_or_default();
                prop_assert_eq!(after.sequence, tx.sequence);
                let spent = if tx.from == tx.to {
                    tx.fee
                } else {
                    tx.amount + tx.fee
                };
                prop_assert_eq!(after.balance, sender.balance - spent);
            } else {
                prop_assert_eq!(map.accounts(), before);
            }
        }
    }

    #[test]
    fn prop_supply_only_shrinks_by_fees(txs in prop::collection::vec(arb_transfer(), 1..30)) {
        let mut map = seeded();
        let mut expected = map.total_balance();
        for tx in &txs {
            if map.process(tx) {
                expected -= tx.fee as u128;
            }
            prop_assert_eq!(map.total_balance(), expected);
        }
    }
}
