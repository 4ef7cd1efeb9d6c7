//! Answering data queries from the store

use tally_storage::{LedgerStore, StorageResult};
use tally_types::{DataMessage, QueryMessage};

/// Build the reply to a query.
///
/// A requested account is always present in the reply, as `None` when it
/// does not exist. A requested block is only included when it is stored.
pub fn handle_query(store: &dyn LedgerStore, query: &QueryMessage) -> StorageResult<DataMessage> {
    let mut data = DataMessage {
        slot: store.last_slot()?,
        ..Default::default()
    };

    if let Some(id) = query.account {
        data.accounts.insert(id, store.get_account(&id)?);
    }

    if let Some(slot) = query.block {
        if let Some(block) = store.get_block(slot)? {
            data.blocks.insert(slot, block);
        }
    }

    tracing::debug!(
        "Answered query: accounts={}, blocks={}",
        data.accounts.len(),
        data.blocks.len()
    );
    Ok(data)
}
