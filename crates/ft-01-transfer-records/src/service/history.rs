//! History Reconstructor
//!
//! Walks the ledger's version log for one key and emits
//! `[{"TxId", "Value", "Timestamp", "IsDelete"}, ...]` oldest first.
//! Deletions appear as tombstones with a `null` value.

use crate::domain::errors::TransferError;
use crate::domain::history::HistoryEntry;
use crate::domain::json_array::encode_json_array;
use crate::ports::outbound::Ledger;

/// Rebuilds a record's audit trail from the ledger.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryReconstructor;

impl HistoryReconstructor {
    /// Full history of `key`. A key that was never written yields `[]`.
    pub fn history_of(&self, ledger: &dyn Ledger, key: &str) -> Result<Vec<u8>, TransferError> {
        let versions = ledger
            .get_history_for_key(key)
            .map_err(TransferError::from_query_failure)?;

        encode_json_array(versions.map(|version| {
            version
                .map_err(TransferError::from_query_failure)
                .and_then(|modification| HistoryEntry::from_modification(key, modification))
        }))
    }
}
