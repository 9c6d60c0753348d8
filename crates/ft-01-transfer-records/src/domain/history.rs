//! # History Entries
//!
//! Audit-trail rows derived from the ledger's per-key version log.

use super::errors::TransferError;
use super::json_array::raw_json;
use super::state::KeyModification;
use super::time::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// One version of a record.
///
/// Serialized as `{"TxId", "Value", "Timestamp", "IsDelete"}` with `Value`
/// `null` for deletions and `Timestamp` as an RFC 3339 UTC instant.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "TxId")]
    pub tx_id: String,
    #[serde(rename = "Value")]
    pub value: Option<Box<RawValue>>,
    #[serde(rename = "Timestamp")]
    pub timestamp: Timestamp,
    #[serde(rename = "IsDelete")]
    pub is_delete: bool,
}

impl HistoryEntry {
    /// Convert one ledger version of `key`.
    pub fn from_modification(
        key: &str,
        modification: KeyModification,
    ) -> Result<Self, TransferError> {
        let timestamp = modification.timestamp.to_timestamp().ok_or_else(|| {
            TransferError::QueryExecutionFailed {
                message: format!(
                    "history timestamp out of range: {}s {}ns",
                    modification.timestamp.seconds, modification.timestamp.nanos
                ),
            }
        })?;

        let value = if modification.is_delete {
            None
        } else {
            Some(raw_json(key, modification.value)?)
        };

        Ok(Self {
            tx_id: modification.tx_id,
            value,
            timestamp,
            is_delete: modification.is_delete,
        })
    }
}
