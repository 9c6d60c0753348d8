//! # Ledger Value Types
//!
//! Plain values handed across the `Ledger` port by its iterators.

use super::time::{from_ledger_parts, Timestamp};

/// One `(key, value)` pair produced by a range or rich query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    pub key: String,
    pub value: Vec<u8>,
}

impl StateEntry {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Commit time of a ledger transaction as the ledger reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LedgerTimestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl LedgerTimestamp {
    pub fn from_timestamp(ts: &Timestamp) -> Self {
        Self {
            seconds: ts.timestamp(),
            // Sub-second nanos are always below 2^31 outside leap seconds
            nanos: i32::try_from(ts.timestamp_subsec_nanos()).unwrap_or(999_999_999),
        }
    }

    /// Convert to an instant, `None` when the pair is out of range.
    pub fn to_timestamp(&self) -> Option<Timestamp> {
        from_ledger_parts(self.seconds, self.nanos)
    }
}

/// One version of a key in the ledger's write log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyModification {
    pub tx_id: String,
    /// Stored bytes; empty for deletes.
    pub value: Vec<u8>,
    pub timestamp: LedgerTimestamp,
    pub is_delete: bool,
}
