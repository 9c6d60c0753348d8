//! # Inbound Ports (Driving Ports)
//!
//! The primary API for the Transfer Records subsystem.
//!
//! Every operation runs inside the ledger transaction it is handed and
//! keeps no state between calls. Writes become visible only when the host
//! commits that transaction.

use crate::domain::errors::TransferError;
use crate::domain::record::{TransferInput, TransferRecord};
use crate::ports::outbound::Ledger;

/// Primary API for the Transfer Records subsystem.
pub trait TransferRecordsApi {
    /// Create a record and its index entries. Returns the primary key.
    ///
    /// ## Errors
    ///
    /// - `AlreadyExists`: the derived key is occupied
    /// - `IndexWriteFailed`: the primary write succeeded but an index marker did not
    /// - `LedgerIOFailed`: the existence check or primary write failed
    fn create_transfer(
        &self,
        ledger: &mut dyn Ledger,
        input: TransferInput,
    ) -> Result<String, TransferError>;

    /// Stored bytes of a record, unmodified.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no record at `id`
    fn read_transfer(&self, ledger: &dyn Ledger, id: &str) -> Result<Vec<u8>, TransferError>;

    /// Stored bytes of a record's private details.
    fn read_private_details(
        &self,
        ledger: &dyn Ledger,
        id: &str,
    ) -> Result<Vec<u8>, TransferError>;

    /// Stored bytes of any key, unmodified.
    fn read_raw(&self, ledger: &dyn Ledger, key: &str) -> Result<Vec<u8>, TransferError>;

    /// Delete a record, then its index entries and private details.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no record at `id`
    /// - `DecodeFailed`: the stored bytes are not a transfer record
    /// - `IndexDeleteFailed`: the primary delete succeeded but a marker removal did not
    fn delete_transfer(&self, ledger: &mut dyn Ledger, id: &str) -> Result<(), TransferError>;

    /// Mark a record complete. Repeatable; each call sets a new completion time.
    fn complete_transfer(
        &self,
        ledger: &mut dyn Ledger,
        id: &str,
    ) -> Result<TransferRecord, TransferError>;

    /// JSON array of `{Key, Record}` for records sent by `originator`.
    fn query_by_originator(
        &self,
        ledger: &dyn Ledger,
        originator: &str,
    ) -> Result<Vec<u8>, TransferError>;

    /// JSON array of `{Key, Record}` for records addressed to `recipient`.
    fn query_by_recipient(
        &self,
        ledger: &dyn Ledger,
        recipient: &str,
    ) -> Result<Vec<u8>, TransferError>;

    /// JSON array of `{Key, Record}` for a caller-supplied selector.
    fn query_ad_hoc(&self, ledger: &dyn Ledger, selector: &str) -> Result<Vec<u8>, TransferError>;

    /// JSON array of `{TxId, Value, Timestamp, IsDelete}`, oldest first.
    fn history(&self, ledger: &dyn Ledger, id: &str) -> Result<Vec<u8>, TransferError>;

    /// JSON array of index entries whose leading attributes equal `values`.
    fn query_index(
        &self,
        ledger: &dyn Ledger,
        index: &str,
        values: &[&str],
    ) -> Result<Vec<u8>, TransferError>;
}
