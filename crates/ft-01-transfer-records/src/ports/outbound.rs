//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the Transfer Records service.
//!
//! These are the interfaces the host ledger must provide. The ledger owns
//! consistency, conflict detection and commit; this crate only issues reads
//! and writes inside the transaction it is handed.

use crate::domain::composite;
use crate::domain::errors::LedgerError;
use crate::domain::state::{KeyModification, StateEntry};
use crate::domain::time::Timestamp;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Result stream of a range or rich query.
///
/// Dropping the iterator releases the underlying ledger cursor.
pub type StateIterator<'a> = Box<dyn Iterator<Item = Result<StateEntry, LedgerError>> + 'a>;

/// Version stream of a single key, oldest first.
pub type HistoryIterator<'a> = Box<dyn Iterator<Item = Result<KeyModification, LedgerError>> + 'a>;

/// Ephemeral per-invocation input that is never written to the ledger.
pub type TransientMap = BTreeMap<String, Vec<u8>>;

/// One ledger transaction as seen by a single invocation.
///
/// Testing: `InMemoryTransaction` (adapters/ledger/memory.rs)
pub trait Ledger {
    /// Identifier of the current transaction.
    fn tx_id(&self) -> &str;

    /// Read a key. `None` when absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write a key. Empty values are rejected by ledgers; use `delete_state`.
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Delete a key.
    fn delete_state(&mut self, key: &str) -> Result<(), LedgerError>;

    /// Deterministic, order-sensitive composite key.
    fn create_composite_key(
        &self,
        namespace: &str,
        attributes: &[&str],
    ) -> Result<String, LedgerError> {
        composite::create_composite_key(namespace, attributes)
    }

    /// Inverse of `create_composite_key`.
    fn split_composite_key(&self, key: &str) -> Result<(String, Vec<String>), LedgerError> {
        composite::split_composite_key(key)
    }

    /// Range scan over every composite key starting with
    /// `namespace` + `attributes`.
    fn get_state_by_partial_composite_key<'a>(
        &'a self,
        namespace: &str,
        attributes: &[&str],
    ) -> Result<StateIterator<'a>, LedgerError>;

    /// Run a rich query.
    ///
    /// ## Errors
    ///
    /// - `Unsupported`: the backend has no rich-query capability
    /// - `InvalidQuery`: the backend rejected the query text
    fn get_query_result<'a>(&'a self, query: &str) -> Result<StateIterator<'a>, LedgerError>;

    /// Version log of one key, oldest first.
    fn get_history_for_key<'a>(&'a self, key: &str) -> Result<HistoryIterator<'a>, LedgerError>;

    /// Read from a private collection.
    fn get_private_data(&self, collection: &str, key: &str)
        -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write to a private collection.
    fn put_private_data(
        &mut self,
        collection: &str,
        key: &str,
        value: &[u8],
    ) -> Result<(), LedgerError>;

    /// Delete from a private collection.
    fn delete_private_data(&mut self, collection: &str, key: &str) -> Result<(), LedgerError>;

    /// Transient input of the current invocation.
    fn get_transient(&self) -> &TransientMap;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current instant.
    fn now(&self) -> Timestamp;
}

/// Produces fresh record identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<T: IdGenerator + ?Sized> IdGenerator for Arc<T> {
    fn generate(&self) -> String {
        (**self).generate()
    }
}
