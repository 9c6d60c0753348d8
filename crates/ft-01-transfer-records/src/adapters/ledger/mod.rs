//! In-memory ledger adapter.
//!
//! - `memory`: world state, history, private collections and transactions
//! - `selector`: rich-query selector matching
//! - `faults`: failure injection for tests

mod faults;
mod memory;
mod selector;

pub use faults::LedgerFaults;
pub use memory::{InMemoryLedger, InMemoryTransaction, WriteSet};
