//! # Adapters Module
//!
//! Adapter implementations for the Transfer Records subsystem.
//!
//! ## Modules
//!
//! - `ledger`: In-memory reference ledger with transactions, history and rich queries
//! - `infra`: Clocks and identifier generators

pub mod infra;
pub mod ledger;

pub use infra::{ManualTimeSource, SystemTimeSource, UuidGenerator};
pub use ledger::{InMemoryLedger, InMemoryTransaction, LedgerFaults, WriteSet};
