//! # Domain Layer
//!
//! Pure domain logic for the Transfer Records subsystem.
//! This layer performs NO ledger I/O - only types, validation and encoding.
//!
//! ## Modules
//!
//! - `record` - TransferRecord, its input forms and private split
//! - `index` - Secondary index specifications and entries
//! - `query` - Rich-query selector construction
//! - `json_array` - Streaming JSON array encoder for results
//! - `history` - History entries derived from ledger versions
//! - `composite` - Composite key encoding
//! - `state` - Value types exchanged with the ledger
//! - `time` - Ledger timestamp formatting
//! - `config` - Subsystem configuration
//! - `errors` - Domain error types

pub mod composite;
pub mod config;
pub mod errors;
pub mod history;
pub mod index;
pub mod json_array;
pub mod query;
pub mod record;
pub mod state;
pub mod time;
