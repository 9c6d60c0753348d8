//! # Node Runtime Library
//!
//! Exposes the configuration loader and the line-oriented ledger host so the
//! binary stays a thin shell and both pieces can be tested directly.
//!
//! - `config` - `NodeConfig` from a JSON file plus `FT_*` overrides
//! - `host` - `LedgerHost`, one invocation per input line

pub mod config;
pub mod host;

pub use config::{load_config, NodeConfig, NodeConfigError};
pub use host::{HostResponse, Invocation, LedgerHost};
