//! # Transfer Records Subsystem (ft-01)
//!
//! Record-management layer for file-transfer events. Records live in an
//! externally supplied ledger that provides versioning, transaction isolation,
//! rich queries and per-key history; this crate owns the record model and the
//! rules for keeping derived data consistent with it.
//!
//! ## Request Flow
//!
//! ```text
//! Host ──(function, args)──→ [TransferDispatcher]
//!                                   │
//!                 ┌─────────────────┼──────────────────────┐
//!                 ↓                 ↓                      ↓
//!        [Lifecycle Controller]  [QueryProjector]  [HistoryReconstructor]
//!           │            │              │                      │
//!           ↓            ↓              ↓                      ↓
//!      primary key   [IndexManager]  rich query          history iterator
//!           └────────────┴──────────────┴──────────────────────┘
//!                                   │
//!                               [Ledger]
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | 1 | Unique key | Create fails with `AlreadyExists` on an occupied key |
//! | 2 | Index consistency | One marker per configured index per live record |
//! | 3 | Well-formed results | Query and history payloads are valid JSON arrays |
//! | 4 | Ordered history | Versions are emitted oldest first, tombstones as `null` |
//! | 5 | Iterator release | Ledger iterators are dropped on every exit path |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Record model, index specs, selectors, JSON array encoding
//! - `ports/` - Inbound API and the outbound `Ledger` contract
//! - `service/` - Lifecycle controller, index manager, projector, history
//! - `dispatch/` - Operation table and request handler
//! - `adapters/` - In-memory ledger, clocks and identifier generators
//!
//! ## Usage
//!
//! ```ignore
//! use ft_01_transfer_records::{InMemoryLedger, TransferConfig, TransferDispatcher};
//!
//! let dispatcher = TransferDispatcher::with_defaults(TransferConfig::default())?;
//! let mut ledger = InMemoryLedger::new();
//!
//! let response = ledger.invoke(&dispatcher, "create", &["Alice", "abc123", "Bob"]);
//! let id = String::from_utf8(response.payload)?;
//! let record = ledger.invoke(&dispatcher, "read", &[id.as_str()]);
//! ```

pub mod adapters;
pub mod dispatch;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::infra::{
    ManualTimeSource, SequentialIdGenerator, SystemTimeSource, UuidGenerator,
};
pub use adapters::ledger::{InMemoryLedger, InMemoryTransaction, LedgerFaults, WriteSet};
pub use dispatch::{
    lookup, Arity, Operation, OperationInfo, Response, TransferDispatcher, OPERATION_TABLE,
    STATUS_ERROR, STATUS_OK, TRANSIENT_TRANSFER_KEY,
};
pub use domain::config::{ConfigError, IdentityMode, TransferConfig};
pub use domain::errors::{LedgerError, TransferError, TransferErrorKind, TransferErrorPayload};
pub use domain::history::HistoryEntry;
pub use domain::index::{IndexEntry, IndexSpec, RecordField};
pub use domain::record::{PrivateTransferDetails, TransferInput, TransferRecord};
pub use domain::state::{KeyModification, LedgerTimestamp, StateEntry};
pub use ports::inbound::TransferRecordsApi;
pub use ports::outbound::{IdGenerator, Ledger, TimeSource, TransientMap};
pub use service::{
    HistoryReconstructor, IndexManager, QueryProjector, TransferRecordService,
    TransferServiceDependencies,
};
