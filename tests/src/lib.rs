//! # File-Transfer Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── transfer_benchmarks.rs   # Create / query / history throughput
//! └── src/
//!     └── integration/
//!         ├── lifecycle_flows.rs      # Create, complete, delete across modes
//!         └── query_history_flows.rs  # Queries, index scans, audit trail
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ft-tests
//! cargo test -p ft-tests integration::lifecycle_flows
//! cargo bench -p ft-tests
//! ```

pub mod integration;
