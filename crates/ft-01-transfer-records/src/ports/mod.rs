//! # Ports Layer
//!
//! Defines the port traits for the Transfer Records subsystem.
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving ports (API exposed to the dispatcher and hosts)
//! - `outbound.rs` - Driven ports (ledger, clock and id generation)

pub mod inbound;
pub mod outbound;
