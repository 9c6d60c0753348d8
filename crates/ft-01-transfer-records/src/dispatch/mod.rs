//! # Dispatch Layer
//!
//! Routes a named invocation with string arguments to the service.
//!
//! - `operations` - Closed operation set with per-operation arity
//! - `handler` - `TransferDispatcher` and its `Response`

mod handler;
mod operations;

pub use handler::{Response, TransferDispatcher, STATUS_ERROR, STATUS_OK, TRANSIENT_TRANSFER_KEY};
pub use operations::{lookup, Arity, Operation, OperationInfo, OPERATION_TABLE};
