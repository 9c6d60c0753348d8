//! Operation table.
//!
//! Every invocable name maps to one tagged [`Operation`] and a fixed arity.
//! Names used by earlier deployments are registered as aliases of the same
//! operations.

use std::collections::HashMap;
use std::sync::LazyLock;

/// The closed set of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    CreateTransient,
    Read,
    ReadPrivate,
    Delete,
    Complete,
    QueryByOriginator,
    QueryByRecipient,
    QueryAdHoc,
    QueryRaw,
    QueryIndex,
    History,
}

impl Operation {
    /// Canonical invocation name.
    pub const fn name(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::CreateTransient => "createTransient",
            Operation::Read => "read",
            Operation::ReadPrivate => "readPrivate",
            Operation::Delete => "delete",
            Operation::Complete => "complete",
            Operation::QueryByOriginator => "queryByOriginator",
            Operation::QueryByRecipient => "queryByRecipient",
            Operation::QueryAdHoc => "queryAdHoc",
            Operation::QueryRaw => "query",
            Operation::QueryIndex => "queryIndex",
            Operation::History => "history",
        }
    }
}

/// Accepted argument counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::Between(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }

    /// Error text for a rejected argument count.
    pub fn mismatch_message(&self) -> String {
        let expected = match *self {
            Arity::Exactly(n) => n.to_string(),
            Arity::Between(min, max) => format!("{min} or {max}"),
            Arity::AtLeast(min) => format!("at least {min}"),
        };
        format!("Incorrect number of arguments. Expecting {expected}")
    }
}

/// Operation metadata.
#[derive(Debug, Clone, Copy)]
pub struct OperationInfo {
    /// Invocation name (canonical or alias)
    pub name: &'static str,
    pub operation: Operation,
    pub arity: Arity,
    /// Does the operation write to the ledger?
    pub is_write: bool,
    /// Brief description
    pub description: &'static str,
}

impl OperationInfo {
    const fn read(
        name: &'static str,
        operation: Operation,
        arity: Arity,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            operation,
            arity,
            is_write: false,
            description,
        }
    }

    const fn write(
        name: &'static str,
        operation: Operation,
        arity: Arity,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            operation,
            arity,
            is_write: true,
            description,
        }
    }

    /// Whether `name` is an alias rather than the canonical name.
    pub fn is_alias(&self) -> bool {
        self.name != self.operation.name()
    }
}

/// Operation table - every invocable name with its metadata
pub static OPERATION_TABLE: LazyLock<HashMap<&'static str, OperationInfo>> = LazyLock::new(|| {
    use Arity::*;
    use Operation::*;

    let operations = [
        // --- Lifecycle ---
        OperationInfo::write(
            "create",
            Create,
            Between(3, 4),
            "Create a transfer from originator, file reference, recipient[, file name]",
        ),
        OperationInfo::write(
            "createTransient",
            CreateTransient,
            Exactly(0),
            "Create a transfer from the transient \"transfer\" entry",
        ),
        OperationInfo::read("read", Read, Exactly(1), "Read a transfer record"),
        OperationInfo::read(
            "readPrivate",
            ReadPrivate,
            Exactly(1),
            "Read the private details of a transfer",
        ),
        OperationInfo::write(
            "delete",
            Delete,
            Exactly(1),
            "Delete a transfer and its index entries",
        ),
        OperationInfo::write("complete", Complete, Exactly(1), "Mark a transfer as complete"),
        // --- Queries ---
        OperationInfo::read(
            "queryByOriginator",
            QueryByOriginator,
            Exactly(1),
            "Transfers sent by an originator",
        ),
        OperationInfo::read(
            "queryByRecipient",
            QueryByRecipient,
            Exactly(1),
            "Transfers addressed to a recipient",
        ),
        OperationInfo::read("queryAdHoc", QueryAdHoc, Exactly(1), "Run a caller-supplied selector"),
        OperationInfo::read("query", QueryRaw, Exactly(1), "Read the raw value of any key"),
        OperationInfo::read(
            "queryIndex",
            QueryIndex,
            AtLeast(1),
            "Scan an index by its leading field values",
        ),
        OperationInfo::read("history", History, Exactly(1), "Version history of a transfer"),
        // --- Legacy names ---
        OperationInfo::write("initTransfer", Create, Between(3, 4), "Alias of create"),
        OperationInfo::write(
            "createTransfer",
            CreateTransient,
            Exactly(0),
            "Alias of createTransient",
        ),
        OperationInfo::read("readTransfer", Read, Exactly(1), "Alias of read"),
        OperationInfo::read("queryTransfer", Read, Exactly(1), "Alias of read"),
        OperationInfo::write("markTransferAsRead", Complete, Exactly(1), "Alias of complete"),
        OperationInfo::read(
            "queryTransfersByOriginator",
            QueryByOriginator,
            Exactly(1),
            "Alias of queryByOriginator",
        ),
        OperationInfo::read(
            "queryTransfersByRecipient",
            QueryByRecipient,
            Exactly(1),
            "Alias of queryByRecipient",
        ),
        OperationInfo::read("queryTransfers", QueryAdHoc, Exactly(1), "Alias of queryAdHoc"),
        OperationInfo::read("getHistoryForTransfer", History, Exactly(1), "Alias of history"),
    ];

    operations.into_iter().map(|op| (op.name, op)).collect()
});

/// Get operation info by invocation name
pub fn lookup(function: &str) -> Option<&'static OperationInfo> {
    OPERATION_TABLE.get(function)
}
