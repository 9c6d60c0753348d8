//! Fault injection for the in-memory ledger.
//!
//! Faults are matched by key prefix so a test can break, say, only the
//! `originator~hash` index while primary writes keep working.

use crate::domain::composite::create_composite_key;
use crate::domain::errors::LedgerError;

/// Configured failures. Empty by default.
#[derive(Debug, Clone, Default)]
pub struct LedgerFaults {
    put_prefixes: Vec<String>,
    delete_prefixes: Vec<String>,
    get_prefixes: Vec<String>,
    /// Iterators yield this many items, then one error.
    iterator_failure_after: Option<usize>,
    fail_queries: bool,
    fail_history: bool,
}

impl LedgerFaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `put_state` on keys starting with `prefix`.
    pub fn fail_put(mut self, prefix: impl Into<String>) -> Self {
        self.put_prefixes.push(prefix.into());
        self
    }

    /// Fail `delete_state` on keys starting with `prefix`.
    pub fn fail_delete(mut self, prefix: impl Into<String>) -> Self {
        self.delete_prefixes.push(prefix.into());
        self
    }

    /// Fail `get_state` on keys starting with `prefix`.
    pub fn fail_get(mut self, prefix: impl Into<String>) -> Self {
        self.get_prefixes.push(prefix.into());
        self
    }

    /// Fail writes and deletes of every entry of composite-key namespace `index`.
    pub fn fail_index(self, index: &str) -> Self {
        match create_composite_key(index, &[]) {
            Ok(prefix) => self.fail_put(prefix.clone()).fail_delete(prefix),
            Err(_) => self,
        }
    }

    /// Break every range, rich-query and history iterator after `n` items.
    pub fn fail_iterators_after(mut self, n: usize) -> Self {
        self.iterator_failure_after = Some(n);
        self
    }

    /// Make `get_query_result` fail outright.
    pub fn fail_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    /// Make `get_history_for_key` fail outright.
    pub fn fail_history(mut self) -> Self {
        self.fail_history = true;
        self
    }

    pub(crate) fn check_put(&self, key: &str) -> Result<(), LedgerError> {
        check(&self.put_prefixes, "put", key)
    }

    pub(crate) fn check_delete(&self, key: &str) -> Result<(), LedgerError> {
        check(&self.delete_prefixes, "delete", key)
    }

    pub(crate) fn check_get(&self, key: &str) -> Result<(), LedgerError> {
        check(&self.get_prefixes, "get", key)
    }

    pub(crate) fn check_query(&self) -> Result<(), LedgerError> {
        if self.fail_queries {
            return Err(LedgerError::Io {
                message: "injected query failure".to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_history(&self) -> Result<(), LedgerError> {
        if self.fail_history {
            return Err(LedgerError::Io {
                message: "injected history failure".to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn iterator_failure_after(&self) -> Option<usize> {
        self.iterator_failure_after
    }
}

fn check(prefixes: &[String], op: &str, key: &str) -> Result<(), LedgerError> {
    if prefixes.iter().any(|p| key.starts_with(p.as_str())) {
        return Err(LedgerError::Io {
            message: format!("injected {op} failure for {}", key.escape_debug()),
        });
    }
    Ok(())
}
