//! Query Projector
//!
//! Runs parameterized and ad-hoc rich queries and raw key reads, projecting
//! results into `[{"Key": ..., "Record": ...}, ...]`.
//!
//! Rich-query results may change between execution and commit (phantom
//! reads), so nothing here feeds a write decision.

use crate::domain::errors::TransferError;
use crate::domain::index::RecordField;
use crate::domain::json_array::{encode_json_array, QueryRow};
use crate::domain::query::{ad_hoc_selector, field_selector};
use crate::ports::outbound::Ledger;

/// Builds selectors and projects query results.
#[derive(Debug, Clone)]
pub struct QueryProjector {
    doc_type: String,
}

impl QueryProjector {
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
        }
    }

    /// Records of this doc type whose `field` equals `value`.
    pub fn by_field(
        &self,
        ledger: &dyn Ledger,
        field: RecordField,
        value: &str,
    ) -> Result<Vec<u8>, TransferError> {
        if value.trim().is_empty() {
            return Err(TransferError::invalid_argument(
                "1st argument must be a non-empty string",
            ));
        }
        let selector = field_selector(&self.doc_type, field, value);
        self.run(ledger, &selector)
    }

    /// Caller-supplied selector, passed to the ledger verbatim.
    pub fn ad_hoc(&self, ledger: &dyn Ledger, query: &str) -> Result<Vec<u8>, TransferError> {
        let selector = ad_hoc_selector(query)?;
        self.run(ledger, selector)
    }

    /// Stored bytes of any key.
    pub fn raw(&self, ledger: &dyn Ledger, key: &str) -> Result<Vec<u8>, TransferError> {
        ledger.get_state(key)?.ok_or_else(|| TransferError::NotFound {
            key: key.to_string(),
        })
    }

    fn run(&self, ledger: &dyn Ledger, selector: &str) -> Result<Vec<u8>, TransferError> {
        #[cfg(feature = "tracing-log")]
        tracing::debug!("[ft-01] Rich query: {}", selector);

        let results = ledger
            .get_query_result(selector)
            .map_err(TransferError::from_query_failure)?;

        // The iterator is owned by the encoder and dropped on every return path
        let payload = encode_json_array(results.map(|row| {
            row.map_err(TransferError::from_query_failure)
                .and_then(QueryRow::try_from)
        }));

        if let Err(_e) = &payload {
            #[cfg(feature = "tracing-log")]
            tracing::warn!("[ft-01] Rich query failed: {}", _e);
        }

        payload
    }
}
