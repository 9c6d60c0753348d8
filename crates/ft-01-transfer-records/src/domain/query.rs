//! # Rich-Query Selectors
//!
//! Selectors are built as JSON values and then encoded, so caller-supplied
//! values are always escaped.

use super::errors::TransferError;
use super::index::RecordField;
use serde_json::{json, Map, Value};

/// Selector matching records of `doc_type` whose `field` equals `value`.
///
/// `{"selector":{"docType":<doc_type>,<field>:<value>}}`, with `value`
/// normalized the way the field is stored.
pub fn field_selector(doc_type: &str, field: RecordField, value: &str) -> String {
    let mut selector = Map::new();
    selector.insert("docType".to_string(), Value::from(doc_type));
    selector.insert(field.json_name().to_string(), Value::from(field.normalize(value)));
    json!({ "selector": selector }).to_string()
}

/// Accept a caller-supplied selector verbatim. Only emptiness is checked;
/// the ledger judges the syntax.
pub fn ad_hoc_selector(query: &str) -> Result<&str, TransferError> {
    if query.trim().is_empty() {
        return Err(TransferError::invalid_argument(
            "1st argument must be a non-empty query string",
        ));
    }
    Ok(query)
}
