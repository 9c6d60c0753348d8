//! Index Manager
//!
//! Keeps one marker entry per configured index for every live record.
//! Markers are written after the primary record and removed after it; a
//! failure in between is reported, not repaired. Rebuilding the markers from a
//! full primary scan is the recovery path.

use crate::domain::composite::printable_key;
use crate::domain::errors::{LedgerError, TransferError};
use crate::domain::index::{IndexEntry, IndexSpec, INDEX_MARKER};
use crate::domain::json_array::encode_json_array;
use crate::domain::record::TransferRecord;
use crate::ports::outbound::Ledger;

/// Maintains and scans the configured secondary indexes.
#[derive(Debug, Clone)]
pub struct IndexManager {
    specs: Vec<IndexSpec>,
    /// Namespace of composite primary keys; `None` when records are stored
    /// under plain ids.
    primary_namespace: Option<String>,
}

impl IndexManager {
    pub fn new(specs: Vec<IndexSpec>, primary_namespace: Option<String>) -> Self {
        Self {
            specs,
            primary_namespace,
        }
    }

    pub fn specs(&self) -> &[IndexSpec] {
        &self.specs
    }

    fn primary_attributes(
        &self,
        ledger: &dyn Ledger,
        key: &str,
    ) -> Result<Vec<String>, LedgerError> {
        match &self.primary_namespace {
            Some(_) => Ok(ledger.split_composite_key(key)?.1),
            None => Ok(vec![key.to_string()]),
        }
    }

    fn primary_key(
        &self,
        ledger: &dyn Ledger,
        attributes: &[String],
    ) -> Result<String, LedgerError> {
        match (&self.primary_namespace, attributes) {
            (None, [id]) => Ok(id.clone()),
            (Some(namespace), _) => {
                let attributes: Vec<&str> = attributes.iter().map(String::as_str).collect();
                ledger.create_composite_key(namespace, &attributes)
            }
            (None, _) => Err(LedgerError::InvalidCompositeKey {
                message: format!("expected one id attribute, got {}", attributes.len()),
            }),
        }
    }

    /// Composite key of the entry in `spec` for `record` stored under `key`.
    pub fn index_key(
        &self,
        ledger: &dyn Ledger,
        spec: &IndexSpec,
        key: &str,
        record: &TransferRecord,
    ) -> Result<String, LedgerError> {
        let primary = self.primary_attributes(ledger, key)?;
        let primary: Vec<&str> = primary.iter().map(String::as_str).collect();
        let attributes = spec
            .attributes(record, &primary)
            .map_err(|field| LedgerError::InvalidCompositeKey {
                message: format!("record {} has no {}", record.id, field.json_name()),
            })?;
        ledger.create_composite_key(&spec.name, &attributes)
    }

    /// Write the marker of every index for a record freshly stored under `key`.
    pub fn create_index(
        &self,
        ledger: &mut dyn Ledger,
        key: &str,
        record: &TransferRecord,
    ) -> Result<(), TransferError> {
        for spec in &self.specs {
            let write_failed = |e: LedgerError| TransferError::IndexWriteFailed {
                index: spec.name.clone(),
                message: e.to_string(),
            };
            let index_key = self.index_key(ledger, spec, key, record).map_err(write_failed)?;
            ledger.put_state(&index_key, &INDEX_MARKER).map_err(write_failed)?;

            #[cfg(feature = "tracing-log")]
            tracing::debug!("[ft-01] Index entry written: {}", printable_key(&index_key));
        }
        Ok(())
    }

    /// Remove the marker of every index for the record stored under `key`.
    ///
    /// `record` must be the decoded record as it was stored, since the
    /// marker keys are derived from its field values.
    pub fn drop_index(
        &self,
        ledger: &mut dyn Ledger,
        key: &str,
        record: &TransferRecord,
    ) -> Result<(), TransferError> {
        for spec in &self.specs {
            self.index_key(ledger, spec, key, record)
                .and_then(|index_key| ledger.delete_state(&index_key))
                .map_err(|e| TransferError::IndexDeleteFailed {
                    index: spec.name.clone(),
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// JSON array of the entries of `index` whose leading attributes equal
    /// `values`. Party names are matched case-insensitively.
    pub fn scan(
        &self,
        ledger: &dyn Ledger,
        index: &str,
        values: &[&str],
    ) -> Result<Vec<u8>, TransferError> {
        let spec = self
            .specs
            .iter()
            .find(|spec| spec.name == index)
            .ok_or_else(|| TransferError::invalid_argument(format!("Unknown index: {index}")))?;

        if values.len() > spec.fields.len() {
            return Err(TransferError::invalid_argument(format!(
                "Index {index} has {} fields, got {} values",
                spec.fields.len(),
                values.len()
            )));
        }

        let normalized: Vec<String> = spec
            .fields
            .iter()
            .zip(values)
            .map(|(field, value)| field.normalize(value))
            .collect();
        let prefix: Vec<&str> = normalized.iter().map(String::as_str).collect();

        #[cfg(feature = "tracing-log")]
        tracing::debug!("[ft-01] Scanning index {} with {:?}", index, prefix);

        let entries = ledger
            .get_state_by_partial_composite_key(&spec.name, &prefix)
            .map_err(TransferError::from_query_failure)?;

        encode_json_array(entries.map(|entry| {
            let entry = entry.map_err(TransferError::from_query_failure)?;
            let (_, attributes) = ledger
                .split_composite_key(&entry.key)
                .map_err(TransferError::from_query_failure)?;
            let malformed = || TransferError::QueryExecutionFailed {
                message: format!("malformed index entry {}", printable_key(&entry.key)),
            };
            let (attributes, primary) = spec.split_entry(attributes).ok_or_else(malformed)?;
            let id = self.primary_key(ledger, &primary).map_err(|_| malformed())?;
            Ok(IndexEntry {
                index: spec.name.clone(),
                attributes,
                id,
            })
        }))
    }
}
