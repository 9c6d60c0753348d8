//! # Transfer Record Model
//!
//! The stored entity, the two input forms it is built from, and the
//! private-data split used when the file reference must stay off world state.

use super::errors::TransferError;
use super::time::{record_time_opt, truncate_to_seconds, Timestamp};
use serde::{Deserialize, Serialize};

/// Discriminator written into every transfer record.
pub const DOC_TYPE: &str = "fileTransfer";

/// Version written by this crate. Records without the field are version 1.
pub const RECORD_SCHEMA_VERSION: u32 = 2;

fn legacy_schema_version() -> u32 {
    1
}

/// A file-transfer event between two parties.
///
/// ## Lifecycle
///
/// Created once, mutated only by completion, removed only by explicit delete.
/// `id` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    #[serde(rename = "docType")]
    pub doc_type: String,
    #[serde(rename = "schemaVersion", default = "legacy_schema_version")]
    pub schema_version: u32,
    #[serde(rename = "uuid")]
    pub id: String,
    /// Lower-cased. Version 1 records stored this as `name`.
    #[serde(alias = "name")]
    pub originator: String,
    /// Lower-cased.
    pub recipient: String,
    /// Opaque content handle; `None` when kept in the private collection.
    #[serde(rename = "fileHash", default, skip_serializing_if = "Option::is_none")]
    pub file_reference: Option<String>,
    #[serde(rename = "fileName", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "transferComplete", default)]
    pub complete: bool,
    #[serde(
        rename = "creationTime",
        default,
        with = "record_time_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<Timestamp>,
    #[serde(
        rename = "completionTime",
        default,
        with = "record_time_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<Timestamp>,
}

impl TransferRecord {
    /// Build a fresh, incomplete record from validated input.
    ///
    /// With `keep_file_reference == false` the file reference is left out of
    /// the record; the caller stores it separately.
    pub fn new(
        doc_type: &str,
        id: String,
        input: &TransferInput,
        keep_file_reference: bool,
        now: Timestamp,
    ) -> Self {
        Self {
            doc_type: doc_type.to_string(),
            schema_version: RECORD_SCHEMA_VERSION,
            id,
            originator: input.originator.clone(),
            recipient: input.recipient.clone(),
            file_reference: keep_file_reference.then(|| input.file_reference.clone()),
            file_name: input.file_name.clone(),
            complete: false,
            created_at: Some(truncate_to_seconds(now)),
            completed_at: None,
        }
    }

    /// Encode to the stored JSON shape.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransferError> {
        serde_json::to_vec(self).map_err(|e| TransferError::LedgerIOFailed {
            message: format!("failed to encode transfer record: {e}"),
        })
    }

    /// Decode stored bytes read from `key`.
    ///
    /// Fails with `DecodeFailed` when the bytes are not a record or carry a
    /// different `docType`.
    pub fn decode(key: &str, bytes: &[u8], expected_doc_type: &str) -> Result<Self, TransferError> {
        let record: Self =
            serde_json::from_slice(bytes).map_err(|e| TransferError::DecodeFailed {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        if record.doc_type != expected_doc_type {
            return Err(TransferError::DecodeFailed {
                key: key.to_string(),
                message: format!(
                    "expected docType {expected_doc_type:?}, found {:?}",
                    record.doc_type
                ),
            });
        }
        Ok(record)
    }

    /// Mark as complete at `now` (whole seconds). Repeatable; the last call wins.
    pub fn mark_complete(&mut self, now: Timestamp) {
        self.complete = true;
        self.completed_at = Some(truncate_to_seconds(now));
    }
}

/// Validated, normalized create input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInput {
    pub originator: String,
    pub file_reference: String,
    pub recipient: String,
    pub file_name: Option<String>,
}

impl TransferInput {
    /// Build from positional arguments `originator, fileRef, recipient[, fileName]`.
    pub fn from_args(args: &[String]) -> Result<Self, TransferError> {
        if !(3..=4).contains(&args.len()) {
            return Err(TransferError::invalid_argument(
                "Incorrect number of arguments. Expecting 3 or 4",
            ));
        }

        let field = |position: usize| -> Result<String, TransferError> {
            non_empty(&args[position]).ok_or_else(|| {
                TransferError::invalid_argument(format!(
                    "{} argument must be a non-empty string",
                    ordinal(position + 1)
                ))
            })
        };

        Ok(Self {
            originator: field(0)?.to_lowercase(),
            file_reference: field(1)?,
            recipient: field(2)?.to_lowercase(),
            file_name: match args.len() {
                4 => Some(field(3)?),
                _ => None,
            },
        })
    }

    /// Build from the JSON object carried in the transient input map.
    ///
    /// Shape: `{"Originator", "FileHash", "Recipient", "FileName"}`;
    /// `FileName` may be omitted but not empty.
    pub fn from_transient(bytes: &[u8]) -> Result<Self, TransferError> {
        if bytes.is_empty() {
            return Err(TransferError::invalid_argument(
                "transfer value in the transient map must be a non-empty JSON string",
            ));
        }

        let raw: TransientTransfer = serde_json::from_slice(bytes).map_err(|e| {
            TransferError::invalid_argument(format!("Failed to decode JSON of transfer: {e}"))
        })?;

        let required = |value: Option<String>, name: &str| -> Result<String, TransferError> {
            value.as_deref().and_then(non_empty).ok_or_else(|| {
                TransferError::invalid_argument(format!("{name} field must be a non-empty string"))
            })
        };

        let originator = required(raw.originator, "Originator")?.to_lowercase();
        let file_reference = required(raw.file_hash, "FileHash")?;
        let recipient = required(raw.recipient, "Recipient")?.to_lowercase();
        let file_name = match raw.file_name {
            None => None,
            Some(name) => Some(required(Some(name), "FileName")?),
        };

        Ok(Self {
            originator,
            file_reference,
            recipient,
            file_name,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TransientTransfer {
    #[serde(rename = "Originator")]
    originator: Option<String>,
    #[serde(rename = "FileHash")]
    file_hash: Option<String>,
    #[serde(rename = "Recipient")]
    recipient: Option<String>,
    #[serde(rename = "FileName")]
    file_name: Option<String>,
}

/// File reference stored in the private collection, keyed like the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateTransferDetails {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(rename = "fileHash")]
    pub file_reference: String,
}

impl PrivateTransferDetails {
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransferError> {
        serde_json::to_vec(self).map_err(|e| TransferError::LedgerIOFailed {
            message: format!("failed to encode private transfer details: {e}"),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
