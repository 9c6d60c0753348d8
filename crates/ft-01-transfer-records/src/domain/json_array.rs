//! # Streaming JSON Arrays
//!
//! Query and history results are written element by element through a serde
//! sequence serializer. Stored record bytes are embedded as `RawValue`, so
//! they appear verbatim but are still checked to be one JSON value; a
//! non-JSON stored value fails the query instead of corrupting the array.

use super::errors::TransferError;
use super::state::StateEntry;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// One rich-query row: `{"Key": <key>, "Record": <stored JSON>}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryRow {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: Box<RawValue>,
}

impl TryFrom<StateEntry> for QueryRow {
    type Error = TransferError;

    fn try_from(entry: StateEntry) -> Result<Self, Self::Error> {
        let record = raw_json(&entry.key, entry.value)?;
        Ok(Self {
            key: entry.key,
            record,
        })
    }
}

/// Wrap stored bytes as a raw JSON value without re-encoding them.
pub fn raw_json(key: &str, bytes: Vec<u8>) -> Result<Box<RawValue>, TransferError> {
    let text = String::from_utf8(bytes).map_err(|e| TransferError::QueryExecutionFailed {
        message: format!("value at {key:?} is not UTF-8: {e}"),
    })?;
    RawValue::from_string(text).map_err(|e| TransferError::QueryExecutionFailed {
        message: format!("value at {key:?} is not JSON: {e}"),
    })
}

/// Encode `rows` as a JSON array, stopping at the first failed row.
///
/// Zero rows encode as `[]`.
pub fn encode_json_array<I, T>(rows: I) -> Result<Vec<u8>, TransferError>
where
    I: IntoIterator<Item = Result<T, TransferError>>,
    T: Serialize,
{
    let mut out = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::new(&mut out);
    let mut seq = serializer.serialize_seq(None).map_err(encode_failure)?;
    for row in rows {
        seq.serialize_element(&row?).map_err(encode_failure)?;
    }
    seq.end().map_err(encode_failure)?;
    Ok(out)
}

fn encode_failure(err: serde_json::Error) -> TransferError {
    TransferError::QueryExecutionFailed {
        message: format!("failed to encode result array: {err}"),
    }
}
