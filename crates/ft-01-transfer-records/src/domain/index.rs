//! # Secondary Index Specifications
//!
//! An index is a set of marker entries in world state whose composite keys
//! are built from record fields. The marker value carries no data; the key
//! alone answers "which records have these field values".
//!
//! Every entry key ends with the attributes of the record's primary key, so
//! two records that agree on the indexed fields still get distinct entries and
//! a scanned entry leads back to a readable key. A plain primary key is a
//! single attribute; a composite one contributes its own attributes. The
//! suffix is left off when the primary key is the record id and the id is
//! already one of the indexed fields.

use super::record::TransferRecord;
use serde::{Deserialize, Serialize};

/// Value stored at every index key. An empty value would read as "absent".
pub const INDEX_MARKER: [u8; 1] = [0x00];

/// Record fields usable in an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordField {
    Id,
    Originator,
    Recipient,
    FileReference,
    FileName,
}

impl RecordField {
    /// Name of the field in the stored JSON.
    pub fn json_name(&self) -> &'static str {
        match self {
            RecordField::Id => "uuid",
            RecordField::Originator => "originator",
            RecordField::Recipient => "recipient",
            RecordField::FileReference => "fileHash",
            RecordField::FileName => "fileName",
        }
    }

    /// Party names are stored lower-cased, so lookups on them are too.
    pub fn is_case_insensitive(&self) -> bool {
        matches!(self, RecordField::Originator | RecordField::Recipient)
    }

    /// Fields a record may legitimately lack.
    pub fn is_optional(&self) -> bool {
        matches!(self, RecordField::FileName)
    }

    pub fn value_of<'r>(&self, record: &'r TransferRecord) -> Option<&'r str> {
        match self {
            RecordField::Id => Some(&record.id),
            RecordField::Originator => Some(&record.originator),
            RecordField::Recipient => Some(&record.recipient),
            RecordField::FileReference => record.file_reference.as_deref(),
            RecordField::FileName => record.file_name.as_deref(),
        }
    }

    /// Normalize a lookup value the way the field is stored.
    pub fn normalize(&self, value: &str) -> String {
        if self.is_case_insensitive() {
            value.trim().to_lowercase()
        } else {
            value.trim().to_string()
        }
    }
}

/// A named secondary index over an ordered list of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub name: String,
    pub fields: Vec<RecordField>,
}

impl IndexSpec {
    pub fn new(name: impl Into<String>, fields: Vec<RecordField>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Transfers by originator, then file reference.
    pub fn originator_hash() -> Self {
        Self::new(
            "originator~hash",
            vec![RecordField::Originator, RecordField::FileReference],
        )
    }

    /// Transfers by originator, then id. Used when file references are private.
    pub fn originator_uuid() -> Self {
        Self::new("originator~uuid", vec![RecordField::Originator, RecordField::Id])
    }

    /// Transfers by recipient, then file reference.
    pub fn recipient_hash() -> Self {
        Self::new(
            "recipient~hash",
            vec![RecordField::Recipient, RecordField::FileReference],
        )
    }

    fn indexes_id(&self) -> bool {
        self.fields.contains(&RecordField::Id)
    }

    fn appends_primary(&self, record: &TransferRecord, primary: &[&str]) -> bool {
        !(self.indexes_id() && primary == [record.id.as_str()])
    }

    /// Composite key attributes for `record`, in field order, followed by
    /// `primary`, the attributes of the key the record is stored under.
    ///
    /// Returns the first field the record has no value for.
    pub fn attributes<'r>(
        &self,
        record: &'r TransferRecord,
        primary: &[&'r str],
    ) -> Result<Vec<&'r str>, RecordField> {
        let mut attributes = self
            .fields
            .iter()
            .map(|field| field.value_of(record).ok_or(*field))
            .collect::<Result<Vec<_>, _>>()?;
        if self.appends_primary(record, primary) {
            attributes.extend_from_slice(primary);
        }
        Ok(attributes)
    }

    /// Split the attributes of a scanned index key into the indexed values
    /// and the primary key attributes.
    ///
    /// `None` when the attributes do not fit this index.
    pub fn split_entry(
        &self,
        mut attributes: Vec<String>,
    ) -> Option<(Vec<String>, Vec<String>)> {
        if attributes.len() < self.fields.len() {
            return None;
        }
        let mut primary = attributes.split_off(self.fields.len());
        if primary.is_empty() {
            let position = self.fields.iter().position(|f| *f == RecordField::Id)?;
            primary.push(attributes[position].clone());
        }
        Some((attributes, primary))
    }
}

/// One decoded index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    #[serde(rename = "Index")]
    pub index: String,
    /// Values of the indexed fields, in field order.
    #[serde(rename = "Attributes")]
    pub attributes: Vec<String>,
    /// Primary key of the record the entry points at.
    #[serde(rename = "Id")]
    pub id: String,
}
