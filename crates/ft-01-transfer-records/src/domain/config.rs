//! # Transfer Records Configuration
//!
//! The historical deployments differed only in how a record is keyed and
//! whether the file reference is kept off world state. Both are settings here.

use super::composite::create_composite_key;
use super::index::{IndexSpec, RecordField};
use super::record::DOC_TYPE;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

/// How a record's primary key is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityMode {
    /// A freshly generated id is the key.
    #[default]
    Generated,
    /// Composite key over `(originator, fileReference, recipient)`.
    ContentAddressed,
}

impl FromStr for IdentityMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "generated" => Ok(IdentityMode::Generated),
            "content_addressed" => Ok(IdentityMode::ContentAddressed),
            _ => Err(ConfigError::UnknownIdentityMode(s.to_string())),
        }
    }
}

/// Subsystem configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// `docType` written into and required of every record.
    pub doc_type: String,
    pub identity: IdentityMode,
    /// Keep the file reference in `private_collection` instead of the record.
    pub private_file_reference: bool,
    pub private_collection: String,
    /// Namespace of content-addressed primary keys.
    pub composite_key_namespace: String,
    /// `None` selects the default for the privacy setting.
    pub indexes: Option<Vec<IndexSpec>>,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            doc_type: DOC_TYPE.to_string(),
            identity: IdentityMode::Generated,
            private_file_reference: false,
            private_collection: "collectionTransferPrivateDetails".to_string(),
            composite_key_namespace: DOC_TYPE.to_string(),
            indexes: None,
        }
    }
}

impl TransferConfig {
    /// Generated ids with the file reference kept private.
    pub fn private_default() -> Self {
        Self {
            private_file_reference: true,
            ..Self::default()
        }
    }

    /// Content-addressed keys, public file reference.
    pub fn content_addressed() -> Self {
        Self {
            identity: IdentityMode::ContentAddressed,
            ..Self::default()
        }
    }

    /// Indexes in effect.
    pub fn indexes(&self) -> Vec<IndexSpec> {
        match &self.indexes {
            Some(indexes) => indexes.clone(),
            None if self.private_file_reference => vec![IndexSpec::originator_uuid()],
            None => vec![IndexSpec::originator_hash()],
        }
    }

    /// Reject settings that would break record or index invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.doc_type.trim().is_empty() {
            return Err(ConfigError::EmptyDocType);
        }
        if self.private_file_reference && self.private_collection.trim().is_empty() {
            return Err(ConfigError::EmptyCollection);
        }
        if self.identity == IdentityMode::ContentAddressed {
            if self.private_file_reference {
                return Err(ConfigError::PrivateFieldInIdentity);
            }
            if create_composite_key(&self.composite_key_namespace, &[]).is_err() {
                return Err(ConfigError::InvalidNamespace(
                    self.composite_key_namespace.clone(),
                ));
            }
        }

        let mut names = HashSet::new();
        for index in self.indexes() {
            if index.fields.is_empty() {
                return Err(ConfigError::InvalidIndex {
                    name: index.name,
                    reason: "an index needs at least one field".to_string(),
                });
            }
            if create_composite_key(&index.name, &[]).is_err() {
                return Err(ConfigError::InvalidIndex {
                    name: index.name,
                    reason: "name must be non-empty and free of reserved characters".to_string(),
                });
            }
            if self.identity == IdentityMode::ContentAddressed
                && index.name == self.composite_key_namespace
            {
                return Err(ConfigError::InvalidIndex {
                    name: index.name,
                    reason: "name collides with the primary key namespace".to_string(),
                });
            }
            if let Some(field) = index.fields.iter().find(|f| f.is_optional()) {
                return Err(ConfigError::InvalidIndex {
                    name: index.name,
                    reason: format!("{} is optional and cannot be indexed", field.json_name()),
                });
            }
            if self.private_file_reference && index.fields.contains(&RecordField::FileReference) {
                return Err(ConfigError::PrivateFieldIndexed { name: index.name });
            }
            if !names.insert(index.name.clone()) {
                return Err(ConfigError::DuplicateIndex { name: index.name });
            }
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("doc_type must be a non-empty string")]
    EmptyDocType,

    #[error("private_collection must be set when the file reference is private")]
    EmptyCollection,

    #[error("invalid composite key namespace: {0:?}")]
    InvalidNamespace(String),

    #[error("unknown identity mode: {0:?}")]
    UnknownIdentityMode(String),

    #[error("invalid index {name:?}: {reason}")]
    InvalidIndex { name: String, reason: String },

    #[error("index {name:?} is configured more than once")]
    DuplicateIndex { name: String },

    #[error("index {name:?} would expose the private file reference in world-state keys")]
    PrivateFieldIndexed { name: String },

    #[error("content-addressed keys would expose the private file reference")]
    PrivateFieldInIdentity,
}
