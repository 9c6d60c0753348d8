//! # Node Configuration
//!
//! The node reads an optional JSON file and then applies environment
//! overrides on top of it:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `FT_CONFIG` | Path of the JSON file (the `--config` flag wins) |
//! | `FT_IDENTITY_MODE` | `generated` or `content-addressed` |
//! | `FT_PRIVATE_FILE_REFERENCE` | `true` / `false` |
//! | `FT_RICH_QUERY` | `true` / `false` |

use std::path::{Path, PathBuf};

use ft_01_transfer_records::{ConfigError, IdentityMode, TransferConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Records subsystem settings.
    pub transfer: TransferConfig,
    /// Whether the in-memory ledger answers rich queries.
    pub rich_query: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            transfer: TransferConfig::default(),
            rich_query: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum NodeConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{variable} must be true or false, got {value:?}")]
    InvalidFlag { variable: &'static str, value: String },

    #[error(transparent)]
    Transfer(#[from] ConfigError),
}

impl NodeConfig {
    /// Parse a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self, NodeConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| NodeConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| NodeConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `FT_*` overrides. `lookup` stands in for `std::env::var`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), NodeConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("FT_IDENTITY_MODE") {
            self.transfer.identity = mode.parse::<IdentityMode>()?;
            info!("Identity mode from environment: {:?}", self.transfer.identity);
        }
        if let Some(value) = lookup("FT_PRIVATE_FILE_REFERENCE") {
            self.transfer.private_file_reference = parse_flag("FT_PRIVATE_FILE_REFERENCE", &value)?;
        }
        if let Some(value) = lookup("FT_RICH_QUERY") {
            self.rich_query = parse_flag("FT_RICH_QUERY", &value)?;
        }
        Ok(())
    }
}

fn parse_flag(variable: &'static str, value: &str) -> Result<bool, NodeConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(NodeConfigError::InvalidFlag {
            variable,
            value: value.to_string(),
        }),
    }
}

/// Load the node configuration.
///
/// `path` (from `--config`) takes precedence over `FT_CONFIG`. The result
/// is validated before it is returned.
pub fn load_config<F>(path: Option<&Path>, lookup: F) -> Result<NodeConfig, NodeConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file = path
        .map(Path::to_path_buf)
        .or_else(|| lookup("FT_CONFIG").map(PathBuf::from));

    let mut config = match file {
        Some(file) => {
            info!("Loading configuration from {}", file.display());
            NodeConfig::from_file(&file)?
        }
        None => NodeConfig::default(),
    };

    config.apply_overrides(lookup)?;
    config.transfer.validate()?;
    Ok(config)
}
