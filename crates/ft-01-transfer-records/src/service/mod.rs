//! # Transfer Records Service
//!
//! The main service implementing the Transfer Records API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `TransferRecordsApi` (lifecycle, query, history)
//! 2. Delegates marker maintenance to the `IndexManager`
//! 3. Delegates result projection to the `QueryProjector` and `HistoryReconstructor`
//! 4. Uses dependency injection for the clock and id generator
//!
//! The service holds configuration only. Every call works on the ledger
//! transaction it is given, so one instance can serve any number of
//! invocations.

mod history;
mod index;
mod lifecycle;
mod query;

pub use history::HistoryReconstructor;
pub use index::IndexManager;
pub use query::QueryProjector;

use crate::domain::config::{ConfigError, IdentityMode, TransferConfig};
use crate::ports::outbound::{IdGenerator, TimeSource};

/// The Transfer Records Service.
pub struct TransferRecordService<TS, IG>
where
    TS: TimeSource,
    IG: IdGenerator,
{
    /// Validated configuration.
    pub(crate) config: TransferConfig,
    /// Secondary index maintenance.
    pub(crate) indexes: IndexManager,
    /// Rich-query projection.
    pub(crate) projector: QueryProjector,
    /// History projection.
    pub(crate) history: HistoryReconstructor,
    /// Clock for creation and completion times.
    pub(crate) time_source: TS,
    /// Source of record ids.
    pub(crate) id_generator: IG,
}

/// Dependencies for TransferRecordService
pub struct TransferServiceDependencies<TS, IG> {
    pub time_source: TS,
    pub id_generator: IG,
}

impl<TS, IG> TransferRecordService<TS, IG>
where
    TS: TimeSource,
    IG: IdGenerator,
{
    /// Create a service after validating `config`.
    pub fn new(
        deps: TransferServiceDependencies<TS, IG>,
        config: TransferConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        #[cfg(feature = "tracing-log")]
        tracing::info!(
            "[ft-01] Transfer records service ready \
             (identity: {:?}, private file reference: {}, indexes: {})",
            config.identity,
            config.private_file_reference,
            config.indexes().len()
        );

        let primary_namespace = match config.identity {
            IdentityMode::Generated => None,
            IdentityMode::ContentAddressed => Some(config.composite_key_namespace.clone()),
        };

        Ok(Self {
            indexes: IndexManager::new(config.indexes(), primary_namespace),
            projector: QueryProjector::new(config.doc_type.clone()),
            history: HistoryReconstructor,
            time_source: deps.time_source,
            id_generator: deps.id_generator,
            config,
        })
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    pub fn index_manager(&self) -> &IndexManager {
        &self.indexes
    }
}
