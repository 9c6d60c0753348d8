//! # Transfer Dispatcher
//!
//! Resolves an invocation name through the operation table, checks arity,
//! converts positional arguments and calls the service. Every outcome is
//! folded into a [`Response`]; the host commits the transaction only when
//! the response is OK.

use super::operations::{lookup, Operation};
use crate::adapters::infra::{SystemTimeSource, UuidGenerator};
use crate::domain::config::{ConfigError, TransferConfig};
use crate::domain::errors::{TransferError, TransferErrorPayload};
use crate::domain::record::{ordinal, TransferInput};
use crate::ports::inbound::TransferRecordsApi;
use crate::ports::outbound::Ledger;
use crate::service::{TransferRecordService, TransferServiceDependencies};

/// Status of a successful invocation.
pub const STATUS_OK: u16 = 200;
/// Status of a failed invocation.
pub const STATUS_ERROR: u16 = 500;
/// Transient-map key holding the JSON input of `createTransient`.
pub const TRANSIENT_TRANSFER_KEY: &str = "transfer";

/// Outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// JSON error payload on failure; empty on success.
    pub message: String,
    /// Operation result on success; empty on failure.
    pub payload: Vec<u8>,
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: STATUS_OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(err: &TransferError) -> Self {
        Self {
            status: STATUS_ERROR,
            message: TransferErrorPayload::from(err).to_message(),
            payload: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Payload as UTF-8 text, if it is.
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// Decoded error payload of a failed response.
    pub fn error_payload(&self) -> Option<TransferErrorPayload> {
        if self.is_ok() {
            return None;
        }
        serde_json::from_str(&self.message).ok()
    }
}

/// Routes named invocations to a [`TransferRecordsApi`] implementation.
pub struct TransferDispatcher<S: TransferRecordsApi> {
    service: S,
}

impl TransferDispatcher<TransferRecordService<SystemTimeSource, UuidGenerator>> {
    /// Dispatcher over a service with the system clock and random UUIDs.
    pub fn with_defaults(config: TransferConfig) -> Result<Self, ConfigError> {
        let deps = TransferServiceDependencies {
            time_source: SystemTimeSource,
            id_generator: UuidGenerator,
        };
        Ok(Self::new(TransferRecordService::new(deps, config)?))
    }
}

impl<S: TransferRecordsApi> TransferDispatcher<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Run `function` inside `ledger` and report the outcome.
    pub fn invoke(&self, ledger: &mut dyn Ledger, function: &str, args: &[String]) -> Response {
        #[cfg(feature = "tracing-log")]
        tracing::debug!(
            "[ft-01] Invoke {} ({} args, tx {})",
            function,
            args.len(),
            ledger.tx_id()
        );

        match self.execute(ledger, function, args) {
            Ok(payload) => Response::success(payload),
            Err(e) => {
                #[cfg(feature = "tracing-log")]
                tracing::warn!("[ft-01] {} failed: {}", function, e);
                Response::error(&e)
            }
        }
    }

    /// Run `function` and return its raw payload.
    pub fn execute(
        &self,
        ledger: &mut dyn Ledger,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, TransferError> {
        let info = lookup(function).ok_or_else(|| {
            TransferError::invalid_argument(format!(
                "Received unknown function invocation: {function}"
            ))
        })?;
        if !info.arity.accepts(args.len()) {
            return Err(TransferError::invalid_argument(info.arity.mismatch_message()));
        }

        let service = &self.service;
        match info.operation {
            Operation::Create => {
                let input = TransferInput::from_args(args)?;
                service.create_transfer(ledger, input).map(String::into_bytes)
            }
            Operation::CreateTransient => {
                let bytes = ledger
                    .get_transient()
                    .get(TRANSIENT_TRANSFER_KEY)
                    .ok_or_else(|| {
                        TransferError::invalid_argument(format!(
                            "{TRANSIENT_TRANSFER_KEY} must be a key in the transient map"
                        ))
                    })?;
                let input = TransferInput::from_transient(bytes)?;
                service.create_transfer(ledger, input).map(String::into_bytes)
            }
            Operation::Read => service.read_transfer(ledger, required(args, 0)?),
            Operation::ReadPrivate => service.read_private_details(ledger, required(args, 0)?),
            Operation::Delete => service
                .delete_transfer(ledger, required(args, 0)?)
                .map(|()| Vec::new()),
            Operation::Complete => service
                .complete_transfer(ledger, required(args, 0)?)?
                .to_bytes(),
            Operation::QueryByOriginator => service.query_by_originator(ledger, required(args, 0)?),
            Operation::QueryByRecipient => service.query_by_recipient(ledger, required(args, 0)?),
            Operation::QueryAdHoc => service.query_ad_hoc(ledger, required(args, 0)?),
            Operation::QueryRaw => service.read_raw(ledger, required(args, 0)?),
            Operation::QueryIndex => {
                let index = required(args, 0)?;
                let values = (1..args.len())
                    .map(|position| required(args, position))
                    .collect::<Result<Vec<_>, _>>()?;
                service.query_index(ledger, index, &values)
            }
            Operation::History => service.history(ledger, required(args, 0)?),
        }
    }
}

/// Positional argument that must not be blank. Passed on verbatim.
fn required(args: &[String], position: usize) -> Result<&str, TransferError> {
    match args.get(position) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(TransferError::invalid_argument(format!(
            "{} argument must be a non-empty string",
            ordinal(position + 1)
        ))),
    }
}
