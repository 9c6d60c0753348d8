//! # Integration Flows
//!
//! End-to-end invocations through the dispatcher against the in-memory
//! ledger, one committed transaction per call, the way a host drives them.

pub mod lifecycle_flows;
pub mod query_history_flows;

#[cfg(test)]
pub(crate) mod support {
    use ft_01_transfer_records::{
        InMemoryLedger, Response, TransferConfig, TransferDispatcher, TransferErrorKind,
        SystemTimeSource, TransferRecordService, TransferRecordsApi, UuidGenerator,
    };

    /// Dispatcher with the production clock and id generator.
    pub(crate) type DefaultDispatcher =
        TransferDispatcher<TransferRecordService<SystemTimeSource, UuidGenerator>>;

    /// Fresh ledger and dispatcher for `config`.
    pub(crate) fn setup(config: TransferConfig) -> (DefaultDispatcher, InMemoryLedger) {
        let dispatcher = TransferDispatcher::with_defaults(config).expect("valid config");
        (dispatcher, InMemoryLedger::new())
    }

    /// Invoke and require success; returns the payload as text.
    pub(crate) fn ok<S: TransferRecordsApi>(
        ledger: &mut InMemoryLedger,
        dispatcher: &TransferDispatcher<S>,
        function: &str,
        args: &[&str],
    ) -> String {
        let response = ledger.invoke(dispatcher, function, args);
        assert!(response.is_ok(), "{function} failed: {}", response.message);
        response.payload_str().unwrap_or_default().to_string()
    }

    /// Invoke and require failure; returns the error kind.
    pub(crate) fn fails<S: TransferRecordsApi>(
        ledger: &mut InMemoryLedger,
        dispatcher: &TransferDispatcher<S>,
        function: &str,
        args: &[&str],
    ) -> TransferErrorKind {
        let response: Response = ledger.invoke(dispatcher, function, args);
        assert!(!response.is_ok(), "{function} unexpectedly succeeded");
        response.error_payload().expect("JSON error payload").error_type
    }

    /// Parse a payload that must be a JSON array.
    pub(crate) fn array(payload: &str) -> Vec<serde_json::Value> {
        serde_json::from_str(payload).expect("payload is a JSON array")
    }
}
