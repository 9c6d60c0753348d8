//! # Ledger Host
//!
//! Owns the ledger and the dispatcher. Every input line is one invocation,
//! run in its own transaction; the write set is committed only when the
//! dispatcher reports success.
//!
//! ```text
//! {"function":"create","args":["alice","h1","bob"]}
//! {"status":200,"message":"","payload":"6f1c..."}
//! ```

use std::collections::BTreeMap;

use ft_01_transfer_records::{
    InMemoryLedger, Response, TransferDispatcher, TransferError, TransferRecordsApi, TransientMap,
    STATUS_ERROR,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// One request line.
#[derive(Debug, Clone, Deserialize)]
pub struct Invocation {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Transient entries. A string is taken as its text, anything else is
    /// re-encoded as JSON.
    #[serde(default)]
    pub transient: BTreeMap<String, Value>,
}

impl Invocation {
    fn transient_map(&self) -> TransientMap {
        self.transient
            .iter()
            .map(|(key, value)| {
                let bytes = match value {
                    Value::String(text) => text.clone().into_bytes(),
                    other => other.to_string().into_bytes(),
                };
                (key.clone(), bytes)
            })
            .collect()
    }
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostResponse {
    pub status: u16,
    pub message: String,
    pub payload: String,
}

impl From<Response> for HostResponse {
    fn from(response: Response) -> Self {
        Self {
            status: response.status,
            message: response.message,
            payload: String::from_utf8_lossy(&response.payload).into_owned(),
        }
    }
}

/// Ledger plus dispatcher, driven one line at a time.
pub struct LedgerHost<S: TransferRecordsApi> {
    ledger: InMemoryLedger,
    dispatcher: TransferDispatcher<S>,
}

impl<S: TransferRecordsApi> LedgerHost<S> {
    pub fn new(ledger: InMemoryLedger, dispatcher: TransferDispatcher<S>) -> Self {
        Self { ledger, dispatcher }
    }

    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    /// Run one invocation and return its response.
    pub fn handle(&mut self, invocation: &Invocation) -> HostResponse {
        let args: Vec<&str> = invocation.args.iter().map(String::as_str).collect();
        let response = self.ledger.invoke_with_transient(
            &self.dispatcher,
            &invocation.function,
            &args,
            invocation.transient_map(),
        );
        debug!(
            "{} -> {} ({} bytes)",
            invocation.function,
            response.status,
            response.payload.len()
        );
        response.into()
    }

    /// Parse `line`, run it and encode the response as one JSON line.
    ///
    /// Blank lines yield `None`.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<Invocation>(line) {
            Ok(invocation) => self.handle(&invocation),
            Err(e) => {
                warn!("Malformed invocation: {}", e);
                Response::error(&TransferError::invalid_argument(format!(
                    "Malformed invocation: {e}"
                )))
                .into()
            }
        };

        Some(encode(&response))
    }
}

fn encode(response: &HostResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        warn!("Failed to encode response: {}", e);
        format!(r#"{{"status":{STATUS_ERROR},"message":"","payload":""}}"#)
    })
}
