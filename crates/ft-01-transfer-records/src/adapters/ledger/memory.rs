//! In-memory reference ledger.
//!
//! World state is an ordered map so partial composite keys become range
//! scans. Every committed write appends a version to the key's history.
//! Transactions read the committed state and buffer their writes in a
//! [`WriteSet`]; nothing is visible until [`InMemoryLedger::commit`].

use super::faults::LedgerFaults;
use super::selector::Query;
use crate::adapters::infra::SystemTimeSource;
use crate::dispatch::{Response, TransferDispatcher};
use crate::domain::composite::create_composite_key;
use crate::domain::errors::LedgerError;
use crate::domain::state::{KeyModification, LedgerTimestamp, StateEntry};
use crate::ports::inbound::TransferRecordsApi;
use crate::ports::outbound::{HistoryIterator, Ledger, StateIterator, TimeSource, TransientMap};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Ordered, versioned key-value ledger held in memory.
pub struct InMemoryLedger {
    state: BTreeMap<String, Vec<u8>>,
    history: HashMap<String, Vec<KeyModification>>,
    private: HashMap<String, BTreeMap<String, Vec<u8>>>,
    rich_query: bool,
    faults: LedgerFaults,
    clock: Arc<dyn TimeSource>,
    open_iterators: Arc<AtomicUsize>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedger")
            .field("keys", &self.state.len())
            .field("rich_query", &self.rich_query)
            .field("open_iterators", &self.open_iterators())
            .finish()
    }
}

impl InMemoryLedger {
    /// Empty ledger with rich queries enabled and the system clock.
    pub fn new() -> Self {
        Self {
            state: BTreeMap::new(),
            history: HashMap::new(),
            private: HashMap::new(),
            rich_query: true,
            faults: LedgerFaults::default(),
            clock: Arc::new(SystemTimeSource),
            open_iterators: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Toggle the rich-query capability. Without it `get_query_result`
    /// reports `Unsupported`.
    pub fn with_rich_query(mut self, enabled: bool) -> Self {
        self.rich_query = enabled;
        self
    }

    /// Clock used for commit timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_faults(mut self, faults: LedgerFaults) -> Self {
        self.faults = faults;
        self
    }

    /// Replace the injected faults between invocations.
    pub fn set_faults(&mut self, faults: LedgerFaults) {
        self.faults = faults;
    }

    pub fn supports_rich_query(&self) -> bool {
        self.rich_query
    }

    /// Iterators handed out and not yet dropped.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    /// Committed value of `key`.
    pub fn state(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }

    /// Committed keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.state.keys().map(String::as_str)
    }

    /// Committed value of `key` in a private collection.
    pub fn private_state(&self, collection: &str, key: &str) -> Option<&[u8]> {
        self.private
            .get(collection)
            .and_then(|c| c.get(key))
            .map(Vec::as_slice)
    }

    /// Number of committed versions of `key`.
    pub fn history_len(&self, key: &str) -> usize {
        self.history.get(key).map_or(0, Vec::len)
    }

    /// Open a transaction with an empty transient map.
    pub fn begin(&self) -> InMemoryTransaction<'_> {
        self.begin_with_transient(TransientMap::new())
    }

    pub fn begin_with_transient(&self, transient: TransientMap) -> InMemoryTransaction<'_> {
        let tx_id = Uuid::new_v4().simple().to_string();
        InMemoryTransaction {
            ledger: self,
            writes: WriteSet {
                tx_id: tx_id.clone(),
                ..WriteSet::default()
            },
            tx_id,
            transient,
        }
    }

    /// Apply a write set atomically, stamping every version with one commit time.
    pub fn commit(&mut self, writes: WriteSet) {
        let timestamp = LedgerTimestamp::from_timestamp(&self.clock.now());
        let WriteSet {
            tx_id,
            state,
            private,
        } = writes;

        #[cfg(feature = "tracing-log")]
        tracing::debug!(
            tx_id = %tx_id,
            writes = state.len(),
            private_writes = private.len(),
            "[ledger] commit"
        );

        for (key, value) in state {
            let is_delete = value.is_none();
            let stored = match value {
                Some(bytes) => {
                    self.state.insert(key.clone(), bytes.clone());
                    bytes
                }
                None => {
                    self.state.remove(&key);
                    Vec::new()
                }
            };
            self.history.entry(key).or_default().push(KeyModification {
                tx_id: tx_id.clone(),
                value: stored,
                timestamp,
                is_delete,
            });
        }

        for ((collection, key), value) in private {
            let entries = self.private.entry(collection).or_default();
            match value {
                Some(bytes) => {
                    entries.insert(key, bytes);
                }
                None => {
                    entries.remove(&key);
                }
            }
        }
    }

    /// Run `f` in a fresh transaction and commit only if it succeeds.
    pub fn execute<T, E>(
        &mut self,
        transient: TransientMap,
        f: impl FnOnce(&mut InMemoryTransaction<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut tx = self.begin_with_transient(transient);
        let result = f(&mut tx);
        let writes = tx.into_write_set();
        if result.is_ok() {
            self.commit(writes);
        }
        result
    }

    /// Dispatch one named operation and commit its writes on success.
    pub fn invoke<S: TransferRecordsApi>(
        &mut self,
        dispatcher: &TransferDispatcher<S>,
        function: &str,
        args: &[&str],
    ) -> Response {
        self.invoke_with_transient(dispatcher, function, args, TransientMap::new())
    }

    pub fn invoke_with_transient<S: TransferRecordsApi>(
        &mut self,
        dispatcher: &TransferDispatcher<S>,
        function: &str,
        args: &[&str],
        transient: TransientMap,
    ) -> Response {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let mut tx = self.begin_with_transient(transient);
        let response = dispatcher.invoke(&mut tx, function, &args);
        let writes = tx.into_write_set();
        if response.is_ok() {
            self.commit(writes);
        }
        response
    }

    fn tracked<T: 'static>(
        &self,
        items: Vec<Result<T, LedgerError>>,
    ) -> Box<dyn Iterator<Item = Result<T, LedgerError>> + '_> {
        Box::new(TrackedIter {
            items: items.into_iter(),
            fail_after: self.faults.iterator_failure_after(),
            yielded: 0,
            done: false,
            _guard: IteratorGuard::new(Arc::clone(&self.open_iterators)),
        })
    }
}

/// Pending puts and deletes of one transaction. `None` marks a delete.
#[derive(Debug, Clone, Default)]
pub struct WriteSet {
    tx_id: String,
    state: BTreeMap<String, Option<Vec<u8>>>,
    private: BTreeMap<(String, String), Option<Vec<u8>>>,
}

impl WriteSet {
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty() && self.private.is_empty()
    }

    /// Number of pending world-state writes.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Pending value of `key`: `Some(None)` for a delete.
    pub fn pending(&self, key: &str) -> Option<Option<&[u8]>> {
        self.state.get(key).map(Option::as_deref)
    }
}

/// One transaction against an [`InMemoryLedger`].
pub struct InMemoryTransaction<'a> {
    ledger: &'a InMemoryLedger,
    tx_id: String,
    transient: TransientMap,
    writes: WriteSet,
}

impl InMemoryTransaction<'_> {
    /// Finish the transaction, handing back its writes for commit.
    pub fn into_write_set(self) -> WriteSet {
        self.writes
    }

    pub fn write_set(&self) -> &WriteSet {
        &self.writes
    }
}

impl Ledger for InMemoryTransaction<'_> {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.ledger.faults.check_get(key)?;
        Ok(self.ledger.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::Io {
                message: "key must not be empty".to_string(),
            });
        }
        if value.is_empty() {
            return Err(LedgerError::Io {
                message: format!("empty value for {}", key.escape_debug()),
            });
        }
        self.ledger.faults.check_put(key)?;
        self.writes.state.insert(key.to_string(), Some(value.to_vec()));
        Ok(())
    }

    fn delete_state(&mut self, key: &str) -> Result<(), LedgerError> {
        self.ledger.faults.check_delete(key)?;
        self.writes.state.insert(key.to_string(), None);
        Ok(())
    }

    fn get_state_by_partial_composite_key<'a>(
        &'a self,
        namespace: &str,
        attributes: &[&str],
    ) -> Result<StateIterator<'a>, LedgerError> {
        let prefix = create_composite_key(namespace, attributes)?;
        let items: Vec<Result<StateEntry, LedgerError>> = self
            .ledger
            .state
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(key, value)| Ok(StateEntry::new(key.clone(), value.clone())))
            .collect();
        Ok(self.ledger.tracked(items))
    }

    fn get_query_result<'a>(&'a self, query: &str) -> Result<StateIterator<'a>, LedgerError> {
        if !self.ledger.rich_query {
            return Err(LedgerError::Unsupported {
                capability: "rich query",
            });
        }
        self.ledger.faults.check_query()?;
        let query = Query::parse(query)?;

        // Index markers and other non-document values are invisible to selectors.
        // Documents stored under composite keys are matched like any other.
        let matched = self
            .ledger
            .state
            .iter()
            .filter(|(_, value)| {
                serde_json::from_slice::<serde_json::Value>(value)
                    .map(|doc| doc.is_object() && query.matches(&doc))
                    .unwrap_or(false)
            })
            .skip(query.skip);
        let items: Vec<Result<StateEntry, LedgerError>> = match query.limit {
            Some(limit) => matched
                .take(limit)
                .map(|(k, v)| Ok(StateEntry::new(k.clone(), v.clone())))
                .collect(),
            None => matched
                .map(|(k, v)| Ok(StateEntry::new(k.clone(), v.clone())))
                .collect(),
        };
        Ok(self.ledger.tracked(items))
    }

    fn get_history_for_key<'a>(&'a self, key: &str) -> Result<HistoryIterator<'a>, LedgerError> {
        self.ledger.faults.check_history()?;
        let items: Vec<Result<KeyModification, LedgerError>> = self
            .ledger
            .history
            .get(key)
            .map(|versions| versions.iter().cloned().map(Ok).collect())
            .unwrap_or_default();
        Ok(self.ledger.tracked(items))
    }

    fn get_private_data(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, LedgerError> {
        self.ledger.faults.check_get(key)?;
        Ok(self.ledger.private_state(collection, key).map(<[u8]>::to_vec))
    }

    fn put_private_data(
        &mut self,
        collection: &str,
        key: &str,
        value: &[u8],
    ) -> Result<(), LedgerError> {
        if value.is_empty() {
            return Err(LedgerError::Io {
                message: format!("empty private value for {}", key.escape_debug()),
            });
        }
        self.ledger.faults.check_put(key)?;
        self.writes.private.insert(
            (collection.to_string(), key.to_string()),
            Some(value.to_vec()),
        );
        Ok(())
    }

    fn delete_private_data(&mut self, collection: &str, key: &str) -> Result<(), LedgerError> {
        self.ledger.faults.check_delete(key)?;
        self.writes
            .private
            .insert((collection.to_string(), key.to_string()), None);
        Ok(())
    }

    fn get_transient(&self) -> &TransientMap {
        &self.transient
    }
}

/// Counts itself in the ledger's open-iterator gauge while alive.
struct IteratorGuard(Arc<AtomicUsize>);

impl IteratorGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for IteratorGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

struct TrackedIter<T> {
    items: std::vec::IntoIter<Result<T, LedgerError>>,
    fail_after: Option<usize>,
    yielded: usize,
    done: bool,
    _guard: IteratorGuard,
}

impl<T> Iterator for TrackedIter<T> {
    type Item = Result<T, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.fail_after == Some(self.yielded) {
            self.done = true;
            return Some(Err(LedgerError::Iterator {
                message: format!("injected iterator failure after {} items", self.yielded),
            }));
        }
        let item = self.items.next();
        match item {
            Some(_) => self.yielded += 1,
            None => self.done = true,
        }
        item
    }
}
