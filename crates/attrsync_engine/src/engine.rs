//! The reconciliation engine.

use crate::error::{EngineError, EngineResult};
use crate::handle::AttributeHandle;
use crate::keys::{attr_key, KEY_LAST_SYNCED_VERSION, KEY_LOCAL_VERSION};
use crate::ledger::DirtyLedger;
use crate::remote::{RemoteAttribute, SessionState};
use crate::transport::{AttrTransport, RequestId};
use attrsync_codec::{decode, encode, try_decode, AttrKind, AttrValue};
use attrsync_protocol::{AttrEntry, MessageStatus, OutboundRequest, ServerMessage};
use attrsync_store::KvStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default key of the distinguished server version counter, used until
/// [`ProfileEngine::initialize`] learns the real one.
const DEFAULT_VERSION_KEY: &str = "version";

struct AttrSlot {
    handle: Arc<AttributeHandle>,
    kind: AttrKind,
    replicated: bool,
}

struct EngineState<S: KvStore> {
    store: S,
    ledger: DirtyLedger,
    /// Incremented by exactly 1 per local mutation. Persisted.
    local_version: i64,
    /// Highest version the server has acknowledged from this client.
    /// Persisted. Never exceeds `local_version`.
    last_synced_version: i64,
    /// Most recently observed server version. In-memory; `< 1` means
    /// not yet known.
    server_version: i64,
    version_key: String,
    slots: HashMap<String, AttrSlot>,
    in_flight: Option<RequestId>,
}

impl<S: KvStore> EngineState<S> {
    fn persist_versions(&mut self) -> EngineResult<()> {
        self.store
            .set(KEY_LOCAL_VERSION, &self.local_version.to_string())?;
        self.store.set(
            KEY_LAST_SYNCED_VERSION,
            &self.last_synced_version.to_string(),
        )?;
        self.store.flush()?;
        Ok(())
    }

    fn persist_local_version(&mut self) -> EngineResult<()> {
        self.store
            .set(KEY_LOCAL_VERSION, &self.local_version.to_string())?;
        self.store.flush()?;
        Ok(())
    }

    fn slot(&self, key: &str) -> Option<(Arc<AttributeHandle>, AttrKind, bool)> {
        self.slots
            .get(key)
            .map(|s| (Arc::clone(&s.handle), s.kind, s.replicated))
    }
}

/// The profile attribute reconciliation engine.
///
/// Owns the three version counters, the dirty-key ledger and the
/// per-key handle registry, and decides for every local mutation and
/// every inbound server message whether local or server data wins,
/// whether observers are notified, and what is retransmitted.
///
/// # Concurrency
///
/// A single logical owner is expected to drive every entry point; the
/// interior lock only guards against accidental overlap, it is not a
/// scheduling mechanism. At most one push is in flight at a time. The
/// engine runs no timers: a failed push stays dirty until a later
/// mutation or inbound message triggers another reconciliation pass.
///
/// # Disposal
///
/// [`ProfileEngine::dispose`] is terminal. Entry points on a disposed
/// engine are no-ops and never fail.
pub struct ProfileEngine<S: KvStore, T: AttrTransport> {
    state: Mutex<EngineState<S>>,
    transport: Arc<T>,
    session: Arc<dyn SessionState>,
    disposed: AtomicBool,
}

impl<S: KvStore, T: AttrTransport> ProfileEngine<S, T> {
    /// Creates an engine over a persisted store.
    ///
    /// The version counters and the dirty-key ledger are loaded from
    /// the store, so state left by a previous session carries over.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn new(
        store: S,
        transport: Arc<T>,
        session: Arc<dyn SessionState>,
    ) -> EngineResult<Self> {
        let ledger = DirtyLedger::load(&store)?;
        let local_version = read_counter(&store, KEY_LOCAL_VERSION)?;
        let last_synced_version = read_counter(&store, KEY_LAST_SYNCED_VERSION)?;

        Ok(Self {
            state: Mutex::new(EngineState {
                store,
                ledger,
                local_version,
                last_synced_version,
                server_version: 0,
                version_key: DEFAULT_VERSION_KEY.to_string(),
                slots: HashMap::new(),
                in_flight: None,
            }),
            transport,
            session,
            disposed: AtomicBool::new(false),
        })
    }

    /// Seeds the server version counter and runs one reconciliation
    /// pass, flushing anything left pending by a prior session.
    ///
    /// The counter's key becomes the distinguished version entry looked
    /// for in snapshot/delta lists. When the counter is not populated
    /// yet, the persisted last-synced version stands in.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails during the initial pass.
    pub fn initialize(&self, counter: &dyn RemoteAttribute) -> EngineResult<()> {
        if self.is_disposed() {
            return Ok(());
        }
        let state = &mut *self.state.lock();
        state.version_key = counter.key().to_string();
        state.server_version = if counter.is_populated() {
            parse_version(&counter.value()).unwrap_or(state.last_synced_version)
        } else {
            state.last_synced_version
        };
        self.reconcile_locked(state)
    }

    /// Returns the handle for a replicated attribute, creating it on
    /// first request (identity map: the same `Arc` every time).
    ///
    /// A newly created handle is seeded from the remote counterpart
    /// when the server is at least as fresh as the local counter (the
    /// value is persisted and the key leaves the ledger); otherwise
    /// from the persisted local value, without contacting the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn replicated_handle(
        &self,
        remote: &dyn RemoteAttribute,
        kind: AttrKind,
    ) -> EngineResult<Arc<AttributeHandle>> {
        self.get_or_create(remote.key(), kind, true, Some(remote))
    }

    /// Returns the handle for a local-only attribute, creating it on
    /// first request. Local-only attributes persist like any other but
    /// never enter the ledger and ignore server data.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn local_handle(
        &self,
        key: &str,
        kind: AttrKind,
    ) -> EngineResult<Arc<AttributeHandle>> {
        self.get_or_create(key, kind, false, None)
    }

    fn get_or_create(
        &self,
        key: &str,
        kind: AttrKind,
        replicated: bool,
        remote: Option<&dyn RemoteAttribute>,
    ) -> EngineResult<Arc<AttributeHandle>> {
        if self.is_disposed() {
            // Terminal state: hand out a detached handle rather than fail.
            return Ok(Arc::new(AttributeHandle::new(
                key,
                kind,
                AttrValue::default_for(kind),
            )));
        }

        let state = &mut *self.state.lock();
        if let Some(slot) = state.slots.get(key) {
            return Ok(Arc::clone(&slot.handle));
        }

        let seed_from_remote = replicated
            && state.server_version >= state.local_version
            && remote.is_some_and(RemoteAttribute::is_populated);

        let value = if seed_from_remote {
            let raw = remote.map(RemoteAttribute::value).unwrap_or_default();
            state.store.set(&attr_key(key), &raw)?;
            state.store.flush()?;
            state.ledger.remove(&mut state.store, key)?;
            decode(kind, &raw)
        } else {
            match state.store.get(&attr_key(key))? {
                Some(raw) => decode(kind, &raw),
                None => AttrValue::default_for(kind),
            }
        };

        let handle = Arc::new(AttributeHandle::new(key, kind, value));
        state.slots.insert(
            key.to_string(),
            AttrSlot {
                handle: Arc::clone(&handle),
                kind,
                replicated,
            },
        );
        Ok(handle)
    }

    /// Applies a local mutation: persist, bump the local version, mark
    /// the key dirty, reconcile.
    ///
    /// The key is marked dirty unconditionally, even while a push is in
    /// flight; the in-flight request snapshotted its pending set before
    /// sending and a later pass picks the new value up.
    ///
    /// # Errors
    ///
    /// Returns an error when the key has no registered handle, the
    /// value kind does not match the registration, or the store fails.
    pub fn set_value(&self, key: &str, value: AttrValue) -> EngineResult<()> {
        if self.is_disposed() {
            return Ok(());
        }
        let state = &mut *self.state.lock();
        let (handle, kind, replicated) = state
            .slot(key)
            .ok_or_else(|| EngineError::UnknownAttribute(key.to_string()))?;
        if value.kind() != kind {
            return Err(EngineError::WrongKind {
                key: key.to_string(),
            });
        }

        state.store.set(&attr_key(key), &encode(&value))?;
        handle.store_value(value);

        if !replicated {
            state.store.flush()?;
            return Ok(());
        }

        state.local_version += 1;
        state.persist_local_version()?;
        state.ledger.add(&mut state.store, key)?;
        self.reconcile_locked(state)
    }

    /// Applies an inbound server message.
    ///
    /// Only messages with the canonical success status are applied.
    /// Echo kinds are additionally gated by the self-message filter:
    /// reads and write echoes can be issued against arbitrary users, so
    /// one that does not clearly target the logged-in user is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails while applying.
    pub fn handle_message(&self, message: &ServerMessage) -> EngineResult<()> {
        if self.is_disposed() {
            return Ok(());
        }
        if !message.status.is_success() {
            debug!(kind = message.kind.as_type_str(), "non-success message ignored");
            return Ok(());
        }
        if message.kind.requires_self()
            && !message
                .targeting()
                .is_self(self.session.user_id().as_deref())
        {
            debug!(
                kind = message.kind.as_type_str(),
                "echo for another user ignored"
            );
            return Ok(());
        }

        let entries = message.entries();
        let state = &mut *self.state.lock();
        if message.kind.list_field().is_some() {
            self.apply_list_locked(state, &entries)
        } else {
            for entry in &entries {
                self.apply_attribute_locked(state, &entry.key, &entry.val)?;
            }
            Ok(())
        }
    }

    /// Applies a snapshot or delta list of `{key, val}` entries.
    ///
    /// The distinguished version-counter entry is applied to the server
    /// version *before* any other entry, wherever it appears in the
    /// list - a single forward pass would resolve earlier keys against
    /// a stale server version. If the counter was present, one more
    /// reconciliation runs afterwards: a fresh server version can newly
    /// justify a push or an adoption.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails while applying.
    pub fn apply_attribute_list(&self, entries: &[AttrEntry]) -> EngineResult<()> {
        if self.is_disposed() {
            return Ok(());
        }
        let state = &mut *self.state.lock();
        self.apply_list_locked(state, entries)
    }

    /// Applies a single server-side attribute value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails while applying.
    pub fn apply_server_attribute(&self, key: &str, val: &str) -> EngineResult<()> {
        if self.is_disposed() {
            return Ok(());
        }
        let state = &mut *self.state.lock();
        self.apply_attribute_locked(state, key, val)
    }

    /// Runs one reconciliation pass.
    ///
    /// Normally triggered by mutations and inbound messages; exposed so
    /// a host can force a pass, for example on reconnect.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn reconcile(&self) -> EngineResult<()> {
        if self.is_disposed() {
            return Ok(());
        }
        let state = &mut *self.state.lock();
        self.reconcile_locked(state)
    }

    /// Delivers the outcome of an outstanding push.
    ///
    /// Completions are matched by request id: a duplicate delivery or
    /// one for a superseded request is ignored. On success the entire
    /// ledger clears and all three counters move to the server's new
    /// version - which may numerically lower the local counter; the
    /// server's acceptance is ground truth. On failure the ledger is
    /// untouched and the next externally triggered pass retries.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails while recording success.
    pub fn push_completed(&self, id: RequestId, status: MessageStatus) -> EngineResult<()> {
        if self.is_disposed() {
            return Ok(());
        }
        let state = &mut *self.state.lock();
        match state.in_flight {
            Some(current) if current == id => state.in_flight = None,
            _ => {
                debug!(id, "completion for unknown request ignored");
                return Ok(());
            }
        }

        if status.is_success() {
            state.ledger.clear(&mut state.store)?;
            // The server bumps its version by exactly 1 per accepted write.
            state.server_version += 1;
            state.local_version = state.server_version;
            state.last_synced_version = state.server_version;
            state.persist_versions()?;
            debug!(version = state.server_version, "push acknowledged");
        } else {
            warn!(id, "push failed, dirty keys kept for retry");
        }
        Ok(())
    }

    /// Disposes the engine: cancels any in-flight push and clears the
    /// handle registry. Terminal; later calls are no-ops.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let state = &mut *self.state.lock();
        if let Some(id) = state.in_flight.take() {
            self.transport.cancel(id);
        }
        state.slots.clear();
    }

    /// Returns true once the engine has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// The local mutation counter.
    pub fn local_version(&self) -> i64 {
        self.state.lock().local_version
    }

    /// The highest server-acknowledged version.
    pub fn last_synced_version(&self) -> i64 {
        self.state.lock().last_synced_version
    }

    /// The most recently observed server version (`< 1` when unknown).
    pub fn server_version(&self) -> i64 {
        self.state.lock().server_version
    }

    /// Returns true if the key is currently dirty.
    pub fn is_dirty(&self, key: &str) -> bool {
        self.state.lock().ledger.contains(key)
    }

    /// The dirty keys, in insertion order.
    pub fn dirty_keys(&self) -> Vec<String> {
        self.state.lock().ledger.keys().to_vec()
    }

    /// Returns true while a push is outstanding.
    pub fn sync_in_flight(&self) -> bool {
        self.state.lock().in_flight.is_some()
    }

    fn apply_list_locked(
        &self,
        state: &mut EngineState<S>,
        entries: &[AttrEntry],
    ) -> EngineResult<()> {
        let version_key = state.version_key.clone();

        // Pass 1: the version counter, wherever it sits in the list.
        let counter_present = entries.iter().any(|e| e.key == version_key);
        if counter_present {
            for entry in entries.iter().filter(|e| e.key == version_key) {
                match parse_version(&entry.val) {
                    Some(v) => state.server_version = v,
                    None => warn!(val = %entry.val, "unparseable version counter entry"),
                }
            }
        }

        // Pass 2: everything else, resolved against the fresh counter.
        for entry in entries.iter().filter(|e| e.key != version_key) {
            self.apply_attribute_locked(state, &entry.key, &entry.val)?;
        }

        if counter_present {
            self.reconcile_locked(state)?;
        }
        Ok(())
    }

    fn apply_attribute_locked(
        &self,
        state: &mut EngineState<S>,
        key: &str,
        val: &str,
    ) -> EngineResult<()> {
        let Some((handle, kind, replicated)) = state.slot(key) else {
            debug!(key, "server attribute with no local handle discarded");
            return Ok(());
        };
        if !replicated {
            debug!(key, "server value for local-only attribute discarded");
            return Ok(());
        }

        if state.server_version <= state.last_synced_version {
            // Already superseded; applying it would resurrect old data.
            debug!(
                key,
                server = state.server_version,
                synced = state.last_synced_version,
                "stale server attribute discarded"
            );
        } else if state.server_version >= state.local_version {
            state.store.set(&attr_key(key), val)?;
            state.store.flush()?;
            handle.store_value(decode(kind, val));
            state.ledger.remove(&mut state.store, key)?;
        } else {
            // Local is newer: the stored value stands and the key stays
            // dirty for retransmission.
            debug!(
                key,
                server = state.server_version,
                local = state.local_version,
                "local value newer than server push, kept"
            );
        }

        // Adopt the server's floor without touching any specific value.
        if state.server_version > state.local_version {
            state.local_version = state.server_version;
            state.persist_local_version()?;
        }
        Ok(())
    }

    fn reconcile_locked(&self, state: &mut EngineState<S>) -> EngineResult<()> {
        if state.in_flight.is_some() {
            debug!("reconcile skipped, push in flight");
            return Ok(());
        }
        if state.server_version < 1 {
            debug!("reconcile skipped, server version unknown");
            return Ok(());
        }

        let mut pending = Vec::new();
        for key in state.ledger.keys() {
            match state.store.get(&attr_key(key))? {
                Some(raw) => pending.push(AttrEntry::new(key.clone(), raw)),
                None => debug!(key = %key, "dirty key without stored value skipped"),
            }
        }

        if state.local_version > state.last_synced_version && !pending.is_empty() {
            if !self.session.is_connected() {
                debug!("disconnected, push deferred");
                return Ok(());
            }
            let request = OutboundRequest::from_pending(pending);
            match self.transport.send(&request) {
                Ok(id) => {
                    debug!(id, kind = request.type_str(), "push issued");
                    state.in_flight = Some(id);
                }
                Err(e) => {
                    // Dirty keys untouched; retried on the next pass.
                    warn!(error = %e, "push could not be issued");
                }
            }
        } else if state.server_version > state.local_version && pending.is_empty() {
            // Nothing of ours outstanding: adopt the server's version
            // wholesale.
            state.ledger.clear(&mut state.store)?;
            state.local_version = state.server_version;
            state.last_synced_version = state.server_version;
            state.persist_versions()?;
            debug!(version = state.server_version, "adopted server version");
        } else if state.server_version == state.local_version
            && state.last_synced_version != state.server_version
        {
            // Counters agree, so everything up to the server's version
            // is accounted for; move the acknowledged watermark up so
            // older data reads as stale from here on.
            state.last_synced_version = state.server_version;
            state.persist_versions()?;
        } else if state.local_version > state.last_synced_version {
            // Dirty keys whose stored values went missing: nothing can
            // be sent, wait for the next trigger.
            debug!("unsynced local version with nothing to send");
        }
        Ok(())
    }
}

fn read_counter(store: &dyn KvStore, key: &str) -> EngineResult<i64> {
    Ok(store
        .get(key)?
        .and_then(|raw| parse_version(&raw))
        .unwrap_or(0))
}

fn parse_version(raw: &str) -> Option<i64> {
    try_decode(AttrKind::Int, raw).and_then(|v| v.as_int())
}
