//! Transport abstraction for outbound pushes.

use crate::error::{EngineError, EngineResult};
use attrsync_protocol::OutboundRequest;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Identifies one outstanding push request.
///
/// Completions are delivered back to the engine tagged with this id,
/// so a duplicate or out-of-date completion can be ignored.
pub type RequestId = u64;

/// Issues attribute write requests to the server.
///
/// `send` hands the request off and returns immediately; the host
/// delivers the outcome later via
/// [`crate::ProfileEngine::push_completed`], on the same logical thread
/// that drives every other entry point. Implementations must return a
/// fresh id per request.
pub trait AttrTransport: Send + Sync {
    /// Starts sending a request. Returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be handed off at all
    /// (for example, no connection). The engine keeps its dirty state
    /// and retries on the next externally triggered reconciliation.
    fn send(&self, request: &OutboundRequest) -> EngineResult<RequestId>;

    /// Cancels an outstanding request; its completion must not be
    /// delivered afterwards. Cancelling an unknown id is a no-op.
    fn cancel(&self, id: RequestId);
}

/// A transport for tests: records requests and hands out ids.
#[derive(Debug, Default)]
pub struct MockTransport {
    next_id: AtomicU64,
    offline: AtomicBool,
    sent: Mutex<Vec<(RequestId, OutboundRequest)>>,
    cancelled: Mutex<Vec<RequestId>>,
}

impl MockTransport {
    /// Creates a new online mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Returns every request sent so far, oldest first.
    pub fn sent(&self) -> Vec<(RequestId, OutboundRequest)> {
        self.sent.lock().clone()
    }

    /// Returns the most recent request, if any.
    pub fn last_sent(&self) -> Option<(RequestId, OutboundRequest)> {
        self.sent.lock().last().cloned()
    }

    /// Returns the ids of cancelled requests.
    pub fn cancelled(&self) -> Vec<RequestId> {
        self.cancelled.lock().clone()
    }
}

impl AttrTransport for MockTransport {
    fn send(&self, request: &OutboundRequest) -> EngineResult<RequestId> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(EngineError::transport("offline"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.sent.lock().push((id, request.clone()));
        Ok(id)
    }

    fn cancel(&self, id: RequestId) {
        self.cancelled.lock().push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrsync_protocol::AttrEntry;

    #[test]
    fn records_requests_with_fresh_ids() {
        let transport = MockTransport::new();
        let req = OutboundRequest::Set(AttrEntry::new("coins", "20"));

        let a = transport.send(&req).unwrap();
        let b = transport.send(&req).unwrap();
        assert_ne!(a, b);
        assert_eq!(transport.sent().len(), 2);
    }

    #[test]
    fn offline_sends_fail() {
        let transport = MockTransport::new();
        transport.set_offline(true);

        let req = OutboundRequest::Set(AttrEntry::new("coins", "20"));
        assert!(transport.send(&req).is_err());
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn cancel_is_recorded() {
        let transport = MockTransport::new();
        transport.cancel(7);
        assert_eq!(transport.cancelled(), vec![7]);
    }
}
