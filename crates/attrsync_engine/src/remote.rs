//! Collaborator traits: remote counterparts and session state.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A read-only view of one server-side attribute.
///
/// The message layer keeps these up to date independently of the
/// engine; the engine consults them when seeding a new handle and when
/// seeding the server version counter at initialization.
pub trait RemoteAttribute {
    /// The attribute key.
    fn key(&self) -> &str;

    /// Returns true once the server has delivered a value.
    fn is_populated(&self) -> bool;

    /// The current server-side value in its encoded string form.
    fn value(&self) -> String;
}

/// Connectivity and login state, as exposed by the message source.
pub trait SessionState: Send + Sync {
    /// The logged-in user id, when known.
    fn user_id(&self) -> Option<String>;

    /// Returns true while the message source is connected.
    fn is_connected(&self) -> bool;
}

/// A [`RemoteAttribute`] with a fixed key and settable value.
///
/// Suitable for hosts that feed server values in by hand, and for
/// tests.
#[derive(Debug)]
pub struct StaticRemote {
    key: String,
    value: Mutex<Option<String>>,
}

impl StaticRemote {
    /// Creates an unpopulated remote attribute.
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Mutex::new(None),
        }
    }

    /// Creates a populated remote attribute.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Mutex::new(Some(value.into())),
        }
    }

    /// Replaces the server-side value.
    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.lock() = Some(value.into());
    }
}

impl RemoteAttribute for StaticRemote {
    fn key(&self) -> &str {
        &self.key
    }

    fn is_populated(&self) -> bool {
        self.value.lock().is_some()
    }

    fn value(&self) -> String {
        self.value.lock().clone().unwrap_or_default()
    }
}

/// A [`SessionState`] backed by plain fields.
#[derive(Debug, Default)]
pub struct StaticSession {
    user_id: Mutex<Option<String>>,
    connected: AtomicBool,
}

impl StaticSession {
    /// Creates a connected session with a known user id.
    pub fn logged_in(user_id: impl Into<String>) -> Self {
        let session = Self::default();
        *session.user_id.lock() = Some(user_id.into());
        session.connected.store(true, Ordering::SeqCst);
        session
    }

    /// Creates a connected session with no known user id.
    pub fn anonymous() -> Self {
        let session = Self::default();
        session.connected.store(true, Ordering::SeqCst);
        session
    }

    /// Sets the connectivity flag.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Sets or clears the logged-in user id.
    pub fn set_user_id(&self, user_id: Option<String>) {
        *self.user_id.lock() = user_id;
    }
}

impl SessionState for StaticSession {
    fn user_id(&self) -> Option<String> {
        self.user_id.lock().clone()
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_remote_population() {
        let remote = StaticRemote::empty("coins");
        assert!(!remote.is_populated());
        assert_eq!(remote.value(), "");

        remote.set_value("10");
        assert!(remote.is_populated());
        assert_eq!(remote.value(), "10");
        assert_eq!(remote.key(), "coins");
    }

    #[test]
    fn static_session_state() {
        let session = StaticSession::logged_in("u1");
        assert_eq!(session.user_id().as_deref(), Some("u1"));
        assert!(session.is_connected());

        session.set_connected(false);
        assert!(!session.is_connected());

        let session = StaticSession::anonymous();
        assert_eq!(session.user_id(), None);
        assert!(session.is_connected());
    }
}
