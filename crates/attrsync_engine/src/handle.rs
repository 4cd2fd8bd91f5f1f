//! Live attribute handles.

use attrsync_codec::{AttrKind, AttrType, AttrValue};
use parking_lot::RwLock;

/// A change observer registered on a handle.
pub type ChangeListener = Box<dyn Fn(&AttrValue) + Send + Sync>;

/// A live, cached view of one attribute.
///
/// Exactly one handle exists per key for the engine's lifetime; the
/// engine hands out clones of the same `Arc`. The handle caches the
/// current resolved value and notifies subscribers when reconciliation
/// or a local mutation actually changes it.
///
/// Listeners run inline on the call that changed the value. They must
/// not call back into the engine; the engine assumes a single logical
/// owner drives it without re-entry.
pub struct AttributeHandle {
    key: String,
    kind: AttrKind,
    value: RwLock<AttrValue>,
    listeners: RwLock<Vec<ChangeListener>>,
}

impl AttributeHandle {
    pub(crate) fn new(key: impl Into<String>, kind: AttrKind, value: AttrValue) -> Self {
        Self {
            key: key.into(),
            kind,
            value: RwLock::new(value),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// The attribute key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The attribute's kind tag, fixed at registration.
    pub fn kind(&self) -> AttrKind {
        self.kind
    }

    /// Returns the current resolved value.
    pub fn value(&self) -> AttrValue {
        self.value.read().clone()
    }

    /// Returns the current value converted to `T`, or `None` when `T`
    /// does not match the registered kind.
    pub fn get<T: AttrType>(&self) -> Option<T> {
        T::from_value(self.value())
    }

    /// Registers a change observer.
    pub fn subscribe(&self, listener: impl Fn(&AttrValue) + Send + Sync + 'static) {
        self.listeners.write().push(Box::new(listener));
    }

    /// Replaces the cached value, firing listeners only when the value
    /// actually changed. Returns true if a notification fired.
    pub(crate) fn store_value(&self, new: AttrValue) -> bool {
        {
            let mut current = self.value.write();
            if *current == new {
                return false;
            }
            *current = new;
        }
        let value = self.value.read().clone();
        for listener in self.listeners.read().iter() {
            listener(&value);
        }
        true
    }
}

impl std::fmt::Debug for AttributeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeHandle")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("value", &*self.value.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn notifies_only_on_change() {
        let handle = AttributeHandle::new("coins", AttrKind::Int, AttrValue::Int(10));
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        handle.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!handle.store_value(AttrValue::Int(10)));
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        assert!(handle.store_value(AttrValue::Int(20)));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(handle.get::<i64>(), Some(20));
    }

    #[test]
    fn typed_access() {
        let handle = AttributeHandle::new("name", AttrKind::Text, AttrValue::Text("bo".into()));
        assert_eq!(handle.get::<String>(), Some("bo".to_string()));
        assert_eq!(handle.get::<i64>(), None);
        assert_eq!(handle.kind(), AttrKind::Text);
    }
}
