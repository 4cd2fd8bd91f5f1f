//! Typed facade over a [`KvStore`].

use crate::decoder::{decode, try_decode};
use crate::encoder::encode;
use crate::error::{CodecError, CodecResult};
use crate::value::{AttrKind, AttrValue};
use attrsync_store::KvStore;

/// A Rust type that maps onto one [`AttrKind`].
///
/// Implemented for the supported scalars and their `Vec` list forms.
/// The associated `KIND` is the closed dispatch tag: it is fixed at
/// compile time per type, so no runtime type testing happens on the
/// encode/decode path.
pub trait AttrType: Sized {
    /// The kind tag this type encodes as.
    const KIND: AttrKind;

    /// Converts into the dynamic value form.
    fn into_value(self) -> AttrValue;

    /// Converts back from the dynamic value form.
    ///
    /// Returns `None` when the value holds a different kind or the
    /// numeric value does not fit.
    fn from_value(value: AttrValue) -> Option<Self>;
}

impl AttrType for bool {
    const KIND: AttrKind = AttrKind::Bool;

    fn into_value(self) -> AttrValue {
        AttrValue::Bool(self)
    }

    fn from_value(value: AttrValue) -> Option<Self> {
        value.as_bool()
    }
}

impl AttrType for i64 {
    const KIND: AttrKind = AttrKind::Int;

    fn into_value(self) -> AttrValue {
        AttrValue::Int(self)
    }

    fn from_value(value: AttrValue) -> Option<Self> {
        value.as_int()
    }
}

impl AttrType for i32 {
    const KIND: AttrKind = AttrKind::Int;

    fn into_value(self) -> AttrValue {
        AttrValue::Int(i64::from(self))
    }

    fn from_value(value: AttrValue) -> Option<Self> {
        value.as_int().and_then(|n| i32::try_from(n).ok())
    }
}

impl AttrType for u32 {
    const KIND: AttrKind = AttrKind::Int;

    fn into_value(self) -> AttrValue {
        AttrValue::Int(i64::from(self))
    }

    fn from_value(value: AttrValue) -> Option<Self> {
        value.as_int().and_then(|n| u32::try_from(n).ok())
    }
}

impl AttrType for f64 {
    const KIND: AttrKind = AttrKind::Float;

    fn into_value(self) -> AttrValue {
        AttrValue::Float(self)
    }

    fn from_value(value: AttrValue) -> Option<Self> {
        value.as_float()
    }
}

impl AttrType for f32 {
    const KIND: AttrKind = AttrKind::Float;

    fn into_value(self) -> AttrValue {
        AttrValue::Float(f64::from(self))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: AttrValue) -> Option<Self> {
        value.as_float().map(|f| f as f32)
    }
}

impl AttrType for String {
    const KIND: AttrKind = AttrKind::Text;

    fn into_value(self) -> AttrValue {
        AttrValue::Text(self)
    }

    fn from_value(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl AttrType for Vec<bool> {
    const KIND: AttrKind = AttrKind::BoolList;

    fn into_value(self) -> AttrValue {
        AttrValue::BoolList(self)
    }

    fn from_value(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::BoolList(v) => Some(v),
            _ => None,
        }
    }
}

impl AttrType for Vec<i64> {
    const KIND: AttrKind = AttrKind::IntList;

    fn into_value(self) -> AttrValue {
        AttrValue::IntList(self)
    }

    fn from_value(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::IntList(v) => Some(v),
            _ => None,
        }
    }
}

impl AttrType for Vec<f64> {
    const KIND: AttrKind = AttrKind::FloatList;

    fn into_value(self) -> AttrValue {
        AttrValue::FloatList(self)
    }

    fn from_value(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::FloatList(v) => Some(v),
            _ => None,
        }
    }
}

impl AttrType for Vec<String> {
    const KIND: AttrKind = AttrKind::TextList;

    fn into_value(self) -> AttrValue {
        AttrValue::TextList(self)
    }

    fn from_value(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::TextList(v) => Some(v),
            _ => None,
        }
    }
}

/// A typed get/set facade over a [`KvStore`].
///
/// # Example
///
/// ```
/// use attrsync_codec::TypedStore;
/// use attrsync_store::MemoryStore;
///
/// let mut store = TypedStore::new(MemoryStore::new());
/// store.set("coins", 10i64).unwrap();
/// assert_eq!(store.get::<i64>("coins").unwrap(), 10);
/// assert_eq!(store.get::<i64>("absent").unwrap(), 0);
/// assert_eq!(store.get_or("absent", 99i64).unwrap(), 99);
/// ```
#[derive(Debug)]
pub struct TypedStore<S: KvStore> {
    inner: S,
}

impl<S: KvStore> TypedStore<S> {
    /// Wraps a store in a typed facade.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns the wrapped store.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Borrows the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Mutably borrows the wrapped store.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Reads a typed value, returning the type's default when the key
    /// is absent or the stored scalar fails to parse.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    pub fn get<T: AttrType>(&self, key: &str) -> CodecResult<T> {
        let value = match self.inner.get(key)? {
            Some(raw) => decode(T::KIND, &raw),
            None => AttrValue::default_for(T::KIND),
        };
        Self::convert(value)
    }

    /// Reads a typed value, returning `default` when the key is absent
    /// or the stored scalar fails to parse.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    pub fn get_or<T: AttrType>(&self, key: &str, default: T) -> CodecResult<T> {
        match self.inner.get(key)? {
            Some(raw) => match try_decode(T::KIND, &raw) {
                Some(value) => Self::convert(value),
                None => Ok(default),
            },
            None => Ok(default),
        }
    }

    /// Writes a typed value in its encoded string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    pub fn set<T: AttrType>(&mut self, key: &str, value: T) -> CodecResult<()> {
        let raw = encode(&value.into_value());
        self.inner.set(key, &raw)?;
        Ok(())
    }

    fn convert<T: AttrType>(value: AttrValue) -> CodecResult<T> {
        let actual = value.kind();
        T::from_value(value).ok_or(CodecError::KindMismatch {
            expected: T::KIND,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrsync_store::MemoryStore;

    #[test]
    fn typed_roundtrip() {
        let mut store = TypedStore::new(MemoryStore::new());

        store.set("flag", true).unwrap();
        store.set("coins", 61i64).unwrap();
        store.set("ratio", 0.75f64).unwrap();
        store.set("name", "alice".to_string()).unwrap();
        store.set("scores", vec![10i64, 20, 30]).unwrap();

        assert!(store.get::<bool>("flag").unwrap());
        assert_eq!(store.get::<i64>("coins").unwrap(), 61);
        assert_eq!(store.get::<f64>("ratio").unwrap(), 0.75);
        assert_eq!(store.get::<String>("name").unwrap(), "alice");
        assert_eq!(store.get::<Vec<i64>>("scores").unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn absent_key_yields_type_default() {
        let store = TypedStore::new(MemoryStore::new());
        assert!(!store.get::<bool>("absent").unwrap());
        assert_eq!(store.get::<i64>("absent").unwrap(), 0);
        assert_eq!(store.get::<String>("absent").unwrap(), "");
        assert_eq!(store.get::<Vec<i64>>("absent").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn explicit_default_wins_over_type_default() {
        let mut store = TypedStore::new(MemoryStore::new());
        assert_eq!(store.get_or("absent", 7i64).unwrap(), 7);

        // Garbage scalar falls back to the explicit default too
        store.inner_mut().set("coins", "garbage").unwrap();
        assert_eq!(store.get_or("coins", 7i64).unwrap(), 7);
    }

    #[test]
    fn narrow_integer_types() {
        let mut store = TypedStore::new(MemoryStore::new());
        store.set("small", 12i32).unwrap();
        assert_eq!(store.get::<i32>("small").unwrap(), 12);
        assert_eq!(store.get::<i64>("small").unwrap(), 12);

        store.set("wide", i64::MAX).unwrap();
        assert!(store.get::<i32>("wide").is_err());
    }

    #[test]
    fn empty_and_absent_lists_collapse() {
        let mut store = TypedStore::new(MemoryStore::new());
        store.set("empty", Vec::<String>::new()).unwrap();

        // Both read back as the empty list
        assert_eq!(
            store.get::<Vec<String>>("empty").unwrap(),
            Vec::<String>::new()
        );
        assert_eq!(
            store.get::<Vec<String>>("absent").unwrap(),
            Vec::<String>::new()
        );
        assert_eq!(store.inner().get("empty").unwrap().as_deref(), Some(""));
    }
}
