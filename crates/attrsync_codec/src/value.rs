//! Typed attribute values and their kind tags.

/// The type tag of a registered attribute.
///
/// Each attribute's kind is fixed once, when the attribute is
/// registered. All later encode/decode calls dispatch on this closed
/// set of variants instead of inspecting runtime types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    /// Boolean scalar.
    Bool,
    /// Integer scalar (stored as i64).
    Int,
    /// Floating-point scalar (stored as f64).
    Float,
    /// Text scalar.
    Text,
    /// Ordered list of booleans.
    BoolList,
    /// Ordered list of integers.
    IntList,
    /// Ordered list of floats.
    FloatList,
    /// Ordered list of text values.
    TextList,
}

impl AttrKind {
    /// Returns true if this kind is a list kind.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            AttrKind::BoolList | AttrKind::IntList | AttrKind::FloatList | AttrKind::TextList
        )
    }
}

/// A typed attribute value.
///
/// This is the in-memory form of everything the codec can persist:
/// the four scalar kinds plus ordered lists of each.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// Text scalar.
    Text(String),
    /// Ordered list of booleans.
    BoolList(Vec<bool>),
    /// Ordered list of integers.
    IntList(Vec<i64>),
    /// Ordered list of floats.
    FloatList(Vec<f64>),
    /// Ordered list of text values.
    TextList(Vec<String>),
}

impl AttrValue {
    /// Returns the kind tag of this value.
    pub fn kind(&self) -> AttrKind {
        match self {
            AttrValue::Bool(_) => AttrKind::Bool,
            AttrValue::Int(_) => AttrKind::Int,
            AttrValue::Float(_) => AttrKind::Float,
            AttrValue::Text(_) => AttrKind::Text,
            AttrValue::BoolList(_) => AttrKind::BoolList,
            AttrValue::IntList(_) => AttrKind::IntList,
            AttrValue::FloatList(_) => AttrKind::FloatList,
            AttrValue::TextList(_) => AttrKind::TextList,
        }
    }

    /// Returns the default value for a kind: `false`, `0`, `0.0`, the
    /// empty string, or the empty list.
    pub fn default_for(kind: AttrKind) -> Self {
        match kind {
            AttrKind::Bool => AttrValue::Bool(false),
            AttrKind::Int => AttrValue::Int(0),
            AttrKind::Float => AttrValue::Float(0.0),
            AttrKind::Text => AttrValue::Text(String::new()),
            AttrKind::BoolList => AttrValue::BoolList(Vec::new()),
            AttrKind::IntList => AttrValue::IntList(Vec::new()),
            AttrKind::FloatList => AttrValue::FloatList(Vec::new()),
            AttrKind::TextList => AttrValue::TextList(Vec::new()),
        }
    }

    /// Gets this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Gets this value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Gets this value as a float, if it is one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttrValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Gets this value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Int(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        AttrValue::Int(i64::from(n))
    }
}

impl From<u32> for AttrValue {
    fn from(n: u32) -> Self {
        AttrValue::Int(i64::from(n))
    }
}

impl From<f64> for AttrValue {
    fn from(f: f64) -> Self {
        AttrValue::Float(f)
    }
}

impl From<f32> for AttrValue {
    fn from(f: f32) -> Self {
        AttrValue::Float(f64::from(f))
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_values() {
        assert_eq!(AttrValue::Bool(true).kind(), AttrKind::Bool);
        assert_eq!(AttrValue::Int(1).kind(), AttrKind::Int);
        assert_eq!(AttrValue::Float(1.5).kind(), AttrKind::Float);
        assert_eq!(AttrValue::Text("x".into()).kind(), AttrKind::Text);
        assert_eq!(AttrValue::IntList(vec![]).kind(), AttrKind::IntList);
    }

    #[test]
    fn defaults() {
        assert_eq!(AttrValue::default_for(AttrKind::Bool), AttrValue::Bool(false));
        assert_eq!(AttrValue::default_for(AttrKind::Int), AttrValue::Int(0));
        assert_eq!(
            AttrValue::default_for(AttrKind::TextList),
            AttrValue::TextList(vec![])
        );
    }

    #[test]
    fn list_kinds() {
        assert!(AttrKind::BoolList.is_list());
        assert!(AttrKind::TextList.is_list());
        assert!(!AttrKind::Int.is_list());
    }

    #[test]
    fn from_impls() {
        assert_eq!(AttrValue::from(true), AttrValue::Bool(true));
        assert_eq!(AttrValue::from(42i32), AttrValue::Int(42));
        assert_eq!(AttrValue::from(42u32), AttrValue::Int(42));
        assert_eq!(AttrValue::from(1.5f32), AttrValue::Float(1.5));
        assert_eq!(AttrValue::from("hi"), AttrValue::Text("hi".into()));
    }
}
