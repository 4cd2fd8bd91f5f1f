//! Inbound message vocabulary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single `{key, val}` attribute entry on the wire.
///
/// Values travel as strings in the codec's encoded form; numeric and
/// boolean JSON values are accepted and stringified on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrEntry {
    /// Attribute key.
    pub key: String,
    /// Encoded attribute value.
    pub val: String,
}

impl AttrEntry {
    /// Creates a new entry.
    pub fn new(key: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            val: val.into(),
        }
    }

    /// Extracts an entry from a JSON item of the form `{key, val}`.
    ///
    /// Returns `None` when the item has no string key. A non-string
    /// `val` is stringified; a missing `val` becomes the empty string.
    pub fn from_item(item: &Value) -> Option<Self> {
        let key = item.get("key")?.as_str()?.to_string();
        let val = match item.get("val") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        Some(Self { key, val })
    }
}

/// The kind of an inbound attribute message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Full snapshot of all attributes.
    GetAll,
    /// Delta push of changed attributes.
    Changed,
    /// Echo of a multi-key read.
    GetMulti,
    /// Echo of a private multi-key read.
    GetPrivate,
    /// Echo of a public multi-key read.
    GetPublic,
    /// Echo of a batched write.
    SetMulti,
    /// Echo of a single-key read.
    Get,
    /// Echo of a single-key write.
    Set,
    /// Echo of a single-key increment.
    Inc,
    /// Echo of a single-key decrement.
    Dec,
}

impl MessageKind {
    /// Parses a wire type string such as `attr.getAll`.
    pub fn from_type_str(s: &str) -> Option<Self> {
        match s {
            "attr.getAll" => Some(MessageKind::GetAll),
            "attr.changed" => Some(MessageKind::Changed),
            "attr.getMulti" => Some(MessageKind::GetMulti),
            "attr.getPrivate" => Some(MessageKind::GetPrivate),
            "attr.getPublic" => Some(MessageKind::GetPublic),
            "attr.setMulti" => Some(MessageKind::SetMulti),
            "attr.get" => Some(MessageKind::Get),
            "attr.set" => Some(MessageKind::Set),
            "attr.inc" => Some(MessageKind::Inc),
            "attr.dec" => Some(MessageKind::Dec),
            _ => None,
        }
    }

    /// Returns the wire type string.
    pub fn as_type_str(&self) -> &'static str {
        match self {
            MessageKind::GetAll => "attr.getAll",
            MessageKind::Changed => "attr.changed",
            MessageKind::GetMulti => "attr.getMulti",
            MessageKind::GetPrivate => "attr.getPrivate",
            MessageKind::GetPublic => "attr.getPublic",
            MessageKind::SetMulti => "attr.setMulti",
            MessageKind::Get => "attr.get",
            MessageKind::Set => "attr.set",
            MessageKind::Inc => "attr.inc",
            MessageKind::Dec => "attr.dec",
        }
    }

    /// Returns the payload field holding this kind's entry list, or
    /// `None` for single-entry kinds.
    pub fn list_field(&self) -> Option<&'static str> {
        match self {
            MessageKind::GetAll
            | MessageKind::GetMulti
            | MessageKind::GetPrivate
            | MessageKind::GetPublic
            | MessageKind::SetMulti => Some("data"),
            MessageKind::Changed => Some("list"),
            MessageKind::Get | MessageKind::Set | MessageKind::Inc | MessageKind::Dec => None,
        }
    }

    /// Returns true if this kind is only applied when the message
    /// targets the local user.
    ///
    /// Reads and write echoes can be issued against arbitrary users;
    /// snapshots and deltas always describe the local profile.
    pub fn requires_self(&self) -> bool {
        !matches!(self, MessageKind::GetAll | MessageKind::Changed)
    }
}

/// Delivery status of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    /// The canonical success status.
    Success,
    /// Anything else.
    Failure,
}

impl MessageStatus {
    /// Parses a wire status string; `success` and `ok` count as success.
    pub fn from_code(code: &str) -> Self {
        match code {
            "success" | "ok" => MessageStatus::Success,
            _ => MessageStatus::Failure,
        }
    }

    /// Returns true for the canonical success status.
    pub fn is_success(&self) -> bool {
        matches!(self, MessageStatus::Success)
    }
}

/// Targeting information carried by a message.
///
/// Used to decide whether an echo concerns the local user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targeting {
    /// Explicit target user id.
    pub user_id: Option<String>,
    /// Echoed login name, without a user id.
    pub login: Option<String>,
    /// Echoed auth provider, without a user id.
    pub provider: Option<String>,
}

impl Targeting {
    /// Reads targeting fields from a payload.
    pub fn from_payload(payload: &Value) -> Self {
        let field = |name: &str| {
            payload
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            user_id: field("uid"),
            login: field("login"),
            provider: field("provider"),
        }
    }

    /// Decides whether the message concerns the local user.
    ///
    /// - An explicit user id is self only when it equals the known
    ///   logged-in id; with no known id it is never self.
    /// - A login/provider echo without a user id is ambiguous and
    ///   conservatively treated as not-self.
    /// - No targeting information at all means self.
    pub fn is_self(&self, local_user_id: Option<&str>) -> bool {
        if let Some(uid) = &self.user_id {
            return local_user_id == Some(uid.as_str());
        }
        if self.login.is_some() || self.provider.is_some() {
            return false;
        }
        true
    }
}

/// An inbound message: kind, status, and raw payload.
#[derive(Debug, Clone)]
pub struct ServerMessage {
    /// Message kind.
    pub kind: MessageKind,
    /// Delivery status.
    pub status: MessageStatus,
    /// Raw JSON payload.
    pub payload: Value,
}

impl ServerMessage {
    /// Creates a message with the canonical success status.
    pub fn success(kind: MessageKind, payload: Value) -> Self {
        Self {
            kind,
            status: MessageStatus::Success,
            payload,
        }
    }

    /// Creates a message with a failure status.
    pub fn failure(kind: MessageKind, payload: Value) -> Self {
        Self {
            kind,
            status: MessageStatus::Failure,
            payload,
        }
    }

    /// Extracts the attribute entries this message carries.
    ///
    /// List kinds read their list field (`data` or `list`); single
    /// kinds read `{key, val}` from the payload itself. Malformed items
    /// are skipped.
    pub fn entries(&self) -> Vec<AttrEntry> {
        match self.kind.list_field() {
            Some(field) => self
                .payload
                .get(field)
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(AttrEntry::from_item).collect())
                .unwrap_or_default(),
            None => AttrEntry::from_item(&self.payload).into_iter().collect(),
        }
    }

    /// Reads the targeting information from the payload.
    pub fn targeting(&self) -> Targeting {
        Targeting::from_payload(&self.payload)
    }
}
