//! Outbound request bodies.

use crate::messages::AttrEntry;
use serde_json::{json, Value};

/// An outbound attribute write request.
///
/// Exactly one request is built per push: a single-key `attr.set` when
/// one change is pending, otherwise a batched `attr.setMulti` carrying
/// every pending pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundRequest {
    /// Single-key write: `attr.set {key, val}`.
    Set(AttrEntry),
    /// Batched write: `attr.setMulti {data: [{key, val, action}, ..]}`.
    SetMulti(Vec<AttrEntry>),
}

impl OutboundRequest {
    /// Builds the request for a pending change set.
    pub fn from_pending(mut pending: Vec<AttrEntry>) -> Self {
        if pending.len() == 1 {
            OutboundRequest::Set(pending.remove(0))
        } else {
            OutboundRequest::SetMulti(pending)
        }
    }

    /// Returns the wire type string.
    pub fn type_str(&self) -> &'static str {
        match self {
            OutboundRequest::Set(_) => "attr.set",
            OutboundRequest::SetMulti(_) => "attr.setMulti",
        }
    }

    /// Returns the keys this request carries.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            OutboundRequest::Set(entry) => vec![entry.key.as_str()],
            OutboundRequest::SetMulti(entries) => {
                entries.iter().map(|e| e.key.as_str()).collect()
            }
        }
    }

    /// Builds the JSON body.
    pub fn to_payload(&self) -> Value {
        match self {
            OutboundRequest::Set(entry) => json!({
                "key": entry.key,
                "val": entry.val,
            }),
            OutboundRequest::SetMulti(entries) => {
                let items: Vec<Value> = entries
                    .iter()
                    .map(|e| {
                        json!({
                            "key": e.key,
                            "val": e.val,
                            "action": "set",
                        })
                    })
                    .collect();
                json!({ "data": items })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn one_pending_key_becomes_single_set() {
        let req = OutboundRequest::from_pending(vec![AttrEntry::new("coins", "20")]);
        assert_eq!(req.type_str(), "attr.set");
        assert_eq!(req.to_payload(), json!({"key": "coins", "val": "20"}));
    }

    #[test]
    fn several_pending_keys_become_set_multi() {
        let req = OutboundRequest::from_pending(vec![
            AttrEntry::new("coins", "20"),
            AttrEntry::new("name", "alice"),
        ]);
        assert_eq!(req.type_str(), "attr.setMulti");
        assert_eq!(
            req.to_payload(),
            json!({"data": [
                {"key": "coins", "val": "20", "action": "set"},
                {"key": "name", "val": "alice", "action": "set"},
            ]})
        );
        assert_eq!(req.keys(), vec!["coins", "name"]);
    }
}
