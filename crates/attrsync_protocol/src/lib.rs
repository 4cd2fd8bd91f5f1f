//! # attrsync Protocol
//!
//! Message vocabulary and request bodies for attrsync.
//!
//! This crate defines the inbound server messages the engine reacts to
//! (snapshots, deltas, and echoes of attribute reads/writes), the
//! self-targeting rules that gate echo application, and the two
//! outbound request bodies the engine emits.
//!
//! Payloads are carried as [`serde_json::Value`]; parsing is forgiving
//! throughout - malformed entries are skipped, never fatal, because the
//! engine treats every inbound oddity as "discard and keep local state".

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod messages;
mod requests;

pub use messages::{AttrEntry, MessageKind, MessageStatus, ServerMessage, Targeting};
pub use requests::OutboundRequest;
