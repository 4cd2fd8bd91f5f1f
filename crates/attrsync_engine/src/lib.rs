//! Client-side reconciliation engine for replicated profile attributes.
//!
//! The engine sits between a host application and an attribute server
//! that stores a flat, per-user map of string-encoded values guarded by
//! a single monotonically increasing version counter. Local mutations
//! apply immediately, persist locally, and are pushed when possible;
//! inbound server data is applied only when it is provably fresher than
//! what the client already holds. Conflicts resolve last-write-wins at
//! whole-profile granularity.
//!
//! The main entry point is [`ProfileEngine`]. Hosts obtain
//! [`AttributeHandle`]s for the attributes they care about, mutate them
//! through [`ProfileEngine::set_value`], and feed every inbound server
//! message to [`ProfileEngine::handle_message`]. Push outcomes are
//! reported back through [`ProfileEngine::push_completed`].
//!
//! The engine is transport-agnostic: hosts provide an
//! [`AttrTransport`] for outbound writes and a [`SessionState`] for
//! identity and connectivity. [`MockTransport`] covers tests.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod error;
mod handle;
mod keys;
mod ledger;
mod remote;
mod transport;

pub use engine::ProfileEngine;
pub use error::{EngineError, EngineResult};
pub use handle::AttributeHandle;
pub use ledger::DirtyLedger;
pub use remote::{RemoteAttribute, SessionState, StaticRemote, StaticSession};
pub use transport::{AttrTransport, MockTransport, RequestId};
