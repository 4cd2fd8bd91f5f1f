//! # attrsync Codec
//!
//! Typed attribute value encoding/decoding for attrsync.
//!
//! Every profile attribute is persisted as a single string in a
//! [`attrsync_store::KvStore`]. This crate converts between that string
//! form and the supported typed values: booleans, integers, floats,
//! text, and ordered lists thereof.
//!
//! ## Encoding Rules
//!
//! - Scalars use their display form (`True`/`False` for booleans)
//! - An empty list encodes as the empty string; a missing value and an
//!   empty list are therefore indistinguishable after reload
//! - Non-empty lists quote each element (escaping `"` and `\`) and
//!   join the tokens with `;`
//! - Decoding is forgiving: a token that fails to parse is skipped
//!
//! ## Dispatch
//!
//! Which encode/decode branch applies is decided once per attribute by
//! its [`AttrKind`] tag, not by per-call type inspection.
//!
//! ## Usage
//!
//! ```
//! use attrsync_codec::{decode, encode, AttrKind, AttrValue};
//!
//! let value = AttrValue::IntList(vec![1, 2, 3]);
//! let raw = encode(&value);
//! assert_eq!(raw, r#""1";"2";"3""#);
//! assert_eq!(decode(AttrKind::IntList, &raw), value);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod typed;
mod value;

pub use decoder::{decode, split_list, try_decode};
pub use encoder::encode;
pub use error::{CodecError, CodecResult};
pub use typed::{AttrType, TypedStore};
pub use value::{AttrKind, AttrValue};
