//! Property tests for list encode/decode.

use attrsync_codec::{decode, encode, AttrKind, AttrValue};
use proptest::prelude::*;

proptest! {
    #[test]
    fn int_lists_roundtrip(items in prop::collection::vec(any::<i64>(), 0..32)) {
        let value = AttrValue::IntList(items);
        let raw = encode(&value);
        prop_assert_eq!(decode(AttrKind::IntList, &raw), value);
    }

    #[test]
    fn text_lists_roundtrip(items in prop::collection::vec(".*", 0..16)) {
        let value = AttrValue::TextList(items);
        let raw = encode(&value);
        prop_assert_eq!(decode(AttrKind::TextList, &raw), value);
    }

    #[test]
    fn bool_lists_roundtrip(items in prop::collection::vec(any::<bool>(), 0..32)) {
        let value = AttrValue::BoolList(items);
        let raw = encode(&value);
        prop_assert_eq!(decode(AttrKind::BoolList, &raw), value);
    }

    // Decoding never panics, whatever the input.
    #[test]
    fn decode_arbitrary_input(raw in ".*") {
        let _ = decode(AttrKind::IntList, &raw);
        let _ = decode(AttrKind::TextList, &raw);
        let _ = decode(AttrKind::Float, &raw);
    }
}
