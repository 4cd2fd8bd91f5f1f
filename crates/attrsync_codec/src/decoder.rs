//! Decoding of stored strings back into typed values.

use crate::value::{AttrKind, AttrValue};

/// Decodes a stored string into a value of the given kind.
///
/// Decoding is forgiving: an unparseable scalar yields the kind's
/// default, and an unparseable list token is skipped. An empty string
/// decodes to the empty list for list kinds, which means a missing
/// value and an empty list cannot be told apart after reload.
pub fn decode(kind: AttrKind, raw: &str) -> AttrValue {
    try_decode(kind, raw).unwrap_or_else(|| AttrValue::default_for(kind))
}

/// Decodes a stored string, returning `None` when a scalar fails to
/// parse. List kinds never fail; bad tokens are skipped instead.
pub fn try_decode(kind: AttrKind, raw: &str) -> Option<AttrValue> {
    match kind {
        AttrKind::Bool => parse_bool(raw).map(AttrValue::Bool),
        AttrKind::Int => raw.trim().parse::<i64>().ok().map(AttrValue::Int),
        AttrKind::Float => raw.trim().parse::<f64>().ok().map(AttrValue::Float),
        AttrKind::Text => Some(AttrValue::Text(raw.to_string())),
        AttrKind::BoolList => Some(AttrValue::BoolList(parse_tokens(raw, parse_bool))),
        AttrKind::IntList => Some(AttrValue::IntList(parse_tokens(raw, |t| {
            t.trim().parse::<i64>().ok()
        }))),
        AttrKind::FloatList => Some(AttrValue::FloatList(parse_tokens(raw, |t| {
            t.trim().parse::<f64>().ok()
        }))),
        AttrKind::TextList => Some(AttrValue::TextList(parse_tokens(raw, |t| {
            Some(t.to_string())
        }))),
    }
}

fn parse_tokens<T>(raw: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    split_list(raw)
        .iter()
        .filter_map(|token| parse(token))
        .collect()
}

/// Booleans decode from their long form and, additionally, from `0`/`1`.
fn parse_bool(token: &str) -> Option<bool> {
    match token.trim() {
        "True" | "true" | "1" => Some(true),
        "False" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Splits an encoded list into its unescaped tokens.
///
/// The scanner splits on `;` only outside quotes, honors backslash
/// escapes, and strips the surrounding quotes from each token. An
/// empty input yields no tokens.
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in raw.chars() {
        if escaped {
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            in_quotes = !in_quotes;
        } else if c == ';' && !in_quotes {
            tokens.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }

    tokens.push(current);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    #[test]
    fn scalar_roundtrips() {
        assert_eq!(decode(AttrKind::Bool, "True"), AttrValue::Bool(true));
        assert_eq!(decode(AttrKind::Int, "-42"), AttrValue::Int(-42));
        assert_eq!(decode(AttrKind::Float, "2.5"), AttrValue::Float(2.5));
        assert_eq!(
            decode(AttrKind::Text, "raw text"),
            AttrValue::Text("raw text".into())
        );
    }

    #[test]
    fn bool_accepts_digit_forms() {
        assert_eq!(decode(AttrKind::Bool, "1"), AttrValue::Bool(true));
        assert_eq!(decode(AttrKind::Bool, "0"), AttrValue::Bool(false));
        assert_eq!(
            decode(AttrKind::BoolList, r#""1";"0";"True""#),
            AttrValue::BoolList(vec![true, false, true])
        );
    }

    #[test]
    fn unparseable_scalar_falls_back_to_default() {
        assert_eq!(decode(AttrKind::Int, "not a number"), AttrValue::Int(0));
        assert_eq!(try_decode(AttrKind::Int, "not a number"), None);
    }

    #[test]
    fn bad_list_token_is_skipped() {
        assert_eq!(
            decode(AttrKind::IntList, r#""1";"oops";"3""#),
            AttrValue::IntList(vec![1, 3])
        );
    }

    #[test]
    fn empty_string_is_empty_list() {
        assert_eq!(decode(AttrKind::IntList, ""), AttrValue::IntList(vec![]));
        assert_eq!(decode(AttrKind::TextList, ""), AttrValue::TextList(vec![]));
    }

    #[test]
    fn quoted_separator_is_kept_inside_token() {
        assert_eq!(split_list(r#""a;b";"c""#), vec!["a;b", "c"]);
    }

    #[test]
    fn escapes_are_undone() {
        assert_eq!(
            split_list(r#""say \"hi\"";"back\\slash""#),
            vec![r#"say "hi""#, r"back\slash"]
        );
    }

    #[test]
    fn text_list_roundtrip_with_hostile_content() {
        let original = AttrValue::TextList(vec![
            r#"say "hi""#.into(),
            "a;b".into(),
            r"back\slash".into(),
            String::new(),
        ]);
        let raw = encode(&original);
        assert_eq!(decode(AttrKind::TextList, &raw), original);
    }

    #[test]
    fn float_list_roundtrip() {
        let original = AttrValue::FloatList(vec![0.5, -1.25, 1e10]);
        let raw = encode(&original);
        assert_eq!(decode(AttrKind::FloatList, &raw), original);
    }
}
