//! Encoding of typed values into their stored string form.

use crate::value::AttrValue;

/// Encodes a value into the string form a [`attrsync_store::KvStore`]
/// can hold.
///
/// Scalars use their display form. Lists quote each formatted element
/// (escaping `"` and `\`) and join the tokens with `;`. An empty list
/// encodes as the empty string.
pub fn encode(value: &AttrValue) -> String {
    match value {
        AttrValue::Bool(b) => format_bool(*b).to_string(),
        AttrValue::Int(n) => n.to_string(),
        AttrValue::Float(f) => f.to_string(),
        AttrValue::Text(s) => s.clone(),
        AttrValue::BoolList(items) => encode_list(items.iter().map(|b| format_bool(*b).to_string())),
        AttrValue::IntList(items) => encode_list(items.iter().map(|n| n.to_string())),
        AttrValue::FloatList(items) => encode_list(items.iter().map(|f| f.to_string())),
        AttrValue::TextList(items) => encode_list(items.iter().cloned()),
    }
}

fn format_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

fn encode_list(tokens: impl Iterator<Item = String>) -> String {
    let quoted: Vec<String> = tokens.map(|t| quote_token(&t)).collect();
    quoted.join(";")
}

/// Wraps a token in quotes, escaping embedded `"` and `\`.
fn quote_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len() + 2);
    out.push('"');
    for c in token.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars() {
        assert_eq!(encode(&AttrValue::Bool(true)), "True");
        assert_eq!(encode(&AttrValue::Bool(false)), "False");
        assert_eq!(encode(&AttrValue::Int(-7)), "-7");
        assert_eq!(encode(&AttrValue::Float(2.5)), "2.5");
        assert_eq!(encode(&AttrValue::Text("raw text".into())), "raw text");
    }

    #[test]
    fn empty_list_is_empty_string() {
        assert_eq!(encode(&AttrValue::IntList(vec![])), "");
        assert_eq!(encode(&AttrValue::TextList(vec![])), "");
    }

    #[test]
    fn int_list() {
        assert_eq!(
            encode(&AttrValue::IntList(vec![1, 2, 3])),
            r#""1";"2";"3""#
        );
    }

    #[test]
    fn bool_list_uses_long_form() {
        assert_eq!(
            encode(&AttrValue::BoolList(vec![true, false])),
            r#""True";"False""#
        );
    }

    #[test]
    fn text_list_escapes_quotes_and_backslashes() {
        let value = AttrValue::TextList(vec![r#"say "hi""#.into(), r"back\slash".into()]);
        assert_eq!(encode(&value), r#""say \"hi\"";"back\\slash""#);
    }

    #[test]
    fn text_with_separator_stays_quoted() {
        let value = AttrValue::TextList(vec!["a;b".into(), "c".into()]);
        assert_eq!(encode(&value), r#""a;b";"c""#);
    }
}
