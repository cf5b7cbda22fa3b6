/*!
Bencode value to diagnostic notation
*/

use bencode::Value;

/// Format a value as single-line diagnostic notation
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Integer(n) => n.to_string(),
        Value::Bytes(bytes) => format_bytes(bytes),
        Value::List(items) => {
            let formatted: Vec<_> = items.iter().map(format_value).collect();
            format!("[{}]", formatted.join(", "))
        }
        Value::Dict(dict) => {
            let formatted: Vec<_> = dict
                .iter()
                .map(|(k, v)| format!("{}: {}", format_bytes(k), format_value(v)))
                .collect();
            format!("{{{}}}", formatted.join(", "))
        }
    }
}

fn format_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => format!("\"{}\"", escape_string(s)),
        Err(_) => format!("h'{}'", hex::encode(bytes)),
    }
}

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(format_value(&Value::Integer(42)), "42");
        assert_eq!(format_value(&Value::Integer(-42)), "-42");
        assert_eq!(
            format_value(&Value::Integer(i64::MIN)),
            "-9223372036854775808"
        );
    }

    #[test]
    fn byte_strings() {
        assert_eq!(format_value(&Value::from("spam")), r#""spam""#);
        assert_eq!(format_value(&Value::from("")), r#""""#);
        assert_eq!(
            format_value(&Value::from("a\"b\\c\nd\u{1}")),
            r#""a\"b\\c\nd\u0001""#
        );
        assert_eq!(
            format_value(&Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef])),
            "h'deadbeef'"
        );
    }

    #[test]
    fn containers() {
        assert_eq!(
            format_value(&Value::from_iter([Value::Integer(1), Value::from("two")])),
            r#"[1, "two"]"#
        );
        assert_eq!(format_value(&Value::List(vec![])), "[]");

        let dict = Value::from_iter([
            ("spam", Value::from_iter([Value::from("a"), Value::from("b")])),
            ("cow", Value::from("moo")),
        ]);
        assert_eq!(
            format_value(&dict),
            r#"{"cow": "moo", "spam": ["a", "b"]}"#
        );
    }
}
