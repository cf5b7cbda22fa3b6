/*!
Diagnostic notation parser, built with Chumsky 0.12
*/

use base64::prelude::*;
use bencode::{Dict, Value};
use chumsky::prelude::*;

type Span = SimpleSpan<usize>;
type Extra<'a> = extra::Err<Rich<'a, char, Span>>;
type BoxedParser<'a, T> = Boxed<'a, 'a, &'a str, T, Extra<'a>>;

/// Parse diagnostic notation text into a value
pub fn parse(input: &str) -> Result<Value, Vec<Rich<'_, char, Span>>> {
    diag_parser().parse(input).into_result()
}

fn diag_parser<'a>() -> BoxedParser<'a, Value> {
    value_parser().then_ignore(end()).boxed()
}

fn whitespace<'a>() -> BoxedParser<'a, ()> {
    any()
        .filter(|c: &char| c.is_whitespace())
        .repeated()
        .ignored()
        .boxed()
}

fn value_parser<'a>() -> BoxedParser<'a, Value> {
    recursive(|value| {
        let value_boxed: BoxedParser<'a, Value> = value.clone().boxed();

        choice((
            integer_parser(),
            bytes_parser().map(Value::Bytes),
            list_parser(value_boxed.clone()),
            dict_parser(value_boxed),
        ))
        .padded_by(whitespace())
    })
    .boxed()
}

/// Integer: 0, 42, -1000000
fn integer_parser<'a>() -> BoxedParser<'a, Value> {
    just('-')
        .or_not()
        .then(text::int(10))
        .to_slice()
        .try_map(|s: &str, span| {
            s.parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| Rich::custom(span, format!("Invalid integer: {}", e)))
        })
        .labelled("integer")
        .boxed()
}

/// Any of the byte string forms
fn bytes_parser<'a>() -> BoxedParser<'a, Vec<u8>> {
    choice((hex_bytes_parser(), b64_bytes_parser(), text_string_parser()))
        .labelled("byte string")
        .boxed()
}

/// Hex byte string: h'deadbeef'
fn hex_bytes_parser<'a>() -> BoxedParser<'a, Vec<u8>> {
    just("h'")
        .ignore_then(
            any()
                .filter(|c: &char| c.is_ascii_hexdigit())
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('\''))
        .try_map(|hex_str, span| {
            hex::decode(&hex_str)
                .map_err(|e| Rich::custom(span, format!("Invalid hex string: {}", e)))
        })
        .labelled("hex byte string")
        .boxed()
}

/// Base64 byte string: b64'SGVsbG8'
fn b64_bytes_parser<'a>() -> BoxedParser<'a, Vec<u8>> {
    just("b64'")
        .ignore_then(
            any()
                .filter(|c: &char| *c != '\'')
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('\''))
        .try_map(|b64_str, span| {
            BASE64_URL_SAFE_NO_PAD
                .decode(&b64_str)
                .map_err(|e| Rich::custom(span, format!("Invalid base64 string: {}", e)))
        })
        .labelled("base64 byte string")
        .boxed()
}

/// Quoted text, stored as its UTF-8 bytes: "hello world"
///
/// Accepts the JSON escapes; anything else after a backslash is an error.
fn text_string_parser<'a>() -> BoxedParser<'a, Vec<u8>> {
    let unicode = just('u')
        .ignore_then(
            any()
                .filter(|c: &char| c.is_ascii_hexdigit())
                .repeated()
                .exactly(4)
                .to_slice(),
        )
        .try_map(|hex: &str, span| {
            u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| Rich::custom(span, format!("Invalid unicode escape: {}", hex)))
        });

    let simple = one_of("\"\\/bfnrt").map(|c: char| match c {
        'b' => '\x08',
        'f' => '\x0C',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        c => c,
    });

    let escape = just('\\')
        .ignore_then(unicode.or(simple))
        .labelled("escape sequence");

    just('"')
        .ignore_then(escape.or(none_of("\"\\")).repeated().collect::<String>())
        .then_ignore(just('"'))
        .map(String::into_bytes)
        .labelled("text string")
        .boxed()
}

/// List: [1, "two", []]
fn list_parser<'a>(value: BoxedParser<'a, Value>) -> BoxedParser<'a, Value> {
    just('[')
        .padded_by(whitespace())
        .ignore_then(
            value
                .separated_by(just(',').padded_by(whitespace()))
                .allow_trailing()
                .collect::<Vec<_>>()
                .padded_by(whitespace()),
        )
        .then_ignore(just(']').padded_by(whitespace()))
        .map(Value::List)
        .labelled("list")
        .boxed()
}

/// Dictionary: {"a": 1, h'ff': 2}
fn dict_parser<'a>(value: BoxedParser<'a, Value>) -> BoxedParser<'a, Value> {
    let entry = bytes_parser()
        .padded_by(whitespace())
        .then_ignore(just(':').padded_by(whitespace()))
        .then(value)
        .boxed();

    just('{')
        .padded_by(whitespace())
        .ignore_then(
            entry
                .separated_by(just(',').padded_by(whitespace()))
                .allow_trailing()
                .collect::<Vec<_>>()
                .padded_by(whitespace()),
        )
        .then_ignore(just('}').padded_by(whitespace()))
        .try_map(|entries: Vec<(Vec<u8>, Value)>, span| {
            let mut dict = Dict::new();
            for (key, value) in entries {
                if dict.insert(key, value).is_some() {
                    return Err(Rich::custom(span, "Duplicate dictionary key"));
                }
            }
            Ok(Value::Dict(dict))
        })
        .labelled("dictionary")
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::format_value;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse("42").unwrap(), Value::Integer(42));
        assert_eq!(parse("-42").unwrap(), Value::Integer(-42));
        assert_eq!(parse(" 0 ").unwrap(), Value::Integer(0));
        assert_eq!(
            parse("-9223372036854775808").unwrap(),
            Value::Integer(i64::MIN)
        );
        assert!(parse("9223372036854775808").is_err());
        assert!(parse("1.5").is_err());
    }

    #[test]
    fn test_parse_text_string() {
        assert_eq!(parse(r#""hello world""#).unwrap(), Value::from("hello world"));
        assert_eq!(
            parse(r#""a\"b\nA\u00e9\/""#).unwrap(),
            Value::from("a\"b\nA\u{e9}/")
        );
    }

    #[test]
    fn test_parse_invalid_escape() {
        for text in [
            r#""\uZZZZ""#,
            r#""\u12""#,
            r#""\u""#,
            r#""\ud800""#,
            r#""\q""#,
            r#""\""#,
        ] {
            assert!(parse(text).is_err(), "{text}");
        }
    }

    #[test]
    fn test_parse_hex_bytes() {
        assert_eq!(
            parse("h'deadbeef'").unwrap(),
            Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef])
        );
        assert!(parse("h'abc'").is_err());
    }

    #[test]
    fn test_parse_b64_bytes() {
        assert_eq!(parse("b64'SGVsbG8'").unwrap(), Value::from("Hello"));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse(r#"[1, "two", [], ]"#).unwrap(),
            Value::List(vec![
                Value::Integer(1),
                Value::from("two"),
                Value::List(vec![]),
            ])
        );
    }

    #[test]
    fn test_parse_dict() {
        let value = parse(r#"{"spam": [1, 2], h'636f77': "moo"}"#).unwrap();
        assert_eq!(
            value,
            Value::from_iter([
                ("cow", Value::from("moo")),
                (
                    "spam",
                    Value::from_iter([Value::Integer(1), Value::Integer(2)])
                ),
            ])
        );
        assert_eq!(parse("{}").unwrap(), Value::Dict(Dict::new()));
    }

    #[test]
    fn test_parse_invalid_dict() {
        // Keys must be byte strings
        assert!(parse("{1: 2}").is_err());
        assert!(parse(r#"{"a": 1, h'61': 2}"#).is_err());
        assert!(parse(r#"{"a"}"#).is_err());
    }

    #[test]
    fn test_parse_trailing_input() {
        assert!(parse("1 2").is_err());
        assert!(parse("[1").is_err());
    }

    #[test]
    fn test_roundtrip() {
        let text = r#"{"announce": "udp://tracker.example:80", "info": {"length": 1099511627776, "pieces": h'00ff10'}, "tabs": "\t\u0001"}"#;
        let parsed = parse(text).unwrap();
        let encoded = bencode::encode::encode(&parsed);
        let decoded = bencode::decode::parse::<Value>(&encoded).unwrap();
        assert_eq!(decoded, parsed);
        assert_eq!(format_value(&decoded), text);
    }
}
