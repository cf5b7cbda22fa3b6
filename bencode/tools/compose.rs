/*!
Compose command - convert text formats to bencode
*/

use super::diag;
use super::io::{Input, Output};
use bencode::{Dict, Error, Value};
use clap::Parser;

/// Input format for compose command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum InputFormat {
    /// Diagnostic notation (lossless)
    #[value(alias = "diagnostic")]
    Diag,
    /// JSON format (no null, booleans or floats)
    Json,
}

/// Convert text formats to canonical bencode
#[derive(Parser, Debug)]
#[command(
    about = "Convert text formats to bencode",
    long_about = "Parse text in diagnostic notation or JSON and write canonical bencode.\n\n\
                  Diagnostic notation can describe any bencoded value.\n\
                  JSON is convenient for simple data, but only integers, strings, \
                  arrays and objects can be converted."
)]
pub struct Command {
    /// Input format
    #[arg(
        long,
        default_value = "diag",
        value_name = "FORMAT",
        help = "Input format: diag (lossless), json"
    )]
    format: InputFormat,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let input_text = self.input.read_to_string()?;

        let value = match self.format {
            InputFormat::Diag => diag::parse(&input_text).map_err(|errors| {
                let error_msg = errors
                    .iter()
                    .map(|e| format!("Parse error at {:?}: {}", e.span(), e))
                    .collect::<Vec<_>>()
                    .join("\n");
                anyhow::anyhow!("Failed to parse diagnostic notation:\n{}", error_msg)
            })?,
            InputFormat::Json => json_to_value(serde_json::from_str(&input_text)?)?,
        };

        let data = bencode::encode::encode(&value);
        tracing::debug!("Encoded {} bytes", data.len());

        self.output.unwrap_or(Output::Stdout).write_all(&data)?;
        Ok(())
    }
}

/// Convert a JSON value to a bencode value
fn json_to_value(value: serde_json::Value) -> Result<Value, Error> {
    use serde_json::Value as J;

    match value {
        J::Null => Err(Error::UnsupportedType("null")),
        J::Bool(_) => Err(Error::UnsupportedType("boolean")),
        J::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Integer(i)),
            None if n.is_u64() => Err(Error::IntegerOverflow),
            None => Err(Error::UnsupportedType("float")),
        },
        J::String(s) => Ok(Value::from(s)),
        J::Array(items) => items.into_iter().map(json_to_value).collect(),
        J::Object(obj) => obj
            .into_iter()
            .map(|(k, v)| Ok((k.into_bytes(), json_to_value(v)?)))
            .collect::<Result<Dict, Error>>()
            .map(Value::Dict),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_conversion() {
        let value = json_to_value(json!({"spam": ["a", 1, -2], "cow": "moo"})).unwrap();
        assert_eq!(
            bencode::encode::encode(&value),
            b"d3:cow3:moo4:spaml1:ai1ei-2eee"
        );
    }

    #[test]
    fn json_unsupported() {
        assert!(matches!(
            json_to_value(json!(null)),
            Err(Error::UnsupportedType("null"))
        ));
        assert!(matches!(
            json_to_value(json!([true])),
            Err(Error::UnsupportedType("boolean"))
        ));
        assert!(matches!(
            json_to_value(json!({"x": 1.5})),
            Err(Error::UnsupportedType("float"))
        ));
        assert!(matches!(
            json_to_value(json!(u64::MAX)),
            Err(Error::IntegerOverflow)
        ));
    }
}
