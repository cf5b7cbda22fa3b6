/*!
Inspect command - display bencoded data in various formats
*/

use super::diag;
use super::io::{Input, Output};
use super::options::DecodeArgs;
use base64::prelude::*;
use bencode::Value;
use clap::Parser;

/// Inspect and display bencoded data
#[derive(Parser, Debug)]
#[command(about = "Inspect and display bencoded data", long_about = None)]
pub struct Command {
    /// Output format
    #[arg(
        long,
        default_value = "diag",
        value_name = "FORMAT",
        help = "Output format: diag/diagnostic (human-readable, lossless), json (lossy), hex"
    )]
    format: OutputFormat,

    #[command(flatten)]
    decode: DecodeArgs,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input bencode file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Diagnostic notation (human-readable, lossless)
    #[value(alias = "diagnostic")]
    Diag,
    /// JSON format (lossy - non UTF-8 byte strings become base64)
    Json,
    /// Hexadecimal dump of the raw input
    Hex,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let output_text = match self.format {
            OutputFormat::Diag => diag::format_value(&self.decode.read(&self.input)?),
            OutputFormat::Json => {
                serde_json::to_string_pretty(&value_to_json(&self.decode.read(&self.input)?))?
            }
            OutputFormat::Hex => hex::encode(self.input.read_all()?),
        };

        self.output
            .unwrap_or(Output::Stdout)
            .write_line(&output_text)?;
        Ok(())
    }
}

/// Convert a value to JSON (lossy)
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Integer(n) => (*n).into(),
        Value::Bytes(bytes) => bytes_to_json(bytes).into(),
        Value::List(items) => items.iter().map(value_to_json).collect(),
        Value::Dict(dict) => serde_json::Value::Object(
            dict.iter()
                .map(|(k, v)| (bytes_to_json(k), value_to_json(v)))
                .collect(),
        ),
    }
}

/// UTF-8 text as-is, anything else as base64
fn bytes_to_json(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => BASE64_URL_SAFE_NO_PAD.encode(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_conversion() {
        let value = Value::from_iter([
            ("n", Value::Integer(-3)),
            ("raw", Value::Bytes(vec![0xff, 0x00])),
            ("list", Value::from_iter([Value::from("a")])),
        ]);
        assert_eq!(
            value_to_json(&value),
            serde_json::json!({"list": ["a"], "n": -3, "raw": "_wA"})
        );
    }
}
