/*!
Decoder limits and strictness shared by the commands that read bencode
*/

use super::io::Input;
use anyhow::Context;
use bencode::{
    Value,
    decode::{self, Decoder, DuplicateKeys},
    source::IoSource,
};

#[derive(clap::Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Maximum nesting depth of lists and dictionaries
    #[arg(long, value_name = "DEPTH", default_value_t = decode::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Only accept canonical input: sorted unique keys, no padded lengths
    #[arg(long)]
    strict: bool,

    /// Reject byte string lengths with leading zeros
    #[arg(long)]
    strict_lengths: bool,

    /// Accept repeated dictionary keys, keeping the last value
    #[arg(long, conflicts_with = "strict")]
    allow_duplicate_keys: bool,
}

impl DecodeArgs {
    pub fn options(&self) -> decode::Options {
        let options = if self.strict {
            decode::Options::strict()
        } else {
            decode::Options::default()
        };

        let mut options = options.with_max_depth(self.max_depth);
        if self.strict_lengths {
            options = options.with_strict_lengths(true);
        }
        if self.allow_duplicate_keys {
            options = options.with_duplicate_keys(DuplicateKeys::LastWins);
        }
        options
    }

    /// Decode exactly one value from `input`, streaming from the reader
    pub fn read(&self, input: &Input) -> anyhow::Result<Value> {
        let mut decoder = Decoder::with_options(IoSource::new(input.open()?), self.options());
        let result = decoder.decode_value();
        let value =
            result.with_context(|| format!("Invalid bencode at offset {}", decoder.offset()))?;
        let offset = decoder.offset();
        decoder
            .finish()
            .with_context(|| format!("Unexpected data at offset {offset}"))?;

        tracing::debug!("Decoded {offset} bytes");
        Ok(value)
    }

    /// Decode exactly one value from an in-memory buffer
    pub fn parse(&self, data: &[u8]) -> anyhow::Result<Value> {
        decode::parse_with(data, self.options()).context("Invalid bencode")
    }
}
