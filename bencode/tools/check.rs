/*!
Check command - validate bencoded data and test for canonical form
*/

use super::io::Input;
use super::options::DecodeArgs;
use clap::Parser;

/// Validate bencoded data
#[derive(Parser, Debug)]
#[command(
    about = "Check that bencoded data is valid and canonical",
    long_about = "Decode the input and re-encode it. The input is canonical when \
                  the re-encoded bytes are identical, meaning dictionary keys are \
                  sorted and unique and no length or integer is padded.\n\n\
                  Exits with an error if the input is invalid or not canonical."
)]
pub struct Command {
    #[command(flatten)]
    decode: DecodeArgs,

    /// Input bencode file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let data = self.input.read_all()?;
        let value = self.decode.parse(&data)?;

        if let Some(offset) = first_difference(&data, &bencode::encode::encode(&value)) {
            anyhow::bail!("Valid bencode, but not canonical from offset {offset}");
        }

        println!("OK: {} bytes of canonical bencode", data.len());
        Ok(())
    }
}

/// The offset of the first byte where the inputs differ
fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    match a.iter().zip(b).position(|(x, y)| x != y) {
        Some(offset) => Some(offset),
        None if a.len() != b.len() => Some(a.len().min(b.len())),
        None => None,
    }
}
