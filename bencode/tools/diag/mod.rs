/*!
Diagnostic notation for bencoded data

A text rendering of a bencode [`Value`](bencode::Value) that can be edited by
hand and parsed back without loss:

- Integers are written in decimal: `42`, `-7`
- Byte strings holding UTF-8 are quoted with JSON-style escapes: `"spam"`
- Other byte strings are hex, `h'00ff'`, or unpadded URL-safe base64, `b64'AP8'`
- Lists are bracketed: `[1, "two"]`
- Dictionaries are braced, with byte string keys: `{"cow": "moo"}`

The formatter always writes dictionary keys in ascending byte order; the
parser accepts them in any order but rejects duplicates.
*/

pub mod formatter;
pub mod parser;

pub use formatter::format_value;
pub use parser::parse;
