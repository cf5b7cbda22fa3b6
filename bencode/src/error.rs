/*!
Error types shared by the decoder and the encoder.

Grammar violations are reported as [`Error::InvalidFormat`] carrying a
[`Reason`], while running out of input part-way through a value is always
[`Error::Truncated`], so callers can tell "malformed" apart from "incomplete".
*/

use super::Kind;
use alloc::vec::Vec;
use thiserror::Error;

/// The error type for all decode and encode operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The input ended before the current value was complete.
    #[error("Not enough data for encoded value")]
    Truncated,

    /// The input violates the bencode grammar.
    #[error("Invalid format: {0}")]
    InvalidFormat(Reason),

    /// A typed decode found a value of a different shape.
    #[error("Incorrect type: expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    /// A syntactically valid integer does not fit the target type.
    #[error("Integer value out of range")]
    IntegerOverflow,

    /// A value has no bencode representation.
    #[error("Unsupported value type {0}")]
    UnsupportedType(&'static str),

    /// A dictionary contains the same key more than once.
    #[error("Duplicate dictionary key {}", KeyDisplay(.0))]
    DuplicateKey(Vec<u8>),

    /// Dictionary keys are not in ascending byte order.
    #[error("Dictionary keys are not sorted")]
    UnsortedKeys,

    /// Lists and dictionaries are nested deeper than allowed.
    #[error("Maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),

    /// There are bytes left over after the end of the value.
    #[error("Additional data after the end of the encoded value")]
    AdditionalData,

    /// A byte string requested as text is not valid UTF-8.
    #[error("Byte string is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] core::str::Utf8Error),

    /// An `embedded-io` reader failed.
    #[cfg(feature = "embedded-io")]
    #[error("Read failed: {0:?}")]
    Read(embedded_io::ErrorKind),

    /// The byte source failed.
    #[cfg(feature = "std")]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` for errors caused by malformed, rather than incomplete, input.
    ///
    /// A shape mismatch on a typed decode counts as a format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, Self::InvalidFormat(_) | Self::TypeMismatch { .. })
    }

    /// Returns `true` if the input ended early.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated)
    }
}

/// The grammar rule an input violated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    #[error("unexpected byte {0:#04x}")]
    UnexpectedByte(u8),

    #[error("integer has no digits")]
    EmptyInteger,

    #[error("negative zero")]
    NegativeZero,

    #[error("leading zero")]
    LeadingZero,

    #[error("byte string length contains {0:#04x}")]
    InvalidLength(u8),

    #[error("byte string length too large")]
    LengthOverflow,

    #[error("dictionary key must be a byte string, found {0:#04x}")]
    NonStringKey(u8),

    #[error("dictionary key has no value")]
    MissingValue,
}

impl From<Reason> for Error {
    fn from(reason: Reason) -> Self {
        Self::InvalidFormat(reason)
    }
}

struct KeyDisplay<'a>(&'a [u8]);

impl core::fmt::Display for KeyDisplay<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match core::str::from_utf8(self.0) {
            Ok(s) => write!(f, "{s:?}"),
            Err(_) => {
                f.write_str("h'")?;
                for b in self.0 {
                    write!(f, "{b:02x}")?;
                }
                f.write_str("'")
            }
        }
    }
}
