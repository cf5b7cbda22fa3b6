/*!
Bencode decoding.

Decoding is a recursive descent over the four shapes. The first byte of a
value is its shape tag: an ASCII digit starts a byte string (and is the first
digit of its length), `i` an integer, `l` a list and `d` a dictionary.

```
use bencode::{decode, Value};

let value = decode::parse::<Value>(b"l4:spami3ee").unwrap();
assert_eq!(value, Value::List(vec![Value::from("spam"), Value::from(3)]));
```
*/

use super::{Dict, Error, Kind, Reason, Value, source::Source};
use alloc::{collections::btree_map::Entry, string::String, vec::Vec};
use tracing::{debug, trace};

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What to do when a dictionary repeats a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum DuplicateKeys {
    /// Fail with [`Error::DuplicateKey`].
    #[default]
    Reject,
    /// Keep the value that appears last.
    LastWins,
}

/// Decoder settings.
///
/// The defaults accept everything the bencode grammar allows, apart from
/// duplicate dictionary keys, while bounding nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "kebab-case")
)]
pub struct Options {
    /// Maximum number of nested lists and dictionaries.
    pub max_depth: usize,
    pub duplicate_keys: DuplicateKeys,
    /// Reject byte string lengths with leading zeros, such as `01:a`.
    pub strict_lengths: bool,
    /// Reject dictionaries whose keys are not in ascending byte order.
    pub require_sorted_keys: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            duplicate_keys: DuplicateKeys::Reject,
            strict_lengths: false,
            require_sorted_keys: false,
        }
    }
}

impl Options {
    /// Only accept input in canonical form.
    pub fn strict() -> Self {
        Self {
            strict_lengths: true,
            require_sorted_keys: true,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_duplicate_keys(mut self, duplicate_keys: DuplicateKeys) -> Self {
        self.duplicate_keys = duplicate_keys;
        self
    }

    pub fn with_strict_lengths(mut self, strict_lengths: bool) -> Self {
        self.strict_lengths = strict_lengths;
        self
    }

    pub fn with_sorted_keys(mut self, require_sorted_keys: bool) -> Self {
        self.require_sorted_keys = require_sorted_keys;
        self
    }
}

/// Types that can be decoded from bencode.
pub trait FromBencode: Sized {
    fn from_bencode<S: Source>(decoder: &mut Decoder<S>) -> Result<Self, Error>;
}

/// Decodes values from a [`Source`].
///
/// A decoder can be used for several consecutive values; after an error its
/// position in the source is unspecified.
#[derive(Debug)]
pub struct Decoder<S> {
    source: S,
    options: Options,
    depth: usize,
    offset: usize,
}

impl<S: Source> Decoder<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, Options::default())
    }

    pub fn with_options(source: S, options: Options) -> Self {
        Self {
            source,
            options,
            depth: 0,
            offset: 0,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The number of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Check that the source is exhausted, returning it.
    ///
    /// This reads one byte past the last value.
    pub fn finish(mut self) -> Result<S, Error> {
        match self.source.next_byte()? {
            Some(_) => Err(Error::AdditionalData),
            None => Ok(self.source),
        }
    }

    pub fn decode<T: FromBencode>(&mut self) -> Result<T, Error> {
        T::from_bencode(self)
    }

    /// Decode a value of any shape.
    pub fn decode_value(&mut self) -> Result<Value, Error> {
        let tag = self.next_byte()?;
        self.value_from_tag(tag)
    }

    pub fn decode_integer(&mut self) -> Result<i64, Error> {
        self.expect_kind(Kind::Integer)?;
        self.integer_body()
    }

    pub fn decode_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let tag = self.expect_kind(Kind::Bytes)?;
        self.bytes_body(tag)
    }

    pub fn decode_list(&mut self) -> Result<Vec<Value>, Error> {
        self.expect_kind(Kind::List)?;
        self.list_body()
    }

    pub fn decode_dict(&mut self) -> Result<Dict, Error> {
        self.expect_kind(Kind::Dict)?;
        self.dict_body()
    }

    fn next_byte(&mut self) -> Result<u8, Error> {
        let b = self.source.next_byte()?.ok_or(Error::Truncated)?;
        self.offset += 1;
        Ok(b)
    }

    fn expect_kind(&mut self, expected: Kind) -> Result<u8, Error> {
        let tag = self.next_byte()?;
        match Kind::from_tag(tag) {
            Some(found) if found == expected => Ok(tag),
            Some(found) => {
                trace!("Expected {expected} at offset {}, found {found}", self.offset - 1);
                Err(Error::TypeMismatch { expected, found })
            }
            None => Err(Reason::UnexpectedByte(tag).into()),
        }
    }

    fn value_from_tag(&mut self, tag: u8) -> Result<Value, Error> {
        match Kind::from_tag(tag) {
            Some(Kind::Bytes) => self.bytes_body(tag).map(Value::Bytes),
            Some(Kind::Integer) => self.integer_body().map(Value::Integer),
            Some(Kind::List) => self.list_body().map(Value::List),
            Some(Kind::Dict) => self.dict_body().map(Value::Dict),
            None => Err(Reason::UnexpectedByte(tag).into()),
        }
    }

    fn integer_body(&mut self) -> Result<i64, Error> {
        match self.next_byte()? {
            b'e' => return Err(Reason::EmptyInteger.into()),
            b'-' => {}
            // A zero must be the whole literal
            b'0' => {
                return match self.next_byte()? {
                    b'e' => Ok(0),
                    b'0'..=b'9' => Err(Reason::LeadingZero.into()),
                    b => Err(Reason::UnexpectedByte(b).into()),
                };
            }
            b @ b'1'..=b'9' => return self.integer_digits(i64::from(b - b'0'), false),
            b => return Err(Reason::UnexpectedByte(b).into()),
        }

        match self.next_byte()? {
            b'0' => Err(Reason::NegativeZero.into()),
            b'e' => Err(Reason::EmptyInteger.into()),
            b @ b'1'..=b'9' => self.integer_digits(-i64::from(b - b'0'), true),
            b => Err(Reason::UnexpectedByte(b).into()),
        }
    }

    /// Accumulate the remaining digits of an integer up to the closing `e`.
    ///
    /// Negative values accumulate downwards so that `i64::MIN` is reachable.
    fn integer_digits(&mut self, mut value: i64, negative: bool) -> Result<i64, Error> {
        loop {
            match self.next_byte()? {
                b'e' => return Ok(value),
                b @ b'0'..=b'9' => {
                    let digit = i64::from(b - b'0');
                    value = value
                        .checked_mul(10)
                        .and_then(|v| {
                            if negative {
                                v.checked_sub(digit)
                            } else {
                                v.checked_add(digit)
                            }
                        })
                        .ok_or(Error::IntegerOverflow)?;
                }
                b => return Err(Reason::UnexpectedByte(b).into()),
            }
        }
    }

    /// `first` is the leading length digit, already consumed.
    fn bytes_body(&mut self, first: u8) -> Result<Vec<u8>, Error> {
        let mut len = usize::from(first - b'0');
        loop {
            match self.next_byte()? {
                b':' => break,
                b @ b'0'..=b'9' => {
                    if first == b'0' && self.options.strict_lengths {
                        return Err(Reason::LeadingZero.into());
                    }
                    len = len
                        .checked_mul(10)
                        .and_then(|l| l.checked_add(usize::from(b - b'0')))
                        .ok_or(Reason::LengthOverflow)?;
                }
                b => return Err(Reason::InvalidLength(b).into()),
            }
        }

        let mut data = Vec::new();
        let read = self.source.read_into(len, &mut data)?;
        self.offset += read;
        if read < len {
            return Err(Error::Truncated);
        }
        Ok(data)
    }

    fn nested<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Self) -> Result<T, Error>,
    {
        if self.depth >= self.options.max_depth {
            debug!(
                offset = self.offset,
                "Nesting exceeds the maximum depth of {}", self.options.max_depth
            );
            return Err(Error::DepthExceeded(self.options.max_depth));
        }
        self.depth += 1;
        let r = f(self);
        self.depth -= 1;
        r
    }

    fn list_body(&mut self) -> Result<Vec<Value>, Error> {
        self.nested(|d| {
            let mut items = Vec::new();
            loop {
                match d.next_byte()? {
                    b'e' => return Ok(items),
                    tag => items.push(d.value_from_tag(tag)?),
                }
            }
        })
    }

    fn dict_body(&mut self) -> Result<Dict, Error> {
        self.nested(|d| {
            let mut dict = Dict::new();
            loop {
                let tag = match d.next_byte()? {
                    b'e' => return Ok(dict),
                    tag if tag.is_ascii_digit() => tag,
                    tag => return Err(Reason::NonStringKey(tag).into()),
                };
                let key = d.bytes_body(tag)?;

                if d.options.require_sorted_keys
                    && dict.last_key_value().is_some_and(|(last, _)| *last > key)
                {
                    return Err(Error::UnsortedKeys);
                }

                let value = match d.next_byte()? {
                    b'e' => return Err(Reason::MissingValue.into()),
                    tag => d.value_from_tag(tag)?,
                };

                match dict.entry(key) {
                    Entry::Vacant(e) => {
                        e.insert(value);
                    }
                    Entry::Occupied(mut e) => {
                        if d.options.duplicate_keys == DuplicateKeys::Reject
                            || d.options.require_sorted_keys
                        {
                            return Err(Error::DuplicateKey(e.remove_entry().0));
                        }
                        debug!(offset = d.offset, "Duplicate dictionary key, last value wins");
                        e.insert(value);
                    }
                }
            }
        })
    }
}

/// Decode a value of any shape from `source`.
pub fn decode<S: Source>(source: S) -> Result<Value, Error> {
    Decoder::new(source).decode_value()
}

pub fn decode_integer<S: Source>(source: S) -> Result<i64, Error> {
    Decoder::new(source).decode_integer()
}

pub fn decode_bytes<S: Source>(source: S) -> Result<Vec<u8>, Error> {
    Decoder::new(source).decode_bytes()
}

pub fn decode_list<S: Source>(source: S) -> Result<Vec<Value>, Error> {
    Decoder::new(source).decode_list()
}

pub fn decode_dict<S: Source>(source: S) -> Result<Dict, Error> {
    Decoder::new(source).decode_dict()
}

/// Decode `data`, which must hold exactly one value.
pub fn parse<T: FromBencode>(data: &[u8]) -> Result<T, Error> {
    parse_with(data, Options::default())
}

pub fn parse_with<T: FromBencode>(data: &[u8], options: Options) -> Result<T, Error> {
    let mut decoder = Decoder::with_options(data, options);
    let value = decoder.decode()?;
    decoder.finish()?;
    Ok(value)
}

/// Decode the value at the start of `data`, returning it with the number of bytes it occupied.
pub fn parse_prefix<T: FromBencode>(data: &[u8]) -> Result<(T, usize), Error> {
    let mut decoder = Decoder::new(data);
    let value = decoder.decode()?;
    Ok((value, decoder.offset()))
}

impl FromBencode for Value {
    fn from_bencode<S: Source>(decoder: &mut Decoder<S>) -> Result<Self, Error> {
        decoder.decode_value()
    }
}

impl FromBencode for i64 {
    fn from_bencode<S: Source>(decoder: &mut Decoder<S>) -> Result<Self, Error> {
        decoder.decode_integer()
    }
}

macro_rules! impl_int_from_bencode {
    ($($ty:ty),*) => {
        $(
            impl FromBencode for $ty {
                fn from_bencode<S: Source>(decoder: &mut Decoder<S>) -> Result<Self, Error> {
                    <$ty>::try_from(decoder.decode_integer()?).map_err(|_| Error::IntegerOverflow)
                }
            }
        )*
    };
}

impl_int_from_bencode!(i8, i16, i32, isize, u8, u16, u32, u64, usize);

impl FromBencode for Vec<u8> {
    fn from_bencode<S: Source>(decoder: &mut Decoder<S>) -> Result<Self, Error> {
        decoder.decode_bytes()
    }
}

impl FromBencode for String {
    fn from_bencode<S: Source>(decoder: &mut Decoder<S>) -> Result<Self, Error> {
        String::from_utf8(decoder.decode_bytes()?).map_err(|e| e.utf8_error().into())
    }
}

impl FromBencode for Vec<Value> {
    fn from_bencode<S: Source>(decoder: &mut Decoder<S>) -> Result<Self, Error> {
        decoder.decode_list()
    }
}

impl FromBencode for Dict {
    fn from_bencode<S: Source>(decoder: &mut Decoder<S>) -> Result<Self, Error> {
        decoder.decode_dict()
    }
}
