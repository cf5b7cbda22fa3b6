use super::{Dict, Value};
use alloc::{collections::BTreeMap, string::String, vec::Vec};

pub trait ToBencode {
    fn to_bencode(&self, encoder: &mut Encoder);
}

pub struct Encoder {
    data: Vec<u8>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    fn emit_decimal(&mut self, mut val: u64) {
        let mut digits = [0u8; 20];
        let mut start = digits.len();
        loop {
            start -= 1;
            digits[start] = b'0' + (val % 10) as u8;
            val /= 10;
            if val == 0 {
                break;
            }
        }
        self.data.extend_from_slice(&digits[start..])
    }

    pub fn emit_integer(&mut self, val: i64) {
        self.data.push(b'i');
        if val < 0 {
            self.data.push(b'-');
        }
        self.emit_decimal(val.unsigned_abs());
        self.data.push(b'e')
    }

    pub fn emit_bytes(&mut self, val: &[u8]) {
        self.emit_decimal(val.len() as u64);
        self.data.push(b':');
        self.data.extend_from_slice(val)
    }

    /// Append already encoded data verbatim.
    pub fn emit_raw_slice(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data)
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToBencode + ?Sized,
    {
        value.to_bencode(self)
    }

    pub fn emit_list<F>(&mut self, f: F)
    where
        F: FnOnce(&mut ListEncoder),
    {
        let mut l = ListEncoder::new(self);
        f(&mut l);
        l.end()
    }

    pub fn emit_slice<T>(&mut self, values: &[T])
    where
        T: ToBencode,
    {
        self.emit_list(|l| {
            for value in values {
                l.emit(value);
            }
        })
    }

    pub fn emit_dict<F>(&mut self, f: F)
    where
        F: FnOnce(&mut DictEncoder),
    {
        let mut d = DictEncoder::new(self);
        f(&mut d);
        d.end()
    }

    // Dict keys are already in byte order, so entries can be written directly
    fn emit_sorted_dict(&mut self, dict: &Dict) {
        self.data.push(b'd');
        for (key, value) in dict {
            self.emit_bytes(key);
            self.emit(value);
        }
        self.data.push(b'e')
    }
}

pub struct ListEncoder<'a> {
    encoder: &'a mut Encoder,
}

impl<'a> ListEncoder<'a> {
    fn new(encoder: &'a mut Encoder) -> Self {
        encoder.data.push(b'l');
        Self { encoder }
    }

    fn end(self) {
        self.encoder.data.push(b'e')
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToBencode + ?Sized,
    {
        self.encoder.emit(value)
    }

    pub fn emit_list<F>(&mut self, f: F)
    where
        F: FnOnce(&mut ListEncoder),
    {
        self.encoder.emit_list(f)
    }

    pub fn emit_dict<F>(&mut self, f: F)
    where
        F: FnOnce(&mut DictEncoder),
    {
        self.encoder.emit_dict(f)
    }
}

/// Collects dictionary entries and writes them in ascending key order on completion.
///
/// Emitting the same key twice replaces the earlier value.
pub struct DictEncoder<'a> {
    encoder: &'a mut Encoder,
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl<'a> DictEncoder<'a> {
    fn new(encoder: &'a mut Encoder) -> Self {
        Self {
            encoder,
            entries: BTreeMap::new(),
        }
    }

    fn end(self) {
        self.encoder.data.push(b'd');
        for (key, value) in self.entries {
            self.encoder.emit_bytes(&key);
            self.encoder.emit_raw_slice(&value);
        }
        self.encoder.data.push(b'e')
    }

    fn entry<K, F>(&mut self, key: &K, f: F)
    where
        K: AsRef<[u8]> + ?Sized,
        F: FnOnce(&mut Encoder),
    {
        let mut e = Encoder::new();
        f(&mut e);
        self.entries.insert(key.as_ref().to_vec(), e.build());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn emit<K, T>(&mut self, key: &K, value: &T)
    where
        K: AsRef<[u8]> + ?Sized,
        T: ToBencode + ?Sized,
    {
        self.entry(key, |e| e.emit(value))
    }

    pub fn emit_list<K, F>(&mut self, key: &K, f: F)
    where
        K: AsRef<[u8]> + ?Sized,
        F: FnOnce(&mut ListEncoder),
    {
        self.entry(key, |e| e.emit_list(f))
    }

    pub fn emit_dict<K, F>(&mut self, key: &K, f: F)
    where
        K: AsRef<[u8]> + ?Sized,
        F: FnOnce(&mut DictEncoder),
    {
        self.entry(key, |e| e.emit_dict(f))
    }
}

macro_rules! impl_int_to_bencode {
    ($($ty:ty),*) => {
        $(
            impl ToBencode for $ty {
                fn to_bencode(&self, encoder: &mut Encoder) {
                    encoder.emit_integer(*self as i64)
                }
            }
        )*
    };
}

impl_int_to_bencode!(i8, i16, i32, i64, isize, u16, u32);

impl ToBencode for [u8] {
    fn to_bencode(&self, encoder: &mut Encoder) {
        encoder.emit_bytes(self)
    }
}

impl ToBencode for Vec<u8> {
    fn to_bencode(&self, encoder: &mut Encoder) {
        encoder.emit_bytes(self)
    }
}

impl<const N: usize> ToBencode for [u8; N] {
    fn to_bencode(&self, encoder: &mut Encoder) {
        encoder.emit_bytes(self)
    }
}

impl ToBencode for str {
    fn to_bencode(&self, encoder: &mut Encoder) {
        encoder.emit_bytes(self.as_bytes())
    }
}

impl ToBencode for String {
    fn to_bencode(&self, encoder: &mut Encoder) {
        encoder.emit_bytes(self.as_bytes())
    }
}

impl ToBencode for Value {
    fn to_bencode(&self, encoder: &mut Encoder) {
        match self {
            Value::Integer(n) => encoder.emit_integer(*n),
            Value::Bytes(b) => encoder.emit_bytes(b),
            Value::List(l) => encoder.emit_slice(l),
            Value::Dict(d) => encoder.emit_sorted_dict(d),
        }
    }
}

impl ToBencode for [Value] {
    fn to_bencode(&self, encoder: &mut Encoder) {
        encoder.emit_slice(self)
    }
}

impl ToBencode for Vec<Value> {
    fn to_bencode(&self, encoder: &mut Encoder) {
        encoder.emit_slice(self)
    }
}

macro_rules! impl_slice_to_bencode {
    ($($ty:ty),*) => {
        $(
            impl ToBencode for [$ty] {
                fn to_bencode(&self, encoder: &mut Encoder) {
                    encoder.emit_slice(self)
                }
            }

            impl ToBencode for Vec<$ty> {
                fn to_bencode(&self, encoder: &mut Encoder) {
                    encoder.emit_slice(self)
                }
            }
        )*
    };
}

impl_slice_to_bencode!(i8, i16, i32, i64, isize, u16, u32, String, Vec<u8>);

impl<K, V> ToBencode for BTreeMap<K, V>
where
    K: AsRef<[u8]>,
    V: ToBencode,
{
    fn to_bencode(&self, encoder: &mut Encoder) {
        encoder.emit_dict(|d| {
            for (key, value) in self {
                d.emit(key, value);
            }
        })
    }
}

#[cfg(feature = "std")]
impl<K, V, H> ToBencode for std::collections::HashMap<K, V, H>
where
    K: AsRef<[u8]>,
    V: ToBencode,
{
    fn to_bencode(&self, encoder: &mut Encoder) {
        encoder.emit_dict(|d| {
            for (key, value) in self {
                d.emit(key, value);
            }
        })
    }
}

pub fn emit<T>(value: &T) -> Vec<u8>
where
    T: ToBencode + ?Sized,
{
    let mut e = Encoder::new();
    e.emit(value);
    e.build()
}

pub fn emit_list<F>(f: F) -> Vec<u8>
where
    F: FnOnce(&mut ListEncoder),
{
    let mut e = Encoder::new();
    e.emit_list(f);
    e.build()
}

pub fn emit_dict<F>(f: F) -> Vec<u8>
where
    F: FnOnce(&mut DictEncoder),
{
    let mut e = Encoder::new();
    e.emit_dict(f);
    e.build()
}

/// Encode a value of any shape, with dictionary keys in canonical order.
pub fn encode(value: &Value) -> Vec<u8> {
    emit(value)
}

pub fn encode_integer(value: i64) -> Vec<u8> {
    let mut e = Encoder::new();
    e.emit_integer(value);
    e.build()
}

pub fn encode_bytes(value: &[u8]) -> Vec<u8> {
    let mut e = Encoder::new();
    e.emit_bytes(value);
    e.build()
}

pub fn encode_list(value: &[Value]) -> Vec<u8> {
    emit(value)
}

pub fn encode_dict(value: &Dict) -> Vec<u8> {
    let mut e = Encoder::new();
    e.emit_sorted_dict(value);
    e.build()
}
