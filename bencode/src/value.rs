use alloc::{collections::BTreeMap, string::String, vec::Vec};

/// A bencode dictionary.
///
/// Keys are raw byte strings and are kept in ascending byte order, which is
/// the order the canonical encoding requires.
pub type Dict = BTreeMap<Vec<u8>, Value>;

/// A decoded bencode value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Integer(i64),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Dict(Dict),
}

/// The four shapes a bencode value can take, as identified by its leading tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Integer,
    Bytes,
    List,
    Dict,
}

impl Kind {
    /// Identify the shape introduced by `tag`, if any.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'0'..=b'9' => Some(Self::Bytes),
            b'i' => Some(Self::Integer),
            b'l' => Some(Self::List),
            b'd' => Some(Self::Dict),
            _ => None,
        }
    }
}

impl core::fmt::Display for Kind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Integer => "integer",
            Self::Bytes => "byte string",
            Self::List => "list",
            Self::Dict => "dictionary",
        })
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Integer(_) => Kind::Integer,
            Self::Bytes(_) => Kind::Bytes,
            Self::List(_) => Kind::List,
            Self::Dict(_) => Kind::Dict,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the byte string as text, if it is one and it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| core::str::from_utf8(b).ok())
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Look up `key` if this value is a dictionary.
    pub fn get<K>(&self, key: &K) -> Option<&Value>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        self.as_dict().and_then(|d| d.get(key.as_ref()))
    }
}

macro_rules! impl_int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Integer(value.into())
                }
            }
        )*
    };
}

impl_int_from!(i8, i16, i32, i64, u8, u16, u32);

impl TryFrom<u64> for Value {
    type Error = super::Error;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map(Self::Integer)
            .map_err(|_| super::Error::IntegerOverflow)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(value: &[u8; N]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Bytes(value.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Bytes(value.into_bytes())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<Dict> for Value {
    fn from(value: Dict) -> Self {
        Self::Dict(value)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

impl<K> FromIterator<(K, Value)> for Value
where
    K: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::Dict(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
