//! The dynamically typed structured value.
//!
//! A [`Value`] holds exactly one of eleven kinds of data. Containers nest
//! arbitrarily, and every value can be read as every scalar kind through
//! the total coercions in [`Value::as_boolean`] and its siblings.

use std::{any::Any, fmt, ops::Index};

use chrono::{DateTime, Utc};
use tessera_types::Uuid;

mod array;
pub use array::*;

mod coerce;
pub(crate) use coerce::{format_date, format_real, parse_date, parse_real};

mod drop;

mod map;
pub use map::*;

mod uri;
pub use uri::*;

/// A point in time with nanosecond precision in UTC.
pub type Date = DateTime<Utc>;

/// The Unix epoch, which is the fallback for every date coercion.
pub fn epoch() -> Date {
    Date::default()
}

// Returned by reference for lookups that miss.
static UNKNOWN: Value = Value::Unknown;

/// The kind of data stored in a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The undefined kind.
    Unknown,
    /// A boolean.
    Boolean,
    /// A 32-bit signed integer.
    Integer,
    /// A double-precision float.
    Real,
    /// A UTF-8 string.
    String,
    /// A 128-bit identifier.
    Uuid,
    /// A timestamp.
    Date,
    /// A URI reference.
    Uri,
    /// Raw bytes.
    Binary,
    /// A string-keyed map.
    Map,
    /// An ordered sequence.
    Array,
}

impl Kind {
    /// Gets the name of the text-form element for this kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "undef",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::String => "string",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::Uri => "uri",
            Self::Binary => "binary",
            Self::Map => "map",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A self-describing structured value.
///
/// The default value is [`Value::Unknown`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// The undefined value.
    #[default]
    Unknown,
    /// A boolean.
    Boolean(bool),
    /// A 32-bit signed integer.
    Integer(i32),
    /// A double-precision float.
    Real(f64),
    /// A UTF-8 string.
    String(String),
    /// A 128-bit identifier.
    Uuid(Uuid),
    /// A timestamp.
    Date(Date),
    /// A URI reference.
    Uri(Uri),
    /// Raw bytes.
    Binary(#[cfg_attr(feature = "serde", serde(serialize_with = "serialize_base64"))] Vec<u8>),
    /// An insertion-ordered string-keyed map.
    Map(Map),
    /// An ordered sequence.
    Array(Array),
}

impl Value {
    /// Creates a boolean.
    pub fn from_boolean(v: bool) -> Self {
        Self::Boolean(v)
    }

    /// Creates an integer.
    pub fn from_integer(v: i32) -> Self {
        Self::Integer(v)
    }

    /// Creates an integer from an unsigned value, wrapping into the
    /// signed range.
    pub fn from_unsigned(v: u32) -> Self {
        Self::Integer(v as i32)
    }

    /// Creates a real.
    pub fn from_real(v: f64) -> Self {
        Self::Real(v)
    }

    /// Creates a string.
    pub fn from_string(v: impl Into<String>) -> Self {
        Self::String(v.into())
    }

    /// Creates a string, treating an absent input as the empty string.
    pub fn from_string_opt<S: Into<String>>(v: Option<S>) -> Self {
        Self::String(v.map(Into::into).unwrap_or_default())
    }

    /// Creates a UUID.
    pub fn from_uuid(v: Uuid) -> Self {
        Self::Uuid(v)
    }

    /// Creates a date.
    pub fn from_date(v: Date) -> Self {
        Self::Date(v)
    }

    /// Creates a URI.
    pub fn from_uri(v: Uri) -> Self {
        Self::Uri(v)
    }

    /// Creates binary data.
    pub fn from_binary(v: impl Into<Vec<u8>>) -> Self {
        Self::Binary(v.into())
    }

    /// Creates binary data, treating an absent input as empty.
    pub fn from_binary_opt<B: Into<Vec<u8>>>(v: Option<B>) -> Self {
        Self::Binary(v.map(Into::into).unwrap_or_default())
    }

    /// Stores a 64-bit integer as 8 little-endian bytes of binary data.
    pub fn from_i64(v: i64) -> Self {
        Self::Binary(v.to_le_bytes().to_vec())
    }

    /// Stores a 64-bit unsigned integer as 8 little-endian bytes of
    /// binary data.
    pub fn from_u64(v: u64) -> Self {
        Self::Binary(v.to_le_bytes().to_vec())
    }

    /// Converts a host value of dynamic type.
    ///
    /// Types without a structured counterpart produce
    /// [`Value::Unknown`].
    pub fn from_native(v: &dyn Any) -> Self {
        macro_rules! convert {
            ($($ty:ty => $ctor:expr),* $(,)*) => {
                $(
                    if let Some(v) = v.downcast_ref::<$ty>() {
                        return $ctor(v.clone());
                    }
                )*
            };
        }

        convert! {
            Value => |v: Value| v,
            bool => Self::from_boolean,
            i32 => Self::from_integer,
            u32 => Self::from_unsigned,
            i16 => |v: i16| Self::Integer(v.into()),
            u16 => |v: u16| Self::Integer(v.into()),
            i8 => |v: i8| Self::Integer(v.into()),
            u8 => |v: u8| Self::Integer(v.into()),
            f64 => Self::from_real,
            f32 => |v: f32| Self::Real(v.into()),
            String => Self::String,
            &'static str => Self::from_string,
            Uuid => Self::Uuid,
            Date => Self::Date,
            Uri => Self::Uri,
            Vec<u8> => Self::Binary,
            i64 => Self::from_i64,
            u64 => Self::from_u64,
            Map => Self::Map,
            Array => Self::Array,
        }

        log::debug!("No structured representation for native value, using undefined");
        Self::Unknown
    }

    /// Gets the kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Unknown => Kind::Unknown,
            Self::Boolean(..) => Kind::Boolean,
            Self::Integer(..) => Kind::Integer,
            Self::Real(..) => Kind::Real,
            Self::String(..) => Kind::String,
            Self::Uuid(..) => Kind::Uuid,
            Self::Date(..) => Kind::Date,
            Self::Uri(..) => Kind::Uri,
            Self::Binary(..) => Kind::Binary,
            Self::Map(..) => Kind::Map,
            Self::Array(..) => Kind::Array,
        }
    }

    /// Whether this is [`Value::Unknown`].
    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Gets the map inside this value, if it is one.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Gets the map inside this value mutably, if it is one.
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Gets the array inside this value, if it is one.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Gets the array inside this value mutably, if it is one.
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }
}

/// Looks up a key in a map value.
///
/// Missing keys and non-map values yield [`Value::Unknown`].
impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self {
            Self::Map(map) => &map[key],
            _ => &UNKNOWN,
        }
    }
}

/// Looks up an element of an array value.
///
/// Non-array values yield [`Value::Unknown`].
///
/// # Panics
///
/// Panics when `index` is out of range for an array.
impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match self {
            Self::Array(array) => &array[index],
            _ => &UNKNOWN,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

macro_rules! from_impl {
    ($($ty:ty => $ctor:expr),* $(,)*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    $ctor(v)
                }
            }
        )*
    };
}

from_impl! {
    bool => Value::Boolean,
    i32 => Value::Integer,
    u32 => Value::from_unsigned,
    i16 => |v: i16| Value::Integer(v.into()),
    u16 => |v: u16| Value::Integer(v.into()),
    i8 => |v: i8| Value::Integer(v.into()),
    u8 => |v: u8| Value::Integer(v.into()),
    f64 => Value::Real,
    f32 => |v: f32| Value::Real(v.into()),
    Uuid => Value::Uuid,
    Date => Value::Date,
    Uri => Value::Uri,
    Vec<u8> => Value::Binary,
    &[u8] => Value::from_binary,
    Map => Value::Map,
    Array => Value::Array,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Unknown, Into::into)
    }
}

#[cfg(feature = "serde")]
fn serialize_base64<S: serde::Serializer>(v: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    use base64::{prelude::BASE64_STANDARD, Engine};

    serializer.serialize_str(&BASE64_STANDARD.encode(v))
}
