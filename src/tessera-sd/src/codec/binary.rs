//! The binary form.
//!
//! Every value starts with a one-byte tag. Numbers are little-endian;
//! strings, URIs and binary data carry a `u32` length prefix; containers
//! carry a `u32` count prefix and a closing terminator byte.

use std::io::{self, Write};

use chrono::DateTime;
use tessera_types::{Endian, FixedLayout, Uuid};
use tessera_utils::binary;

use super::{cursor::Cursor, CodecOptions, DecodeError, DecodeErrorKind, BINARY_HEADER};
use crate::value::*;

mod tag {
    pub const UNKNOWN: u8 = b'!';
    pub const TRUE: u8 = b'1';
    pub const FALSE: u8 = b'0';
    pub const INTEGER: u8 = b'i';
    pub const REAL: u8 = b'r';
    pub const STRING: u8 = b's';
    pub const UUID: u8 = b'u';
    pub const DATE: u8 = b'd';
    pub const URI: u8 = b'l';
    pub const BINARY: u8 = b'b';
    pub const MAP_START: u8 = b'{';
    pub const MAP_KEY: u8 = b'k';
    pub const MAP_END: u8 = b'}';
    pub const ARRAY_START: u8 = b'[';
    pub const ARRAY_END: u8 = b']';
}

// The smallest map entry is a key marker, an empty key and a bare tag.
const MIN_ENTRY_SIZE: usize = 6;

enum Step<'v> {
    Value(&'v Value),
    Key(&'v str),
    End(u8),
}

pub fn write<W: Write>(value: &Value, options: &CodecOptions, out: &mut W) -> io::Result<()> {
    if options.binary_header {
        out.write_all(BINARY_HEADER)?;
    }

    // Containers are expanded onto an explicit stack so that encoding
    // depth is not bounded by the call stack.
    let mut stack = vec![Step::Value(value)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Key(key) => {
                binary::write_uint8(out, tag::MAP_KEY)?;
                binary::write_str(out, key)?;
            }
            Step::End(terminator) => binary::write_uint8(out, terminator)?,

            Step::Value(Value::Map(map)) => {
                binary::write_uint8(out, tag::MAP_START)?;
                binary::write_uint32(out, map.len() as u32)?;

                stack.push(Step::End(tag::MAP_END));
                for (key, value) in map.iter().rev() {
                    stack.push(Step::Value(value));
                    stack.push(Step::Key(key));
                }
            }
            Step::Value(Value::Array(array)) => {
                binary::write_uint8(out, tag::ARRAY_START)?;
                binary::write_uint32(out, array.len() as u32)?;

                stack.push(Step::End(tag::ARRAY_END));
                stack.extend(array.iter().rev().map(Step::Value));
            }
            Step::Value(scalar) => write_scalar(out, scalar)?,
        }
    }

    Ok(())
}

fn write_scalar<W: Write>(out: &mut W, value: &Value) -> io::Result<()> {
    match value {
        Value::Unknown => binary::write_uint8(out, tag::UNKNOWN),
        Value::Boolean(true) => binary::write_uint8(out, tag::TRUE),
        Value::Boolean(false) => binary::write_uint8(out, tag::FALSE),
        Value::Integer(v) => {
            binary::write_uint8(out, tag::INTEGER)?;
            binary::write_int32(out, *v)
        }
        Value::Real(v) => {
            binary::write_uint8(out, tag::REAL)?;
            binary::write_float64(out, *v)
        }
        Value::String(v) => {
            binary::write_uint8(out, tag::STRING)?;
            binary::write_str(out, v)
        }
        Value::Uuid(v) => {
            binary::write_uint8(out, tag::UUID)?;
            out.write_all(&v.to_bytes())
        }
        Value::Date(v) => {
            binary::write_uint8(out, tag::DATE)?;
            binary::write_int64(out, v.timestamp())?;
            binary::write_uint32(out, v.timestamp_subsec_nanos())
        }
        Value::Uri(v) => {
            binary::write_uint8(out, tag::URI)?;
            binary::write_str(out, v.as_str())
        }
        Value::Binary(v) => {
            binary::write_uint8(out, tag::BINARY)?;
            binary::write_bytes(out, v)
        }
        Value::Map(..) | Value::Array(..) => unreachable!("containers are written by the caller"),
    }
}

pub fn decode(data: &[u8], options: &CodecOptions) -> Result<Value, DecodeError> {
    log::debug!("Decoding {} bytes of binary data with {options:?}", data.len());

    let mut cursor = Cursor::new(data);
    if cursor.starts_with(BINARY_HEADER) {
        cursor.skip(BINARY_HEADER.len());
    }

    let mut de = Decoder {
        cursor,
        depth: options.effective_recursion_limit(),
    };
    let value = de.value()?;

    if !de.cursor.is_empty() {
        return Err(de.cursor.error(DecodeErrorKind::TrailingBytes));
    }

    log::debug!("Decoded binary {} value", value.kind());
    Ok(value)
}

struct Decoder<'a> {
    cursor: Cursor<'a>,
    depth: u16,
}

impl<'a> Decoder<'a> {
    fn with_recursion_limit<F, T>(&mut self, f: F) -> Result<T, DecodeError>
    where
        F: FnOnce(&mut Self) -> Result<T, DecodeError>,
    {
        if self.depth == 0 {
            return Err(self.cursor.error(DecodeErrorKind::Recursion));
        }

        self.depth -= 1;
        let res = f(self);
        self.depth += 1;

        res
    }

    fn value(&mut self) -> Result<Value, DecodeError> {
        let at = self.cursor.pos();
        let value = match self.cursor.byte()? {
            tag::UNKNOWN => Value::Unknown,
            tag::TRUE => Value::Boolean(true),
            tag::FALSE => Value::Boolean(false),
            tag::INTEGER => Value::Integer(self.cursor.read(4, binary::int32)?),
            tag::REAL => Value::Real(self.cursor.read(8, binary::float64)?),
            tag::STRING => Value::String(self.string()?),
            tag::UUID => Value::Uuid(Uuid::decode_as(self.cursor.take(16)?, Endian::HOST)),
            tag::DATE => Value::Date(self.date()?),
            tag::URI => Value::Uri(Uri::parse(&self.string()?)),
            tag::BINARY => Value::Binary(self.bytes()?.to_vec()),
            tag::MAP_START => Value::Map(self.with_recursion_limit(Self::map)?),
            tag::ARRAY_START => Value::Array(self.with_recursion_limit(Self::array)?),
            other => return Err(DecodeError::new(at, DecodeErrorKind::UnknownTag(other))),
        };

        Ok(value)
    }

    fn bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.cursor.read(4, binary::uint32)?;
        self.cursor.take(len as usize)
    }

    fn string(&mut self) -> Result<String, DecodeError> {
        let at = self.cursor.pos() + 4;
        let raw = self.bytes()?;

        std::str::from_utf8(raw).map(str::to_owned).map_err(|e| {
            DecodeError::new(at + e.valid_up_to(), DecodeErrorKind::InvalidUtf8)
        })
    }

    fn date(&mut self) -> Result<Date, DecodeError> {
        let at = self.cursor.pos();
        let secs = self.cursor.read(8, binary::int64)?;
        let nanos = self.cursor.read(4, binary::uint32)?;

        DateTime::from_timestamp(secs, nanos).ok_or_else(|| {
            DecodeError::new(
                at,
                DecodeErrorKind::InvalidLiteral {
                    kind: Kind::Date,
                    text: format!("{secs}s {nanos}ns"),
                },
            )
        })
    }

    fn terminator(&mut self, expected: u8) -> Result<(), DecodeError> {
        let at = self.cursor.pos();
        match self.cursor.byte()? {
            found if found == expected => Ok(()),
            found => Err(DecodeError::new(
                at,
                DecodeErrorKind::MissingTerminator { expected, found },
            )),
        }
    }

    fn map(&mut self) -> Result<Map, DecodeError> {
        let count = self.cursor.read(4, binary::uint32)? as usize;
        log::trace!("Decoding map of {count} entries at offset {}", self.cursor.pos());

        let mut map = Map::with_capacity(count.min(self.cursor.remaining() / MIN_ENTRY_SIZE));
        for _ in 0..count {
            let at = self.cursor.pos();
            let marker = self.cursor.byte()?;
            if marker != tag::MAP_KEY {
                return Err(DecodeError::new(at, DecodeErrorKind::ExpectedKey(marker)));
            }

            let key = self.string()?;
            let value = self.value()?;
            if let Some(old) = map.insert(key.as_str(), value) {
                log::debug!(
                    "Duplicate map key {key:?} at offset {at}, replacing {} value",
                    old.kind()
                );
            }
        }

        self.terminator(tag::MAP_END)?;
        Ok(map)
    }

    fn array(&mut self) -> Result<Array, DecodeError> {
        let count = self.cursor.read(4, binary::uint32)? as usize;
        log::trace!("Decoding array of {count} elements at offset {}", self.cursor.pos());

        let mut array = Array::with_capacity(count.min(self.cursor.remaining()));
        for _ in 0..count {
            array.push(self.value()?);
        }

        self.terminator(tag::ARRAY_END)?;
        Ok(array)
    }
}
