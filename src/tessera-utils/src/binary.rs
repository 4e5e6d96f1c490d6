//! Utilities for reading and writing little-endian binary data.

use std::{
    io::{self, Read, Write},
    mem,
};

/// Parses an unsigned byte off the data stream.
#[inline]
pub fn uint8<R: Read>(data: &mut R) -> io::Result<u8> {
    let mut v = [0; 1];
    data.read_exact(&mut v)?;
    Ok(v[0])
}

/// Writes an unsigned byte to the data stream.
#[inline]
pub fn write_uint8<W: Write>(out: &mut W, v: u8) -> io::Result<()> {
    out.write_all(&[v])
}

macro_rules! num_read_impl {
    ($($fn:ident() -> $ty:ty),* $(,)*) => {
        $(
            #[doc = concat!("Parses a [`", stringify!($ty), "`] value off the data stream.")]
            #[inline]
            pub fn $fn<R: io::Read>(data: &mut R) -> io::Result<$ty> {
                let mut v = [0; mem::size_of::<$ty>()];
                data.read_exact(&mut v)?;
                Ok(<$ty>::from_le_bytes(v))
            }
        )*
    };
}

macro_rules! num_write_impl {
    ($($fn:ident($ty:ty)),* $(,)*) => {
        $(
            #[doc = concat!("Writes a [`", stringify!($ty), "`] value to the data stream.")]
            #[inline]
            pub fn $fn<W: Write>(out: &mut W, v: $ty) -> io::Result<()> {
                out.write_all(&v.to_le_bytes())
            }
        )*
    };
}

num_read_impl! {
    uint32() -> u32,
    int32() -> i32,
    int64() -> i64,
    float64() -> f64,
}

num_write_impl! {
    write_uint32(u32),
    write_int32(i32),
    write_int64(i64),
    write_float64(f64),
}

/// Writes a `u32` length prefix followed by the raw bytes.
#[inline]
pub fn write_bytes<W: Write>(out: &mut W, v: &[u8]) -> io::Result<()> {
    write_uint32(out, v.len() as u32)?;
    out.write_all(v)
}

/// Writes a length-prefixed string to the output stream.
#[inline]
pub fn write_str<W: Write>(out: &mut W, v: &str) -> io::Result<()> {
    write_bytes(out, v.as_bytes())
}
