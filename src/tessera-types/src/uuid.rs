use std::{fmt, ops::BitXor, str::FromStr};

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use md5::{Digest, Md5};
use tessera_utils::Endian;

use crate::FixedLayout;

/// Errors that occur when parsing a [`Uuid`] from text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseUuidError {
    /// The text does not hold 32 hex digits in a known grouping.
    #[error("invalid UUID length {0}")]
    Length(usize),
    /// A character other than a hex digit was found.
    #[error("invalid character {0:?} in UUID")]
    Character(char),
    /// The hyphenated form has separators in the wrong places.
    #[error("misplaced group separator in UUID")]
    Separator,
}

/// A 128-bit universally unique identifier.
///
/// The bytes are kept in the order of the canonical text form, which is
/// also the order used in the fixed layout. GUID-style memory layouts,
/// where the first three fields are little-endian, are available through
/// [`Uuid::from_guid_bytes`] and [`Uuid::to_guid_bytes`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// The all-zero identifier.
    pub const ZERO: Self = Self([0; 16]);

    /// Creates an identifier from bytes in canonical order.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Gets the bytes of the identifier in canonical order.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates an identifier from its four groups.
    pub fn from_fields(d1: u32, d2: u16, d3: u16, d4: [u8; 8]) -> Self {
        let mut bytes = [0; 16];
        BigEndian::write_u32(&mut bytes[0..4], d1);
        BigEndian::write_u16(&mut bytes[4..6], d2);
        BigEndian::write_u16(&mut bytes[6..8], d3);
        bytes[8..].copy_from_slice(&d4);
        Self(bytes)
    }

    /// Splits the identifier into its four groups.
    pub fn fields(&self) -> (u32, u16, u16, [u8; 8]) {
        let mut d4 = [0; 8];
        d4.copy_from_slice(&self.0[8..]);
        (
            BigEndian::read_u32(&self.0[0..4]),
            BigEndian::read_u16(&self.0[4..6]),
            BigEndian::read_u16(&self.0[6..8]),
            d4,
        )
    }

    /// Creates an identifier from a GUID memory layout.
    pub fn from_guid_bytes(bytes: [u8; 16]) -> Self {
        let mut d4 = [0; 8];
        d4.copy_from_slice(&bytes[8..]);
        Self::from_fields(
            LittleEndian::read_u32(&bytes[0..4]),
            LittleEndian::read_u16(&bytes[4..6]),
            LittleEndian::read_u16(&bytes[6..8]),
            d4,
        )
    }

    /// Gets the identifier in GUID memory layout.
    pub fn to_guid_bytes(&self) -> [u8; 16] {
        let (d1, d2, d3, d4) = self.fields();
        let mut bytes = [0; 16];
        LittleEndian::write_u32(&mut bytes[0..4], d1);
        LittleEndian::write_u16(&mut bytes[4..6], d2);
        LittleEndian::write_u16(&mut bytes[6..8], d3);
        bytes[8..].copy_from_slice(&d4);
        bytes
    }

    /// Parses an identifier from text.
    ///
    /// Accepts the hyphenated form and the plain 32-digit form, each
    /// optionally wrapped in braces or parentheses. Hex digits are
    /// case-insensitive.
    pub fn parse(text: &str) -> Result<Self, ParseUuidError> {
        let text = text.trim();
        let text = strip_wrapping(text, '{', '}')
            .or_else(|| strip_wrapping(text, '(', ')'))
            .unwrap_or(text);

        let digits: Vec<u8> = match text.len() {
            32 => text.bytes().collect(),
            36 => {
                for (i, c) in text.char_indices() {
                    let separator = matches!(i, 8 | 13 | 18 | 23);
                    if separator != (c == '-') {
                        return Err(ParseUuidError::Separator);
                    }
                }
                text.bytes().filter(|&b| b != b'-').collect()
            }
            len => return Err(ParseUuidError::Length(len)),
        };

        let mut bytes = [0; 16];
        for (byte, pair) in bytes.iter_mut().zip(digits.chunks_exact(2)) {
            *byte = (hex_digit(pair[0])? << 4) | hex_digit(pair[1])?;
        }

        Ok(Self(bytes))
    }

    /// Generates a new random (version 4) identifier.
    pub fn random() -> Self {
        let mut bytes: [u8; 16] = rand::random();
        bytes[6] = (bytes[6] & 0x0F) | 0x40;
        bytes[8] = (bytes[8] & 0x3F) | 0x80;
        Self(bytes)
    }

    /// Derives an identifier from the MD5 digest of both inputs.
    ///
    /// The result depends on argument order.
    pub fn combine(first: Self, second: Self) -> Self {
        let mut hasher = Md5::new();
        hasher.update(first.0);
        hasher.update(second.0);

        let mut bytes = [0; 16];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    /// Computes a 32-bit checksum as the wrapping sum of the four
    /// little-endian words of the identifier.
    pub fn crc(&self) -> u32 {
        self.0
            .chunks_exact(4)
            .map(LittleEndian::read_u32)
            .fold(0u32, u32::wrapping_add)
    }

    /// Whether this is [`Uuid::ZERO`].
    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

fn strip_wrapping(text: &str, open: char, close: char) -> Option<&str> {
    text.strip_prefix(open)?.strip_suffix(close)
}

fn hex_digit(b: u8) -> Result<u8, ParseUuidError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(ParseUuidError::Character(char::from(b))),
    }
}

impl FromStr for Uuid {
    type Err = ParseUuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uuid({self})")
    }
}

impl BitXor for Uuid {
    type Output = Self;

    fn bitxor(mut self, rhs: Self) -> Self {
        self.0.iter_mut().zip(rhs.0).for_each(|(a, b)| *a ^= b);
        self
    }
}

// Groups are assembled with explicit shifts, so the host is irrelevant.
impl FixedLayout for Uuid {
    const WIDTH: usize = 16;

    fn encode_as(&self, out: &mut [u8], _host: Endian) {
        let (d1, d2, d3, d4) = self.fields();
        BigEndian::write_u32(&mut out[0..4], d1);
        BigEndian::write_u16(&mut out[4..6], d2);
        BigEndian::write_u16(&mut out[6..8], d3);
        out[8..16].copy_from_slice(&d4);
    }

    fn decode_as(buf: &[u8], _host: Endian) -> Self {
        let mut d4 = [0; 8];
        d4.copy_from_slice(&buf[8..16]);
        Self::from_fields(
            BigEndian::read_u32(&buf[0..4]),
            BigEndian::read_u16(&buf[4..6]),
            BigEndian::read_u16(&buf[6..8]),
            d4,
        )
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Uuid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Uuid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
