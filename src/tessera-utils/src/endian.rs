//! Host byte order handling for fixed-width layouts.
//!
//! Fixed layouts are always little-endian on the wire. Encoders write
//! every field in the byte order of the host and then bring the buffer
//! into wire order through [`to_wire`]. Decoders do the inverse with
//! [`from_wire`] before reading fields back in host order.
//!
//! The host is an explicit [`Endian`] value rather than a compile-time
//! constant so that both paths can be exercised on any machine.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// The byte order of a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

macro_rules! endian_access_impl {
    ($($read:ident / $write:ident -> $ty:ty),* $(,)*) => {
        $(
            #[doc = concat!("Reads a [`", stringify!($ty), "`] from `buf` in this byte order.")]
            #[inline]
            pub fn $read(self, buf: &[u8]) -> $ty {
                match self {
                    Self::Little => LittleEndian::$read(buf),
                    Self::Big => BigEndian::$read(buf),
                }
            }

            #[doc = concat!("Writes a [`", stringify!($ty), "`] into `buf` in this byte order.")]
            #[inline]
            pub fn $write(self, buf: &mut [u8], v: $ty) {
                match self {
                    Self::Little => LittleEndian::$write(buf, v),
                    Self::Big => BigEndian::$write(buf, v),
                }
            }
        )*
    };
}

impl Endian {
    /// The byte order of the machine this code was compiled for.
    pub const HOST: Self = if cfg!(target_endian = "big") {
        Self::Big
    } else {
        Self::Little
    };

    /// Whether this byte order matches the wire order.
    #[inline]
    pub const fn is_wire_order(self) -> bool {
        matches!(self, Self::Little)
    }

    endian_access_impl! {
        read_u32 / write_u32 -> u32,
        read_f32 / write_f32 -> f32,
        read_f64 / write_f64 -> f64,
    }
}

/// Reverses the bytes of every `lane`-sized group in `buf`.
///
/// Trailing bytes that do not fill a whole lane are left alone.
pub fn swap_lanes(buf: &mut [u8], lane: usize) {
    if lane < 2 {
        return;
    }

    buf.chunks_exact_mut(lane).for_each(<[u8]>::reverse);
}

/// Converts a buffer of `lane`-sized fields written on `host` into
/// wire order.
#[inline]
pub fn to_wire(buf: &mut [u8], lane: usize, host: Endian) {
    if !host.is_wire_order() {
        swap_lanes(buf, lane);
    }
}

/// Converts a buffer of `lane`-sized fields in wire order into the
/// byte order of `host`.
#[inline]
pub fn from_wire(buf: &mut [u8], lane: usize, host: Endian) {
    to_wire(buf, lane, host)
}
