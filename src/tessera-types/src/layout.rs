use tessera_utils::endian::{self, Endian};

/// Errors produced when decoding a fixed layout from a buffer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The buffer does not hold enough bytes past the requested offset.
    #[error("need {need} bytes at offset {offset}, but only {available} are available")]
    Truncated {
        /// The requested offset into the buffer.
        offset: usize,
        /// The width of the layout being decoded.
        need: usize,
        /// The number of bytes present past `offset`.
        available: usize,
    },
}

/// A type with a constant-width, little-endian byte representation.
///
/// Implementors provide [`FixedLayout::encode_as`] and
/// [`FixedLayout::decode_as`] for an explicit host byte order; the
/// remaining methods assume [`Endian::HOST`].
pub trait FixedLayout: Sized {
    /// The number of bytes in the encoded form.
    const WIDTH: usize;

    /// Encodes `self` into the first [`Self::WIDTH`] bytes of `out` as
    /// a machine with byte order `host` would.
    ///
    /// # Panics
    ///
    /// Panics when `out` is shorter than [`Self::WIDTH`].
    fn encode_as(&self, out: &mut [u8], host: Endian);

    /// Decodes a value from the first [`Self::WIDTH`] bytes of `buf` as
    /// a machine with byte order `host` would.
    ///
    /// # Panics
    ///
    /// Panics when `buf` is shorter than [`Self::WIDTH`].
    fn decode_as(buf: &[u8], host: Endian) -> Self;

    /// Encodes `self` into a freshly allocated buffer.
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes_as(Endian::HOST)
    }

    /// Encodes `self` into a freshly allocated buffer on `host`.
    fn to_bytes_as(&self, host: Endian) -> Vec<u8> {
        let mut out = vec![0; Self::WIDTH];
        self.encode_as(&mut out, host);
        out
    }

    /// Encodes `self` into `out` starting at `offset`.
    fn write_to(&self, out: &mut [u8], offset: usize) -> Result<(), LayoutError> {
        let len = out.len();
        let dest = window_mut(out, offset, Self::WIDTH, len)?;
        self.encode_as(dest, Endian::HOST);
        Ok(())
    }

    /// Decodes a value from `buf` starting at `offset`.
    fn from_bytes(buf: &[u8], offset: usize) -> Result<Self, LayoutError> {
        Self::from_bytes_as(buf, offset, Endian::HOST)
    }

    /// Decodes a value from `buf` starting at `offset` on `host`.
    fn from_bytes_as(buf: &[u8], offset: usize, host: Endian) -> Result<Self, LayoutError> {
        let chunk = window(buf, offset, Self::WIDTH)?;
        Ok(Self::decode_as(chunk, host))
    }
}

fn truncated(offset: usize, need: usize, len: usize) -> LayoutError {
    LayoutError::Truncated {
        offset,
        need,
        available: len.saturating_sub(offset),
    }
}

fn window(buf: &[u8], offset: usize, need: usize) -> Result<&[u8], LayoutError> {
    offset
        .checked_add(need)
        .and_then(|end| buf.get(offset..end))
        .ok_or_else(|| truncated(offset, need, buf.len()))
}

fn window_mut(
    buf: &mut [u8],
    offset: usize,
    need: usize,
    len: usize,
) -> Result<&mut [u8], LayoutError> {
    offset
        .checked_add(need)
        .and_then(|end| buf.get_mut(offset..end))
        .ok_or_else(|| truncated(offset, need, len))
}

// Large enough for the widest float layout (a 3x3 matrix).
const SCRATCH: usize = 64;

pub(crate) fn encode_f32s(values: &[f32], out: &mut [u8], host: Endian) {
    let out = &mut out[..values.len() * 4];
    for (chunk, &v) in out.chunks_exact_mut(4).zip(values) {
        host.write_f32(chunk, v);
    }
    endian::to_wire(out, 4, host);
}

pub(crate) fn decode_f32s<const N: usize>(buf: &[u8], host: Endian) -> [f32; N] {
    let mut scratch = [0; SCRATCH];
    let scratch = &mut scratch[..N * 4];
    scratch.copy_from_slice(&buf[..N * 4]);
    endian::from_wire(scratch, 4, host);

    std::array::from_fn(|i| host.read_f32(&scratch[i * 4..]))
}

pub(crate) fn encode_f64s(values: &[f64], out: &mut [u8], host: Endian) {
    let out = &mut out[..values.len() * 8];
    for (chunk, &v) in out.chunks_exact_mut(8).zip(values) {
        host.write_f64(chunk, v);
    }
    endian::to_wire(out, 8, host);
}

pub(crate) fn decode_f64s<const N: usize>(buf: &[u8], host: Endian) -> [f64; N] {
    let mut scratch = [0; SCRATCH];
    let scratch = &mut scratch[..N * 8];
    scratch.copy_from_slice(&buf[..N * 8]);
    endian::from_wire(scratch, 8, host);

    std::array::from_fn(|i| host.read_f64(&scratch[i * 8..]))
}
