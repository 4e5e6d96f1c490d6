use std::io;

use super::{DecodeError, DecodeErrorKind};

/// A bounded cursor over an immutable byte slice which tracks the
/// current offset for error reporting.
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Builds an error located at the current position.
    #[inline]
    pub fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(self.pos, kind)
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.bytes[self.pos..].starts_with(prefix)
    }

    /// Advances past `n` bytes, which the caller has already inspected.
    #[inline]
    pub fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    /// Gets the unread bytes without advancing.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Gets the bytes between two previously observed positions.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.bytes[start..end]
    }

    /// Reads exactly `n` bytes and advances the cursor.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(self.error(DecodeErrorKind::UnexpectedEof {
                need: n - self.remaining(),
            }));
        }

        let start = self.pos;
        self.pos += n;
        Ok(&self.bytes[start..self.pos])
    }

    pub fn byte(&mut self) -> Result<u8, DecodeError> {
        self.take(1).map(|b| b[0])
    }

    /// Reads a `width`-byte field with one of the stream parsers from
    /// [`tessera_utils::binary`].
    pub fn read<T, F>(&mut self, width: usize, f: F) -> Result<T, DecodeError>
    where
        F: FnOnce(&mut &'a [u8]) -> io::Result<T>,
    {
        let at = self.pos;
        let mut field = self.take(width)?;
        f(&mut field).map_err(|_| {
            DecodeError::new(at, DecodeErrorKind::UnexpectedEof { need: width })
        })
    }
}
