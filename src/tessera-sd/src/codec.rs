//! Binary and text encodings for [`Value`] trees.
//!
//! Both forms round-trip every tree through themselves. Decoding is
//! bounded by the input size and by a configurable recursion limit, and
//! reports malformed input as a [`DecodeError`] that carries the byte
//! offset where parsing diverged. Encoding never fails.

use std::io::{self, Write};

use crate::Value;

mod binary;

mod cursor;

mod error;
pub use error::*;

mod text;

/// Optional header that may precede the binary form.
pub const BINARY_HEADER: &[u8] = b"<? LLSD/Binary ?>\n";

/// The deepest container nesting any decoder accepts, regardless of
/// [`CodecOptions::recursion_limit`].
pub const MAX_RECURSION_LIMIT: u16 = 512;

/// Codec configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecOptions {
    /// The maximum nesting depth of containers accepted when decoding.
    ///
    /// Values above [`MAX_RECURSION_LIMIT`] are clamped to it. Ignored
    /// during encoding.
    pub recursion_limit: u16,
    /// Whether the binary encoder emits [`BINARY_HEADER`].
    ///
    /// The decoder always accepts input with or without it.
    pub binary_header: bool,
    /// Whether the text encoder puts every element on its own indented
    /// line.
    pub pretty_text: bool,
}

impl CodecOptions {
    /// Gets the nesting depth decoders actually allow.
    pub fn effective_recursion_limit(&self) -> u16 {
        self.recursion_limit.min(MAX_RECURSION_LIMIT)
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            recursion_limit: 256,
            binary_header: false,
            pretty_text: true,
        }
    }
}

/// An encoder and decoder for both wire forms of [`Value`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct Codec {
    /// The configuration in use.
    pub options: CodecOptions,
}

impl Codec {
    /// Creates a codec with the given configuration.
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    /// Writes the binary form of `value` to `writer`.
    pub fn write<W: Write>(&self, value: &Value, writer: &mut W) -> io::Result<()> {
        binary::write(value, &self.options, writer)
    }

    /// Encodes `value` into its binary form.
    pub fn encode(&self, value: &Value) -> Vec<u8> {
        let mut out = Vec::new();
        match self.write(value, &mut out) {
            Ok(()) => out,
            // Writes into a `Vec` always succeed.
            Err(e) => unreachable!("{e}"),
        }
    }

    /// Decodes a value from its binary form.
    pub fn decode(&self, data: &[u8]) -> Result<Value, DecodeError> {
        binary::decode(data, &self.options)
    }

    /// Encodes `value` into its text form.
    pub fn encode_text(&self, value: &Value) -> String {
        text::encode(value, &self.options)
    }

    /// Decodes a value from its text form.
    pub fn decode_text(&self, text: &str) -> Result<Value, DecodeError> {
        text::decode(text, &self.options)
    }
}

/// Encodes `value` into its binary form with default options.
pub fn encode(value: &Value) -> Vec<u8> {
    Codec::default().encode(value)
}

/// Decodes a value from its binary form with default options.
pub fn decode(data: &[u8]) -> Result<Value, DecodeError> {
    Codec::default().decode(data)
}

/// Encodes `value` into its text form with default options.
pub fn encode_text(value: &Value) -> String {
    Codec::default().encode_text(value)
}

/// Decodes a value from its text form with default options.
pub fn decode_text(text: &str) -> Result<Value, DecodeError> {
    Codec::default().decode_text(text)
}
