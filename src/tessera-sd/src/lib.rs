//! Self-describing structured data.
//!
//! A [`Value`] is a dynamically typed tree of scalars, maps and arrays
//! exchanged between the client and the services of a virtual world.
//! Trees travel in either a compact binary form or an XML text form,
//! both provided by the [`codec`] module.
//!
//! Consumers pull typed data back out of a decoded tree through total
//! coercions which never fail: asking for the wrong kind yields a zero
//! value instead of an error.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub use codec::{decode, decode_text, encode, encode_text, Codec, CodecOptions, DecodeError};

pub mod geometry;
pub use geometry::{FromStructured, ToStructured};

pub mod value;
pub use value::{epoch, Array, Date, IndexError, Kind, Map, Uri, Value};

pub use tessera_types as types;
