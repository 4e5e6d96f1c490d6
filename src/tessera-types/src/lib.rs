//! Identifiers and geometric types with fixed little-endian byte layouts.
//!
//! Every type in this crate implements [`FixedLayout`], which maps it to
//! and from a byte sequence of constant width independent of the byte
//! order of the host machine.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod color;
pub use color::Color;

mod layout;
pub use layout::{FixedLayout, LayoutError};

mod matrix;
pub use matrix::{Euler, Matrix3};

mod quaternion;
pub use quaternion::{CompactQuaternion, Quaternion};

mod uuid;
pub use uuid::{ParseUuidError, Uuid};

mod vector;
pub use vector::{ParseVectorError, Vector2, Vector3, Vector3d, Vector4};

pub use tessera_utils::Endian;
