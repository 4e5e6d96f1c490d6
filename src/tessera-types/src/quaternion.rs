use std::{fmt, ops::Mul};

use tessera_utils::Endian;

use crate::{
    layout::{decode_f32s, encode_f32s},
    FixedLayout, Matrix3, Vector3,
};

// Magnitudes below this are treated as zero when normalizing.
const NORMALIZE_EPSILON: f32 = 1e-7;

/// A quaternion representing an orientation.
///
/// The full fixed layout stores X, Y, Z and W. The 12-byte compact form
/// is available through [`CompactQuaternion`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    /// The X coordinate.
    pub x: f32,
    /// The Y coordinate.
    pub y: f32,
    /// The Z coordinate.
    pub z: f32,
    /// The angle.
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// The rotation that leaves every vector unchanged.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a quaternion from its components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a unit quaternion from its vector part.
    ///
    /// W is reconstructed as `sqrt(1 - x² - y² - z²)`, or 0 when the
    /// vector part has a length of 1 or more.
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        let rest = 1.0 - (x * x + y * y + z * z);
        Self::new(x, y, z, rest.max(0.0).sqrt())
    }

    /// Creates a rotation of `angle` radians around `axis`.
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let axis = axis.normalize();
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c).normalize()
    }

    /// Computes the magnitude of the quaternion.
    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Scales the quaternion to unit magnitude.
    ///
    /// Quaternions with a near-zero magnitude become [`Quaternion::IDENTITY`].
    pub fn normalize(self) -> Self {
        let mag = self.magnitude();
        if mag > NORMALIZE_EPSILON {
            let inv = 1.0 / mag;
            Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    /// Computes the conjugate, which is the inverse of a unit quaternion.
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Converts the rotation into a 3x3 rotation matrix.
    pub fn to_matrix(self) -> Matrix3 {
        let Self { x, y, z, w } = self;
        let (xx, xy, xz, xw) = (x * x, x * y, x * z, x * w);
        let (yy, yz, yw) = (y * y, y * z, y * w);
        let (zz, zw) = (z * z, z * w);

        Matrix3 {
            i: [1.0 - 2.0 * (yy + zz), 2.0 * (xy + zw), 2.0 * (xz - yw)],
            j: [2.0 * (xy - zw), 1.0 - 2.0 * (xx + zz), 2.0 * (yz + xw)],
            k: [2.0 * (xz + yw), 2.0 * (yz - xw), 1.0 - 2.0 * (xx + yy)],
        }
    }

    /// Encodes the quaternion into its 12-byte compact form.
    pub fn to_compact_bytes(self) -> Vec<u8> {
        CompactQuaternion(self).to_bytes()
    }

    /// Decodes a quaternion from its 12-byte compact form.
    pub fn from_compact_bytes(buf: &[u8], offset: usize) -> Result<Self, crate::LayoutError> {
        CompactQuaternion::from_bytes(buf, offset).map(|c| c.0)
    }
}

impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y + self.y * rhs.w + self.z * rhs.x - self.x * rhs.z,
            z: self.w * rhs.z + self.z * rhs.w + self.x * rhs.y - self.y * rhs.x,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}, {}>", self.x, self.y, self.z, self.w)
    }
}

impl FixedLayout for Quaternion {
    const WIDTH: usize = 16;

    fn encode_as(&self, out: &mut [u8], host: Endian) {
        encode_f32s(&[self.x, self.y, self.z, self.w], out, host);
    }

    fn decode_as(buf: &[u8], host: Endian) -> Self {
        let [x, y, z, w] = decode_f32s(buf, host);
        Self { x, y, z, w }
    }
}

/// The compact fixed layout of a [`Quaternion`].
///
/// Only X, Y and Z of the normalized quaternion are stored. W is
/// reconstructed as non-negative on decode, so a rotation with a
/// negative W comes back as `(x, y, z, -w)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompactQuaternion(pub Quaternion);

impl FixedLayout for CompactQuaternion {
    const WIDTH: usize = 12;

    fn encode_as(&self, out: &mut [u8], host: Endian) {
        let q = self.0.normalize();
        encode_f32s(&[q.x, q.y, q.z], out, host);
    }

    fn decode_as(buf: &[u8], host: Endian) -> Self {
        let [x, y, z] = decode_f32s(buf, host);
        Self(Quaternion::from_xyz(x, y, z))
    }
}
