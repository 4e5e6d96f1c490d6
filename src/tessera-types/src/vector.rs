use std::{
    fmt,
    num::ParseFloatError,
    ops::{Add, Div, Mul, Sub},
    str::FromStr,
};

use tessera_utils::Endian;

use crate::{
    layout::{decode_f32s, decode_f64s, encode_f32s, encode_f64s},
    FixedLayout, Matrix3, Quaternion,
};

/// Errors that occur when parsing a vector from `<x, y, z>` text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseVectorError {
    /// The text has the wrong number of components.
    #[error("expected {expected} components, found {found}")]
    Components { expected: usize, found: usize },
    /// A component is not a valid number.
    #[error(transparent)]
    Float(#[from] ParseFloatError),
}

/// A two-dimensional vector.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    /// The X coordinate.
    pub x: f32,
    /// The Y coordinate.
    pub y: f32,
}

/// A three-dimensional vector.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    /// The X coordinate.
    pub x: f32,
    /// The Y coordinate.
    pub y: f32,
    /// The Z coordinate.
    pub z: f32,
}

/// A three-dimensional vector in double precision.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3d {
    /// The X coordinate.
    pub x: f64,
    /// The Y coordinate.
    pub y: f64,
    /// The Z coordinate.
    pub z: f64,
}

/// A four-dimensional vector.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector4 {
    /// The X coordinate.
    pub x: f32,
    /// The Y coordinate.
    pub y: f32,
    /// The Z coordinate.
    pub z: f32,
    /// The fourth coordinate.
    pub s: f32,
}

macro_rules! vector_impl {
    ($($ty:ident($scalar:ty, $encode:ident, $decode:ident) { $($field:ident),* }),* $(,)*) => {
        $(
            impl $ty {
                /// The zero vector.
                pub const ZERO: Self = Self { $($field: 0.0),* };

                /// Creates a new vector from its components.
                #[inline]
                pub const fn new($($field: $scalar),*) -> Self {
                    Self { $($field),* }
                }

                /// Computes the dot product with `other`.
                #[inline]
                pub fn dot(self, other: Self) -> $scalar {
                    0.0 $(+ self.$field * other.$field)*
                }

                /// Computes the squared length of the vector.
                #[inline]
                pub fn length_squared(self) -> $scalar {
                    self.dot(self)
                }

                /// Computes the length of the vector.
                #[inline]
                pub fn length(self) -> $scalar {
                    self.length_squared().sqrt()
                }

                /// Computes the distance to `other`.
                #[inline]
                pub fn distance(self, other: Self) -> $scalar {
                    (self - other).length()
                }

                /// Scales the vector to unit length.
                ///
                /// The zero vector stays unchanged.
                pub fn normalize(self) -> Self {
                    let len = self.length();
                    if len > <$scalar>::EPSILON {
                        self / len
                    } else {
                        self
                    }
                }

                /// Whether all components are finite.
                #[inline]
                pub fn is_finite(self) -> bool {
                    true $(&& self.$field.is_finite())*
                }

                /// Parses a vector from `<x, y, ...>` text.
                pub fn parse(text: &str) -> Result<Self, ParseVectorError> {
                    let [$($field),*] = parse_components(text)?;
                    Ok(Self { $($field),* })
                }
            }

            impl Add for $ty {
                type Output = Self;

                fn add(self, rhs: Self) -> Self {
                    Self { $($field: self.$field + rhs.$field),* }
                }
            }

            impl Sub for $ty {
                type Output = Self;

                fn sub(self, rhs: Self) -> Self {
                    Self { $($field: self.$field - rhs.$field),* }
                }
            }

            impl Mul for $ty {
                type Output = Self;

                fn mul(self, rhs: Self) -> Self {
                    Self { $($field: self.$field * rhs.$field),* }
                }
            }

            impl Mul<$scalar> for $ty {
                type Output = Self;

                fn mul(self, rhs: $scalar) -> Self {
                    Self { $($field: self.$field * rhs),* }
                }
            }

            impl Mul<$ty> for $scalar {
                type Output = $ty;

                fn mul(self, rhs: $ty) -> $ty {
                    rhs * self
                }
            }

            impl Div<$scalar> for $ty {
                type Output = Self;

                fn div(self, rhs: $scalar) -> Self {
                    Self { $($field: self.$field / rhs),* }
                }
            }

            impl FromStr for $ty {
                type Err = ParseVectorError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::parse(s)
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let [first, rest @ ..] = [$(self.$field),*];
                    write!(f, "<{first}")?;
                    for v in rest {
                        write!(f, ", {v}")?;
                    }
                    f.write_str(">")
                }
            }

            impl FixedLayout for $ty {
                const WIDTH: usize = std::mem::size_of::<$scalar>() * [$(stringify!($field)),*].len();

                fn encode_as(&self, out: &mut [u8], host: Endian) {
                    $encode(&[$(self.$field),*], out, host);
                }

                fn decode_as(buf: &[u8], host: Endian) -> Self {
                    let [$($field),*] = $decode(buf, host);
                    Self { $($field),* }
                }
            }
        )*
    };
}

vector_impl! {
    Vector2(f32, encode_f32s, decode_f32s) { x, y },
    Vector3(f32, encode_f32s, decode_f32s) { x, y, z },
    Vector3d(f64, encode_f64s, decode_f64s) { x, y, z },
    Vector4(f32, encode_f32s, decode_f32s) { x, y, z, s },
}

fn parse_components<T, const N: usize>(text: &str) -> Result<[T; N], ParseVectorError>
where
    T: FromStr<Err = ParseFloatError> + Default + Copy,
{
    let text = text.trim();
    let text = text.strip_prefix('<').unwrap_or(text);
    let text = text.strip_suffix('>').unwrap_or(text);

    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(ParseVectorError::Components {
            expected: N,
            found: parts.len(),
        });
    }

    let mut out = [T::default(); N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part.parse()?;
    }
    Ok(out)
}

impl Vector3 {
    /// The unit vector along the X axis.
    pub const X_AXIS: Self = Self::new(1.0, 0.0, 0.0);
    /// The unit vector along the Y axis.
    pub const Y_AXIS: Self = Self::new(0.0, 1.0, 0.0);
    /// The unit vector along the Z axis.
    pub const Z_AXIS: Self = Self::new(0.0, 0.0, 1.0);

    /// Computes the cross product with `other`.
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - other.y * self.z,
            y: self.z * other.x - other.z * self.x,
            z: self.x * other.y - other.x * self.y,
        }
    }

    /// Computes the rotation that turns `self` into `other`.
    ///
    /// Both vectors are expected to be normalized.
    pub fn rotation_between(self, other: Self) -> Quaternion {
        let axis = self.cross(other);
        let angle = self.dot(other).clamp(-1.0, 1.0).acos();

        if axis.length_squared() <= f32::EPSILON {
            return Quaternion::IDENTITY;
        }
        Quaternion::from_axis_angle(axis, angle)
    }
}

/// Rotates the vector by a quaternion.
impl Mul<Quaternion> for Vector3 {
    type Output = Self;

    fn mul(self, rot: Quaternion) -> Self {
        let Quaternion { x, y, z, w } = rot;
        let Vector3 {
            x: vx,
            y: vy,
            z: vz,
        } = self;

        let rw = -x * vx - y * vy - z * vz;
        let rx = w * vx + y * vz - z * vy;
        let ry = w * vy + z * vx - x * vz;
        let rz = w * vz + x * vy - y * vx;

        Self {
            x: -rw * x + rx * w - ry * z + rz * y,
            y: -rw * y + ry * w - rz * x + rx * z,
            z: -rw * z + rz * w - rx * y + ry * x,
        }
    }
}

/// Transforms the vector as a row vector by a matrix.
impl Mul<Matrix3> for Vector3 {
    type Output = Self;

    fn mul(self, m: Matrix3) -> Self {
        m.transform(self)
    }
}

impl From<Vector3d> for Vector3 {
    fn from(v: Vector3d) -> Self {
        Self::new(v.x as f32, v.y as f32, v.z as f32)
    }
}

impl From<Vector3> for Vector3d {
    fn from(v: Vector3) -> Self {
        Self::new(f64::from(v.x), f64::from(v.y), f64::from(v.z))
    }
}
