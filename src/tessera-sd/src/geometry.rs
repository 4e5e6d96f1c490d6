//! Projections of the geometric types onto [`Value`] trees.
//!
//! Vectors, quaternions, colors and matrices project to arrays of real
//! components in a fixed order. Reading them back is total: a value of
//! the wrong kind or an array of the wrong length produces the type's
//! fallback, and every component is read through [`Value::as_real`].

use tessera_types::{Color, Matrix3, Quaternion, Uuid, Vector2, Vector3, Vector3d, Vector4};

use crate::{Array, Value};

/// Types which project onto a [`Value`].
pub trait ToStructured {
    /// Builds the structured form of `self`.
    fn to_structured(&self) -> Value;
}

/// Types which can be read back from a [`Value`].
pub trait FromStructured: Sized {
    /// Reads `value`, falling back to a fixed default when it does not
    /// have the expected shape.
    fn from_structured(value: &Value) -> Self;
}

fn components<const N: usize>(value: &Value) -> Option<[f64; N]> {
    let array = value.as_array().filter(|a| a.len() == N)?;

    let mut out = [0.0; N];
    for (out, v) in out.iter_mut().zip(array.iter()) {
        *out = v.as_real();
    }
    Some(out)
}

fn reals<I: IntoIterator<Item = f64>>(iter: I) -> Value {
    Value::Array(iter.into_iter().map(Value::Real).collect::<Array>())
}

macro_rules! impl_projection {
    ($($ty:ident($n:literal, $scalar:ty) { $($field:ident),* } => $fallback:expr),* $(,)*) => {
        $(
            impl ToStructured for $ty {
                fn to_structured(&self) -> Value {
                    reals([$(f64::from(self.$field)),*])
                }
            }

            impl FromStructured for $ty {
                fn from_structured(value: &Value) -> Self {
                    match components::<$n>(value) {
                        Some([$($field),*]) => Self { $($field: $field as $scalar),* },
                        None => $fallback,
                    }
                }
            }
        )*
    };
}

impl_projection! {
    Vector2(2, f32) { x, y } => Vector2::ZERO,
    Vector3(3, f32) { x, y, z } => Vector3::ZERO,
    Vector3d(3, f64) { x, y, z } => Vector3d::ZERO,
    Vector4(4, f32) { x, y, z, s } => Vector4::ZERO,
    Quaternion(4, f32) { x, y, z, w } => Quaternion::IDENTITY,
}

/// Projects to `[r, g, b, a]`.
impl ToStructured for Color {
    fn to_structured(&self) -> Value {
        reals([self.r, self.g, self.b, self.a].map(f64::from))
    }
}

/// Out of range channels are clamped.
impl FromStructured for Color {
    fn from_structured(value: &Value) -> Self {
        match components::<4>(value) {
            Some([r, g, b, a]) => Color::new(r as f32, g as f32, b as f32, a as f32),
            None => Color::BLACK,
        }
    }
}

/// Projects to the nine elements in row-major order.
impl ToStructured for Matrix3 {
    fn to_structured(&self) -> Value {
        reals(self.elements().map(f64::from))
    }
}

impl FromStructured for Matrix3 {
    fn from_structured(value: &Value) -> Self {
        match components::<9>(value) {
            Some(e) => Matrix3::from_elements(e.map(|v| v as f32)),
            None => Matrix3::ZERO,
        }
    }
}

impl ToStructured for Uuid {
    fn to_structured(&self) -> Value {
        Value::Uuid(*self)
    }
}

/// Strings holding a UUID are parsed.
impl FromStructured for Uuid {
    fn from_structured(value: &Value) -> Self {
        value.as_uuid()
    }
}
