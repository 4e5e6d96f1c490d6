use std::ops::{Add, Index, IndexMut, Mul, Sub};

use tessera_utils::Endian;

use crate::{
    layout::{decode_f32s, encode_f32s},
    FixedLayout, Quaternion, Vector3,
};

// Below this cosine of the pitch angle, roll is folded into yaw.
const GIMBAL_LOCK_THRESHOLD: f64 = 0.005;

/// A set of Euler angles representing a rotation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Euler {
    /// The angle to apply around the X axis.
    pub roll: f32,
    /// The angle to apply around the Y axis.
    pub pitch: f32,
    /// The angle to apply around the Z axis.
    pub yaw: f32,
}

/// A 3x3 matrix stored in row-major order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Matrix3 {
    /// The first row of the matrix.
    pub i: [f32; 3],
    /// The second row of the matrix.
    pub j: [f32; 3],
    /// The third row of the matrix.
    pub k: [f32; 3],
}

impl Matrix3 {
    /// The matrix with all elements set to zero.
    pub const ZERO: Self = Self::from_rows([0.0; 3], [0.0; 3], [0.0; 3]);

    /// The identity matrix.
    pub const IDENTITY: Self = Self::from_rows([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);

    /// Creates a matrix from its three rows.
    #[inline]
    pub const fn from_rows(i: [f32; 3], j: [f32; 3], k: [f32; 3]) -> Self {
        Self { i, j, k }
    }

    /// Creates a matrix from nine elements in row-major order.
    pub fn from_elements(e: [f32; 9]) -> Self {
        Self::from_rows([e[0], e[1], e[2]], [e[3], e[4], e[5]], [e[6], e[7], e[8]])
    }

    /// Gets all nine elements in row-major order.
    pub fn elements(&self) -> [f32; 9] {
        let [i, j, k] = [self.i, self.j, self.k];
        [i[0], i[1], i[2], j[0], j[1], j[2], k[0], k[1], k[2]]
    }

    /// Gets the element at `row` and `col`, if both are in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.rows().get(row)?.get(col).copied()
    }

    /// Gets a row as a vector, if `index` is in bounds.
    pub fn row(&self, index: usize) -> Option<Vector3> {
        self.rows()
            .get(index)
            .map(|row| Vector3::new(row[0], row[1], row[2]))
    }

    /// Replaces a row and returns the previous one, if `index` is in
    /// bounds.
    pub fn set_row(&mut self, index: usize, row: Vector3) -> Option<Vector3> {
        let old = self.row(index)?;
        self[index] = [row.x, row.y, row.z];
        Some(old)
    }

    fn rows(&self) -> [&[f32; 3]; 3] {
        [&self.i, &self.j, &self.k]
    }

    /// Computes the sum of the diagonal elements.
    pub fn trace(&self) -> f32 {
        self.i[0] + self.j[1] + self.k[2]
    }

    /// Computes the determinant.
    pub fn determinant(&self) -> f32 {
        let Self { i, j, k } = self;
        i[0] * j[1] * k[2] + i[1] * j[2] * k[0] + i[2] * j[0] * k[1]
            - i[2] * j[1] * k[0]
            - i[0] * j[2] * k[1]
            - i[1] * j[0] * k[2]
    }

    /// Swaps rows and columns.
    pub fn transpose(&self) -> Self {
        let Self { i, j, k } = self;
        Self::from_rows([i[0], j[0], k[0]], [i[1], j[1], k[1]], [i[2], j[2], k[2]])
    }

    /// Re-orthonormalizes the rows in place using Gram-Schmidt.
    ///
    /// The first row keeps its direction and the third row is rebuilt
    /// from the cross product of the first two.
    pub fn orthogonalize(&mut self) {
        let x = Vector3::new(self.i[0], self.i[1], self.i[2]).normalize();
        let y = Vector3::new(self.j[0], self.j[1], self.j[2]);
        let y = (y - x * x.dot(y)).normalize();
        let z = x.cross(y);

        self.i = [x.x, x.y, x.z];
        self.j = [y.x, y.y, y.z];
        self.k = [z.x, z.y, z.z];
    }

    /// Decomposes a rotation matrix into Euler angles.
    pub fn euler_angles(&self) -> Euler {
        let pitch = f64::from(self.k[0].clamp(-1.0, 1.0)).asin();
        let cy = pitch.cos();

        let (roll, yaw) = if cy.abs() > GIMBAL_LOCK_THRESHOLD {
            let roll = (f64::from(-self.k[1]) / cy).atan2(f64::from(self.k[2]) / cy);
            let yaw = (f64::from(-self.j[0]) / cy).atan2(f64::from(self.i[0]) / cy);
            (roll, yaw)
        } else {
            (0.0, f64::from(self.i[1]).atan2(f64::from(self.j[1])))
        };

        Euler {
            roll: roll as f32,
            pitch: pitch as f32,
            yaw: yaw as f32,
        }
    }

    /// Transforms a row vector by this matrix.
    pub fn transform(&self, v: Vector3) -> Vector3 {
        let Self { i, j, k } = self;
        Vector3::new(
            v.x * i[0] + v.y * j[0] + v.z * k[0],
            v.x * i[1] + v.y * j[1] + v.z * k[1],
            v.x * i[2] + v.y * j[2] + v.z * k[2],
        )
    }

    fn map(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let (a, b) = (self.elements(), other.elements());
        Self::from_elements(std::array::from_fn(|n| f(a[n], b[n])))
    }
}

impl From<Quaternion> for Matrix3 {
    fn from(q: Quaternion) -> Self {
        q.to_matrix()
    }
}

impl Index<usize> for Matrix3 {
    type Output = [f32; 3];

    fn index(&self, row: usize) -> &[f32; 3] {
        match row {
            0 => &self.i,
            1 => &self.j,
            2 => &self.k,
            _ => panic!("matrix row index {row} out of range"),
        }
    }
}

impl IndexMut<usize> for Matrix3 {
    fn index_mut(&mut self, row: usize) -> &mut [f32; 3] {
        match row {
            0 => &mut self.i,
            1 => &mut self.j,
            2 => &mut self.k,
            _ => panic!("matrix row index {row} out of range"),
        }
    }
}

impl Add for Matrix3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.map(rhs, |a, b| a + b)
    }
}

impl Add<f32> for Matrix3 {
    type Output = Self;

    fn add(self, rhs: f32) -> Self {
        self.map(Self::ZERO, |a, _| a + rhs)
    }
}

impl Sub for Matrix3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.map(rhs, |a, b| a - b)
    }
}

impl Sub<f32> for Matrix3 {
    type Output = Self;

    fn sub(self, rhs: f32) -> Self {
        self.map(Self::ZERO, |a, _| a - rhs)
    }
}

impl Mul for Matrix3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = self.elements();
        let b = rhs.elements();
        Self::from_elements(std::array::from_fn(|n| {
            let (row, col) = (n / 3, n % 3);
            (0..3).map(|k| a[row * 3 + k] * b[k * 3 + col]).sum()
        }))
    }
}

impl Mul<f32> for Matrix3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.map(Self::ZERO, |a, _| a * rhs)
    }
}

impl FixedLayout for Matrix3 {
    const WIDTH: usize = 36;

    fn encode_as(&self, out: &mut [u8], host: Endian) {
        encode_f32s(&self.elements(), out, host);
    }

    fn decode_as(buf: &[u8], host: Endian) -> Self {
        Self::from_elements(decode_f32s(buf, host))
    }
}
