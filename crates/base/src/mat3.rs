use std::ops::{Add, Mul};

use crate::{Vec2, Vec3};

/// Column-major 3x3 matrix.
///
/// Used here as a homogeneous 2D affine transform: the last row stays
/// `[0, 0, 1]` for every matrix built by the constructors below, so
/// `transform_point` never needs a perspective divide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3<T> {
    pub cols: [Vec3<T>; 3],
}

impl<T> Mat3<T> {
    pub fn from_cols(c0: Vec3<T>, c1: Vec3<T>, c2: Vec3<T>) -> Self {
        Self { cols: [c0, c1, c2] }
    }
}

impl Mat3<f32> {
    pub fn identity() -> Self {
        Self::from_cols(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    pub fn from_translation(t: Vec2<f32>) -> Self {
        Self::from_cols(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(t.x, t.y, 1.0),
        )
    }

    pub fn from_scale(s: Vec2<f32>) -> Self {
        Self::from_cols(
            Vec3::new(s.x, 0.0, 0.0),
            Vec3::new(0.0, s.y, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    /// Counter-clockwise rotation by `angle` radians (y-up convention).
    pub fn from_rotation(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_cols(
            Vec3::new(cos, sin, 0.0),
            Vec3::new(-sin, cos, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    /// Apply to the point `(p.x, p.y, 1)`.
    pub fn transform_point(self, p: Vec2<f32>) -> Vec2<f32> {
        (self * Vec3::new(p.x, p.y, 1.0)).xy()
    }

    /// Apply to the direction `(v.x, v.y, 0)`, ignoring translation.
    pub fn transform_vector(self, v: Vec2<f32>) -> Vec2<f32> {
        (self * Vec3::new(v.x, v.y, 0.0)).xy()
    }

    pub fn determinant(self) -> f32 {
        let [c0, c1, c2] = self.cols;
        c0.x * (c1.y * c2.z - c1.z * c2.y) - c1.x * (c0.y * c2.z - c0.z * c2.y)
            + c2.x * (c0.y * c1.z - c0.z * c1.y)
    }

    pub fn inverse(self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        let [c0, c1, c2] = self.cols;
        // Adjugate (transpose of the cofactor matrix), written column by column.
        let adj = Self::from_cols(
            Vec3::new(
                c1.y * c2.z - c2.y * c1.z,
                c2.y * c0.z - c0.y * c2.z,
                c0.y * c1.z - c1.y * c0.z,
            ),
            Vec3::new(
                c2.x * c1.z - c1.x * c2.z,
                c0.x * c2.z - c2.x * c0.z,
                c1.x * c0.z - c0.x * c1.z,
            ),
            Vec3::new(
                c1.x * c2.y - c2.x * c1.y,
                c2.x * c0.y - c0.x * c2.y,
                c0.x * c1.y - c1.x * c0.y,
            ),
        );
        Some(adj * inv_det)
    }
}

impl<T: Mul<Output = T> + Copy> Mul<T> for Mat3<T> {
    type Output = Self;
    fn mul(self, rhs: T) -> Self {
        Self {
            cols: [self.cols[0] * rhs, self.cols[1] * rhs, self.cols[2] * rhs],
        }
    }
}

// Mat3 * Vec3
impl<T: Mul<Output = T> + Add<Output = T> + Copy> Mul<Vec3<T>> for Mat3<T> {
    type Output = Vec3<T>;
    fn mul(self, v: Vec3<T>) -> Vec3<T> {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }
}

// Mat3 * Mat3
impl<T: Mul<Output = T> + Add<Output = T> + Copy> Mul<Mat3<T>> for Mat3<T> {
    type Output = Self;
    fn mul(self, rhs: Mat3<T>) -> Self {
        Self::from_cols(self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2])
    }
}
