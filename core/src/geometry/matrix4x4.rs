//! 4x4 Matrix

use crate::base::Float;
use std::ops::{Index, Mul};

/// Row-major 4x4 matrix. Only affine matrices (last row `0 0 0 1`) are
/// invertible here; instance placement never needs projection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix4x4 {
    pub m: [[Float; 4]; 4],
}

/// Identity matrix.
pub const IDENTITY_MATRIX: Matrix4x4 = Matrix4x4 {
    m: [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ],
};

/// Builds a matrix from its sixteen entries given row by row.
#[rustfmt::skip]
#[allow(clippy::too_many_arguments)]
pub fn matrix4x4(
    t00: Float, t01: Float, t02: Float, t03: Float,
    t10: Float, t11: Float, t12: Float, t13: Float,
    t20: Float, t21: Float, t22: Float, t23: Float,
    t30: Float, t31: Float, t32: Float, t33: Float,
) -> Matrix4x4 {
    Matrix4x4 {
        m: [
            [t00, t01, t02, t03],
            [t10, t11, t12, t13],
            [t20, t21, t22, t23],
            [t30, t31, t32, t33],
        ],
    }
}

impl Matrix4x4 {
    pub fn transpose(&self) -> Matrix4x4 {
        Matrix4x4 {
            m: std::array::from_fn(|i| std::array::from_fn(|j| self.m[j][i])),
        }
    }

    /// Determinant of the upper-left 3x3 block.
    pub fn det3(&self) -> Float {
        let a = &self.m;
        a[0][0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1])
            - a[0][1] * (a[1][0] * a[2][2] - a[1][2] * a[2][0])
            + a[0][2] * (a[1][0] * a[2][1] - a[1][1] * a[2][0])
    }

    /// Returns true if the last row is `0 0 0 1`.
    pub fn is_affine(&self) -> bool {
        self.m[3] == [0.0, 0.0, 0.0, 1.0]
    }

    /// Inverts an affine matrix. The linear block is inverted through its
    /// adjugate and the translation is carried back through that inverse.
    /// Returns `None` for singular or non-affine matrices.
    pub fn inverse(&self) -> Option<Matrix4x4> {
        if !self.is_affine() {
            return None;
        }
        let det = self.det3();
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let a = &self.m;
        // Cofactor C[j][i] placed at [i][j] gives the adjugate.
        let cofactor = |r: usize, c: usize| -> Float {
            let (r0, r1) = ((r + 1) % 3, (r + 2) % 3);
            let (c0, c1) = ((c + 1) % 3, (c + 2) % 3);
            a[r0][c0] * a[r1][c1] - a[r0][c1] * a[r1][c0]
        };
        let inv_det = 1.0 / det;
        let mut out = IDENTITY_MATRIX;
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] = cofactor(j, i) * inv_det;
            }
        }
        for i in 0..3 {
            let row = out.m[i];
            out.m[i][3] = -(0..3).map(|k| row[k] * a[k][3]).sum::<Float>();
        }

        out.m.iter().flatten().all(|v| v.is_finite()).then_some(out)
    }
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        IDENTITY_MATRIX
    }
}

impl Mul<Matrix4x4> for Matrix4x4 {
    type Output = Matrix4x4;

    /// Matrix product `self * rhs`.
    fn mul(self, rhs: Matrix4x4) -> Self::Output {
        Matrix4x4 {
            m: std::array::from_fn(|i| {
                std::array::from_fn(|j| {
                    (0..4).map(|k| self.m[i][k] * rhs.m[k][j]).sum::<Float>()
                })
            }),
        }
    }
}

impl Index<usize> for Matrix4x4 {
    type Output = [Float; 4];

    /// Row `row`; index again for the column.
    fn index(&self, row: usize) -> &Self::Output {
        &self.m[row]
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn assert_near_identity(m: &Matrix4x4) {
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    approx_eq!(f32, m[i][j], expected, epsilon = 1e-4),
                    "m[{}][{}] = {}",
                    i,
                    j,
                    m[i][j]
                );
            }
        }
    }

    #[test]
    fn identity_inverse() {
        assert_eq!(IDENTITY_MATRIX.inverse(), Some(IDENTITY_MATRIX));
    }

    #[test]
    #[rustfmt::skip]
    fn singular_matrix_has_no_inverse() {
        let m = matrix4x4(
            1.0, 2.0, 3.0, 4.0,
            2.0, 4.0, 6.0, 8.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        assert_eq!(m.det3(), 0.0);
        assert!(m.inverse().is_none());
    }

    #[test]
    #[rustfmt::skip]
    fn projective_matrix_has_no_inverse() {
        let m = matrix4x4(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
        );
        assert!(!m.is_affine());
        assert!(m.inverse().is_none());
    }

    #[test]
    #[rustfmt::skip]
    fn transpose_twice() {
        let m = matrix4x4(
             1.0,  2.0,  3.0,  4.0,
             5.0,  6.0,  7.0,  8.0,
             9.0, 10.0, 11.0, 12.0,
            13.0, 14.0, 15.0, 16.0,
        );
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose()[0][3], 13.0);
    }

    #[test]
    #[rustfmt::skip]
    fn mirror_has_negative_determinant() {
        let m = matrix4x4(
            -1.0, 0.0, 0.0, 5.0,
             0.0, 1.0, 0.0, 0.0,
             0.0, 0.0, 1.0, 0.0,
             0.0, 0.0, 0.0, 1.0,
        );
        assert_eq!(m.det3(), -1.0);
        assert_near_identity(&(m * m));
    }

    proptest! {
        #[test]
        #[rustfmt::skip]
        fn inverse_times_matrix_is_identity(
            a in 1.0..4.0f32, b in -1.0..1.0f32, c in -1.0..1.0f32,
            d in 1.0..4.0f32, e in -1.0..1.0f32, tx in -10.0..10.0f32,
            ty in -10.0..10.0f32, tz in -10.0..10.0f32,
        ) {
            // Diagonally dominant, hence invertible.
            let m = matrix4x4(
                a + 2.0, b,       c,       tx,
                b,       d + 2.0, e,       ty,
                c,       e,       a + d,   tz,
                0.0,     0.0,     0.0,     1.0,
            );
            let inv = m.inverse();
            prop_assert!(inv.is_some());
            if let Some(inv) = inv {
                assert_near_identity(&(m * inv));
                assert_near_identity(&(inv * m));
            }
        }
    }
}
