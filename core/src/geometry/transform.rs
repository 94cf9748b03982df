//! Transformations

use super::{
    matrix4x4, normal3, point3, vector3, Bounds3f, Matrix4x4, Normal3f, Point3f, Ray, Union,
    Vector3f,
};
use crate::base::Float;
use crate::error::TracerError;
use std::ops::Mul;

/// An affine transformation for mapping points, vectors and normals. The
/// inverse is kept alongside so that normals (inverse-transpose) and rays
/// entering local space never need a fresh inversion.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Transform {
    /// The transformation matrix.
    pub m: Matrix4x4,

    /// The inverse transformation matrix.
    pub m_inv: Matrix4x4,
}

/// Create a transformation representing a translation.
///
/// * `delta` -  Translation.
#[rustfmt::skip]
pub fn translate(delta: &Vector3f) -> Transform {
    Transform {
        m: matrix4x4(
            1.0, 0.0, 0.0, delta.x,
            0.0, 1.0, 0.0, delta.y,
            0.0, 0.0, 1.0, delta.z,
            0.0, 0.0, 0.0, 1.0,
        ),
        m_inv: matrix4x4(
            1.0, 0.0, 0.0, -delta.x,
            0.0, 1.0, 0.0, -delta.y,
            0.0, 0.0, 1.0, -delta.z,
            0.0, 0.0, 0.0,  1.0,
        ),
    }
}

/// Create a transformation representing a scale. Zero factors are rejected
/// since the result could not be inverted.
///
/// * `x` -  Scaling factor in x-axis.
/// * `y` -  Scaling factor in y-axis.
/// * `z` -  Scaling factor in z-axis.
#[rustfmt::skip]
pub fn scale(x: Float, y: Float, z: Float) -> Result<Transform, TracerError> {
    if x == 0.0 || y == 0.0 || z == 0.0 {
        return Err(TracerError::SingularTransform);
    }
    Ok(Transform {
        m: matrix4x4(
            x,   0.0, 0.0, 0.0,
            0.0, y,   0.0, 0.0,
            0.0, 0.0, z,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ),
        m_inv: matrix4x4(
            1.0 / x, 0.0,     0.0,     0.0,
            0.0,     1.0 / y, 0.0,     0.0,
            0.0,     0.0,     1.0 / z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        ),
    })
}

/// Create a transformation representing rotation about the x-axis.
///
/// * `theta` -  Angle in degrees.
#[rustfmt::skip]
pub fn rotate_x(theta: Float) -> Transform {
    let (sin_theta, cos_theta) = theta.to_radians().sin_cos();
    let m = matrix4x4(
        1.0, 0.0,        0.0,       0.0,
        0.0, cos_theta, -sin_theta, 0.0,
        0.0, sin_theta,  cos_theta, 0.0,
        0.0, 0.0,        0.0,       1.0,
    );
    Transform { m, m_inv: m.transpose() }
}

/// Create a transformation representing rotation about the y-axis.
///
/// * `theta` -  Angle in degrees.
#[rustfmt::skip]
pub fn rotate_y(theta: Float) -> Transform {
    let (sin_theta, cos_theta) = theta.to_radians().sin_cos();
    let m = matrix4x4(
         cos_theta, 0.0, sin_theta, 0.0,
         0.0,       1.0, 0.0,       0.0,
        -sin_theta, 0.0, cos_theta, 0.0,
         0.0,       0.0, 0.0,       1.0,
    );
    Transform { m, m_inv: m.transpose() }
}

/// Create a transformation representing rotation about the z-axis.
///
/// * `theta` -  Angle in degrees.
#[rustfmt::skip]
pub fn rotate_z(theta: Float) -> Transform {
    let (sin_theta, cos_theta) = theta.to_radians().sin_cos();
    let m = matrix4x4(
        cos_theta, -sin_theta, 0.0, 0.0,
        sin_theta,  cos_theta, 0.0, 0.0,
        0.0,        0.0,       1.0, 0.0,
        0.0,        0.0,       0.0, 1.0,
    );
    Transform { m, m_inv: m.transpose() }
}

impl Transform {
    /// Create a transformation from an affine matrix. Singular and
    /// projective matrices are rejected.
    ///
    /// * `m` - The matrix.
    pub fn new(m: Matrix4x4) -> Result<Self, TracerError> {
        m.inverse()
            .map(|m_inv| Self { m, m_inv })
            .ok_or(TracerError::SingularTransform)
    }

    /// Returns the inverse transformation.
    pub fn inverse(&self) -> Transform {
        Transform {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    /// Returns true if the transformation mirrors geometry, flipping the
    /// winding of transformed triangles.
    pub fn swaps_handedness(&self) -> bool {
        self.m.det3() < 0.0
    }

    /// Applies transformation to a given point.
    ///
    /// * `p` - The point.
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let m = &self.m;
        let xp = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let yp = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let zp = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let wp = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];

        debug_assert!(wp != 0.0, "Transform::transform_point: wp is zero");

        if wp == 1.0 {
            point3(xp, yp, zp)
        } else {
            point3(xp, yp, zp) / wp
        }
    }

    /// Applies the linear part of the transformation to a given vector
    /// (`w = 0`, translation ignored).
    ///
    /// * `v` - The vector.
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        let m = &self.m;
        vector3(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Applies transformation to a given normal using the inverse-transpose
    /// of the linear part. The result is not normalized.
    ///
    /// * `n` - The normal.
    pub fn transform_normal(&self, n: &Normal3f) -> Normal3f {
        let m_inv = &self.m_inv.m;
        normal3(
            m_inv[0][0] * n.x + m_inv[1][0] * n.y + m_inv[2][0] * n.z,
            m_inv[0][1] * n.x + m_inv[1][1] * n.y + m_inv[2][1] * n.z,
            m_inv[0][2] * n.x + m_inv[1][2] * n.y + m_inv[2][2] * n.z,
        )
    }

    /// Applies transformation to a given ray. The direction is not
    /// renormalized so ray parameters stay valid in both spaces.
    ///
    /// * `r` - The ray.
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        Ray::new(self.transform_point(&r.o), self.transform_vector(&r.d))
    }

    /// Applies transformation to a given bounding box by transforming all
    /// eight corners.
    ///
    /// * `b` - The bounding box.
    pub fn transform_bounds(&self, b: &Bounds3f) -> Bounds3f {
        if b.is_empty() {
            return Bounds3f::EMPTY;
        }
        (0..8).fold(Bounds3f::EMPTY, |acc, corner| {
            acc.union(&self.transform_point(&b.corner(corner)))
        })
    }
}

impl Mul<Transform> for Transform {
    type Output = Self;

    /// Composes this transformation with another one. The result applies
    /// `rhs` first and then `self`.
    ///
    /// * `rhs` - The transformation to compose.
    fn mul(self, rhs: Self) -> Self {
        Transform {
            m: self.m * rhs.m,
            m_inv: rhs.m_inv * self.m_inv,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
