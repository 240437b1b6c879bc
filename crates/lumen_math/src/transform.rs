// Transform utilities for Mat4
//
// Extends glam::Mat4 with the pieces instancing needs: normal transforms that
// stay perpendicular under non-uniform scale, and conservative box transforms.

use crate::Aabb;
use glam::{Mat3, Mat4, Vec3};

/// Determinants smaller than this are treated as singular.
const SINGULAR_EPSILON: f32 = 1e-8;

/// Extension trait for Mat4 with ray tracing transform helpers.
pub trait Mat4Ext {
    /// Inverse-transpose of the upper 3x3 block, the matrix that maps
    /// surface normals.
    fn normal_matrix(&self) -> Mat3;

    /// Transform a normal and renormalize it.
    fn transform_normal(&self, normal: Vec3) -> Vec3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners; unbounded
    /// boxes stay unbounded.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;

    /// True when the matrix can be inverted reliably.
    fn is_invertible(&self) -> bool;
}

impl Mat4Ext for Mat4 {
    fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(*self).inverse().transpose()
    }

    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        (self.normal_matrix() * normal).normalize_or_zero()
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }
        if !aabb.is_bounded() {
            return Aabb::UNIVERSE;
        }
        Aabb::from_iter_points(aabb.corners().iter().map(|&c| self.transform_point3(c)))
    }

    fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det.is_finite() && det.abs() > SINGULAR_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normal_matrix_non_uniform_scale() {
        // Plane x + y = 0 has normal (1,1,0)/√2. Stretching x by 2 turns
        // the plane into x/2 + y = 0, whose normal is (1,2,0)/√5.
        let mat = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let n = mat.transform_normal(Vec3::new(1.0, 1.0, 0.0).normalize());
        let expected = Vec3::new(1.0, 2.0, 0.0).normalize();
        assert!((n - expected).length() < 1e-5);

        // The naive transform would have produced a wrong normal
        let naive = mat.transform_vector3(Vec3::new(1.0, 1.0, 0.0)).normalize();
        assert!((naive - expected).length() > 0.1);
    }

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::splat(5.0));
        let transformed = mat.transform_aabb(&Aabb::from_points(Vec3::ZERO, Vec3::ONE));

        assert!((transformed.min - Vec3::splat(5.0)).length() < 1e-4);
        assert!((transformed.max - Vec3::splat(6.0)).length() < 1e-4);
    }

    #[test]
    fn test_transform_aabb_rotation_stays_conservative() {
        let mat = Mat4::from_rotation_z(PI / 4.0);
        let unit = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let transformed = mat.transform_aabb(&unit);

        for corner in unit.corners() {
            assert!(transformed.contains_point(mat.transform_point3(corner), 1e-4));
        }
    }

    #[test]
    fn test_transform_unbounded_aabb() {
        let mat = Mat4::from_translation(Vec3::X);
        assert_eq!(mat.transform_aabb(&Aabb::UNIVERSE), Aabb::UNIVERSE);
    }

    #[test]
    fn test_is_invertible() {
        assert!(Mat4::from_scale(Vec3::splat(0.5)).is_invertible());
        assert!(!Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)).is_invertible());
    }
}
