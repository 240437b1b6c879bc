//! HitRecord for ray-surface intersection.

use crate::{MaterialId, Ray, ShapeId};
use lumen_math::Vec3;

/// Record of a ray-surface intersection, or of a point sampled on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub position: Vec3,
    /// Unit surface normal. For closed solids it points outward, so it may
    /// face away from the ray when the ray started inside.
    pub normal: Vec3,
    /// Tangent vectors; {t1, t2, normal} is a right-handed orthonormal frame
    pub t1: Vec3,
    pub t2: Vec3,
    /// Unit vector from the hit toward the ray origin (opposite the incident ray)
    pub w: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Shape that was hit, if the record came from the geometry arena
    pub shape: Option<ShapeId>,
    /// Material at the intersection point
    pub material: MaterialId,
    /// Area probability density, set when the record was produced by
    /// sampling geometry instead of casting a ray
    pub p: f32,
}

impl HitRecord {
    /// Build a record and its tangent frame.
    pub fn new(
        t: f32,
        position: Vec3,
        normal: Vec3,
        w: Vec3,
        material: MaterialId,
        u: f32,
        v: f32,
    ) -> Self {
        let normal = normal.try_normalize().unwrap_or(Vec3::Z);
        let (t1, t2) = tangent_frame(normal);
        Self {
            position,
            normal,
            t1,
            t2,
            w,
            t,
            u,
            v,
            shape: None,
            material,
            p: 1.0,
        }
    }

    /// Record for a ray hit at parameter `t`; `w` is derived from the ray.
    pub fn from_ray(ray: &Ray, t: f32, normal: Vec3, material: MaterialId, u: f32, v: f32) -> Self {
        let w = (-ray.direction()).normalize_or_zero();
        Self::new(t, ray.at(t), normal, w, material, u, v)
    }

    /// Tag the record with the arena handle of the shape that produced it.
    pub fn with_shape(mut self, shape: ShapeId) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Whether the ray arrived on the side the normal points to.
    pub fn is_front_face(&self) -> bool {
        self.normal.dot(self.w) > 0.0
    }
}

/// Gram-Schmidt tangents for a unit normal, using +X as the reference axis
/// and +Y when +X is parallel to the normal.
fn tangent_frame(normal: Vec3) -> (Vec3, Vec3) {
    let t1 = Vec3::X
        .cross(normal)
        .try_normalize()
        .or_else(|| Vec3::Y.cross(normal).try_normalize())
        .unwrap_or(Vec3::Y);
    let t2 = normal.cross(t1);
    (t1, t2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_right_handed_orthonormal(rec: &HitRecord) {
        let eps = 1e-5;
        assert!((rec.t1.length() - 1.0).abs() < eps);
        assert!((rec.t2.length() - 1.0).abs() < eps);
        assert!((rec.normal.length() - 1.0).abs() < eps);
        assert!(rec.t1.dot(rec.t2).abs() < eps);
        assert!(rec.t1.dot(rec.normal).abs() < eps);
        assert!(rec.t2.dot(rec.normal).abs() < eps);
        assert!((rec.t1.cross(rec.t2) - rec.normal).length() < eps);
    }

    #[test]
    fn test_tangent_frame_generic_normal() {
        let rec = HitRecord::new(
            1.0,
            Vec3::ZERO,
            Vec3::new(0.3, -0.5, 0.8),
            Vec3::Z,
            MaterialId::default(),
            0.0,
            0.0,
        );
        assert_right_handed_orthonormal(&rec);
    }

    #[test]
    fn test_tangent_frame_falls_back_for_x_normal() {
        for normal in [Vec3::X, -Vec3::X] {
            let rec = HitRecord::new(1.0, Vec3::ZERO, normal, normal, MaterialId::default(), 0.0, 0.0);
            assert_right_handed_orthonormal(&rec);
        }
    }

    #[test]
    fn test_from_ray_points_w_back() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0), 0.0);
        let rec = HitRecord::from_ray(&ray, 2.0, Vec3::Z, MaterialId::default(), 0.0, 0.0);

        assert_eq!(rec.position, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(rec.w, Vec3::Z);
        assert!(rec.is_front_face());
    }
}
