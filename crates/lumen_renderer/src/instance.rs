//! Affine instancing of shapes in a [`Geometry`] arena.
//!
//! An instance stores one transform and a handle to the shape it places, so
//! many instances can share one prototype (a mesh BVH, a CSG solid). Rays
//! are taken to the prototype's local space instead of copying geometry.

use crate::{Geometry, GeometryError, HitRecord, Ray, ShapeId};
use lumen_math::{Aabb, Interval, Mat3, Mat4, Mat4Ext};

#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    child: ShapeId,
    /// Local-to-world transform
    transform: Mat4,
    /// World-to-local transform (for ray transformation)
    inverse: Mat4,
    /// Inverse-transpose, for normals
    normal_matrix: Mat3,
    /// World-space box of the transformed child
    bbox: Aabb,
}

impl Instance {
    pub(crate) fn new(child: ShapeId, child_bbox: Aabb, transform: Mat4) -> Result<Self, GeometryError> {
        if !transform.is_invertible() {
            return Err(GeometryError::SingularTransform);
        }
        Ok(Self {
            child,
            transform,
            inverse: transform.inverse(),
            normal_matrix: transform.normal_matrix(),
            bbox: transform.transform_aabb(&child_bbox),
        })
    }

    pub fn child(&self) -> ShapeId {
        self.child
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    pub(crate) fn intersect(&self, geometry: &Geometry, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.bbox.hit(ray.origin(), ray.direction(), ray_t)?;

        // The local direction is not renormalized, so t means the same
        // thing on both sides of the transform.
        let local_ray = Ray::new(
            self.inverse.transform_point3(ray.origin()),
            self.inverse.transform_vector3(ray.direction()),
            ray.time(),
        );
        let local = geometry.intersect(self.child, &local_ray, ray_t)?;

        let normal = self.normal_matrix * local.normal;
        let mut rec = HitRecord::from_ray(ray, local.t, normal, local.material, local.u, local.v);
        rec.shape = local.shape;
        Some(rec)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Geometry, GeometryError, MaterialId, Ray, Solid, Sphere, Triangle};
    use lumen_math::{Interval, Mat4, Vec3};

    #[test]
    fn test_instance_moves_hit() {
        let mut geometry = Geometry::new();
        let sphere = geometry.add(Solid::Sphere(Sphere::unit(MaterialId::default())));
        let moved = geometry
            .add_instance(sphere, Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)))
            .unwrap();

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let rec = geometry.intersect(moved, &ray, Interval::from_min(1e-4)).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-5);
        assert!((rec.position - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-5);
        assert_eq!(rec.shape, Some(sphere));
    }

    #[test]
    fn test_normal_under_non_uniform_scale() {
        let mut geometry = Geometry::new();
        // Slanted triangle whose normal is (1, 1, 0) / √2 in local space.
        let tri = geometry.add(Triangle::new(
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            MaterialId::default(),
        ));
        let scaled = geometry
            .add_instance(tri, Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)))
            .unwrap();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0), 0.0);
        let rec = geometry.intersect(scaled, &ray, Interval::from_min(1e-4)).unwrap();

        // World surface is x/2 + y = 1, so the normal is (0.5, 1, 0) normalized.
        let expected = Vec3::new(0.5, 1.0, 0.0).normalize();
        assert!((rec.normal - expected).length() < 1e-5);
        assert!((rec.position.x / 2.0 + rec.position.y - 1.0).abs() < 1e-5);
        assert!(rec.t1.dot(rec.normal).abs() < 1e-5);
    }

    #[test]
    fn test_singular_instance_rejected() {
        let mut geometry = Geometry::new();
        let sphere = geometry.add(Solid::Sphere(Sphere::unit(MaterialId::default())));
        let result = geometry.add_instance(sphere, Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0)));
        assert!(matches!(result, Err(GeometryError::SingularTransform)));
    }

    #[test]
    fn test_shared_prototype() {
        let mut geometry = Geometry::new();
        let sphere = geometry.add(Solid::Sphere(Sphere::new(Vec3::ZERO, 0.5, MaterialId::default())));
        let copies: Vec<_> = (0..3)
            .map(|i| {
                geometry
                    .add_instance(sphere, Mat4::from_translation(Vec3::new(i as f32 * 2.0, 0.0, -3.0)))
                    .unwrap()
            })
            .collect();
        let list = geometry.add_aggregate(&copies).unwrap();

        let ray = Ray::new(Vec3::new(4.0, 0.0, 0.0), -Vec3::Z, 0.0);
        let rec = geometry.intersect(list, &ray, Interval::from_min(1e-4)).unwrap();
        assert!((rec.position - Vec3::new(4.0, 0.0, -2.5)).length() < 1e-5);
    }
}
