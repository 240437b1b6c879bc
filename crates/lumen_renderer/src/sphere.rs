//! Sphere primitive for ray tracing.

use crate::csg::{quadric_spans, spans_to_boundaries, IntervalBoundary};
use crate::MaterialId;
use crate::Ray;
use lumen_math::{Aabb, Vec3};
use std::f32::consts::PI;

/// A solid sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: MaterialId,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Unit sphere at the origin.
    pub fn unit(material: MaterialId) -> Self {
        Self::new(Vec3::ZERO, 1.0, material)
    }

    pub fn bounding_box(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        Aabb::from_points(self.center - rvec, self.center + rvec)
    }

    /// Entry/exit parameters of the ray through the sphere.
    pub fn interval_boundaries(&self, ray: &Ray) -> Vec<IntervalBoundary> {
        let oc = ray.origin() - self.center;
        let dir = ray.direction();
        let a = dir.length_squared();
        let b = 2.0 * dir.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        spans_to_boundaries(&quadric_spans(a, b, c), self.material, |t| {
            let outward = (ray.at(t) - self.center) / self.radius;
            (outward, Self::get_sphere_uv(outward))
        })
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}
