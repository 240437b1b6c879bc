//! Infinite cylinder `x² + y² <= r²` around the Z axis.

use crate::csg::{axial_uv, quadric_spans, spans_to_boundaries, IntervalBoundary};
use crate::{MaterialId, Ray};
use lumen_math::{Aabb, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    radius: f32,
    material: MaterialId,
}

impl Cylinder {
    pub fn new(radius: f32, material: MaterialId) -> Self {
        Self {
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Unbounded along Z.
    pub fn bounding_box(&self) -> Aabb {
        Aabb {
            min: Vec3::new(-self.radius, -self.radius, f32::NEG_INFINITY),
            max: Vec3::new(self.radius, self.radius, f32::INFINITY),
        }
    }

    pub fn interval_boundaries(&self, ray: &Ray) -> Vec<IntervalBoundary> {
        let o = ray.origin();
        let d = ray.direction();
        let a = d.x * d.x + d.y * d.y;
        let b = 2.0 * (o.x * d.x + o.y * d.y);
        let c = o.x * o.x + o.y * o.y - self.radius * self.radius;

        spans_to_boundaries(&quadric_spans(a, b, c), self.material, |t| {
            let p = ray.at(t);
            let normal = Vec3::new(p.x, p.y, 0.0).try_normalize().unwrap_or(Vec3::X);
            (normal, axial_uv(p))
        })
    }
}
