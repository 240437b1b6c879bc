//! Infinite double cone `x² + y² <= z²` around the Z axis.
//!
//! Scaled and placed through a CSG instance, and clipped by half-spaces to
//! make a finite cone (see [`crate::Solid::unit_cone`]).

use crate::csg::{axial_uv, quadric_spans, spans_to_boundaries, IntervalBoundary};
use crate::{MaterialId, Ray};
use lumen_math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleCone {
    material: MaterialId,
}

impl DoubleCone {
    pub fn new(material: MaterialId) -> Self {
        Self { material }
    }

    pub fn interval_boundaries(&self, ray: &Ray) -> Vec<IntervalBoundary> {
        let o = ray.origin();
        let d = ray.direction();
        let a = d.x * d.x + d.y * d.y - d.z * d.z;
        let b = 2.0 * (o.x * d.x + o.y * d.y - o.z * d.z);
        let c = o.x * o.x + o.y * o.y - o.z * o.z;

        spans_to_boundaries(&quadric_spans(a, b, c), self.material, |t| {
            let p = ray.at(t);
            // Gradient of x² + y² - z²; degenerate at the apex.
            let normal = Vec3::new(p.x, p.y, -p.z).try_normalize().unwrap_or(Vec3::Z);
            (normal, axial_uv(p))
        })
    }
}
