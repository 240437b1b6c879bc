//! Infinite plane: a two-sided surface, and the half-space behind it for CSG.
//!
//! The plane is `normal · x + d = 0`. As a solid it is the half-space
//! `normal · x + d <= 0`, so the normal points out of the solid.

use crate::csg::{BoundaryKind, IntervalBoundary};
use crate::{HitRecord, MaterialId, Ray};
use lumen_math::{Aabb, Interval, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vec3,
    d: f32,
    material: MaterialId,
}

impl Plane {
    /// Plane `normal · x + d = 0`. The normal does not need to be unit
    /// length; the equation is rescaled.
    pub fn new(normal: Vec3, d: f32, material: MaterialId) -> Self {
        let len = normal.length();
        Self {
            normal: normal / len,
            d: d / len,
            material,
        }
    }

    /// Plane through `point` with the given normal.
    pub fn through_point(point: Vec3, normal: Vec3, material: MaterialId) -> Self {
        let n = normal.normalize();
        Self::new(n, -n.dot(point), material)
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Signed distance to the plane, negative inside the half-space.
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.d
    }

    /// Two-sided surface intersection.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let denom = self.normal.dot(ray.direction());
        if denom == 0.0 {
            return None;
        }
        let t = -self.signed_distance(ray.origin()) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }
        Some(HitRecord::from_ray(ray, t, self.normal, self.material, 0.0, 0.0))
    }

    /// Boundaries of the half-space along the ray. A ray that starts inside
    /// enters at −∞; one that ends inside exits at +∞.
    pub fn interval_boundaries(&self, ray: &Ray) -> Vec<IntervalBoundary> {
        let denom = self.normal.dot(ray.direction());
        let dist = self.signed_distance(ray.origin());
        let boundary = |t, kind| IntervalBoundary::new(t, kind, self.normal, self.material);

        if denom == 0.0 {
            return if dist <= 0.0 {
                vec![
                    boundary(f32::NEG_INFINITY, BoundaryKind::Entering),
                    boundary(f32::INFINITY, BoundaryKind::Exiting),
                ]
            } else {
                Vec::new()
            };
        }

        let t = -dist / denom;
        if denom < 0.0 {
            vec![
                boundary(t, BoundaryKind::Entering),
                boundary(f32::INFINITY, BoundaryKind::Exiting),
            ]
        } else {
            vec![
                boundary(f32::NEG_INFINITY, BoundaryKind::Entering),
                boundary(t, BoundaryKind::Exiting),
            ]
        }
    }

    /// Box of the half-space. Only axis-aligned planes bound anything.
    pub fn half_space_bounds(&self) -> Aabb {
        let mut bbox = Aabb::UNIVERSE;
        for axis in 0..3 {
            let n = self.normal[axis];
            if (n.abs() - 1.0).abs() < 1e-6 {
                // n * x + d <= 0
                let limit = -self.d / n;
                if n > 0.0 {
                    bbox.max[axis] = limit;
                } else {
                    bbox.min[axis] = limit;
                }
            }
        }
        bbox
    }
}
