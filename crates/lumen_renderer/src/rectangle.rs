//! Parallelogram spanned by two edges from a corner.
//!
//! Used as a visible surface and as the shape of area lights.

use crate::{HitRecord, MaterialId, Ray};
use lumen_math::{Aabb, Interval, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    corner: Vec3,
    /// Unit edge directions
    edge1: Vec3,
    edge2: Vec3,
    edge1_length: f32,
    edge2_length: f32,
    /// edge1 × edge2, normalized
    normal: Vec3,
    material: MaterialId,
}

impl Rectangle {
    pub fn new(corner: Vec3, edge1: Vec3, edge2: Vec3, material: MaterialId) -> Self {
        Self {
            corner,
            edge1: edge1.normalize_or_zero(),
            edge2: edge2.normalize_or_zero(),
            edge1_length: edge1.length(),
            edge2_length: edge2.length(),
            normal: edge1.cross(edge2).normalize_or_zero(),
            material,
        }
    }

    pub fn corner(&self) -> Vec3 {
        self.corner
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Area of the parallelogram.
    pub fn area(&self) -> f32 {
        (self.edge1 * self.edge1_length)
            .cross(self.edge2 * self.edge2_length)
            .length()
    }

    /// Point at fractional coordinates `(s, t)` in `[0, 1]²`.
    pub fn point_at(&self, s: f32, t: f32) -> Vec3 {
        self.corner + s * self.edge1_length * self.edge1 + t * self.edge2_length * self.edge2
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_iter_points([
            self.point_at(0.0, 0.0),
            self.point_at(1.0, 0.0),
            self.point_at(0.0, 1.0),
            self.point_at(1.0, 1.0),
        ])
    }

    /// Two-sided hit. The stored normal is returned as is.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let denom = self.normal.dot(ray.direction());
        if denom == 0.0 {
            return None;
        }
        let t = self.normal.dot(self.corner - ray.origin()) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let d = ray.at(t) - self.corner;
        let along1 = d.dot(self.edge1);
        let along2 = d.dot(self.edge2);
        if !(0.0..=self.edge1_length).contains(&along1) || !(0.0..=self.edge2_length).contains(&along2) {
            return None;
        }

        Some(HitRecord::from_ray(
            ray,
            t,
            self.normal,
            self.material,
            along1 / self.edge1_length,
            along2 / self.edge2_length,
        ))
    }
}
