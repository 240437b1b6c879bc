//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{HitRecord, MaterialId, Ray};
use lumen_math::{Aabb, Interval, Vec3};

/// A triangle primitive, optionally with per-vertex normals for smooth
/// shading.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    /// Vertex normals, interpolated with the barycentric coordinates
    vertex_normals: Option<[Vec3; 3]>,
    material: MaterialId,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices. The face normal follows
    /// the counter-clockwise winding.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: MaterialId) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            v0,
            v1,
            v2,
            normal,
            vertex_normals: None,
            material,
            bbox: Aabb::from_iter_points([v0, v1, v2]),
        }
    }

    /// Create a triangle with per-vertex normals (for smooth shading).
    pub fn with_normals(v0: Vec3, v1: Vec3, v2: Vec3, normals: [Vec3; 3], material: MaterialId) -> Self {
        Self {
            vertex_normals: Some(normals),
            ..Self::new(v0, v1, v2, material)
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Möller-Trumbore ray-triangle intersection algorithm.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        let normal = match self.vertex_normals {
            Some([n0, n1, n2]) => (1.0 - u - v) * n0 + u * n1 + v * n2,
            None => self.normal,
        };
        Some(HitRecord::from_ray(ray, t, normal, self.material, u, v))
    }
}
