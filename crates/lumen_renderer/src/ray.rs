//! Ray type for ray tracing.
//!
//! A ray is defined by an origin point, a direction vector, a recursion depth
//! for specular transport and a time tag.

use lumen_math::Vec3;

/// Distance the origin of an offset ray is pushed along its direction so the
/// surface it leaves is not hit again ("shadow acne").
pub const RAY_EPSILON: f32 = 1e-4;

/// A ray with origin, direction, depth and time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray
    origin: Vec3,
    /// Direction vector (not necessarily normalized)
    direction: Vec3,
    /// Number of specular bounces that produced this ray
    depth: u32,
    /// Time tag, free for camera models to use
    time: f32,
}

impl Ray {
    /// Create a new primary ray (depth 0).
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            depth: 0,
            time,
        }
    }

    /// Create a secondary ray whose origin is nudged by [`RAY_EPSILON`]
    /// along the direction, for rays leaving a surface.
    #[inline]
    pub fn offset(origin: Vec3, direction: Vec3, time: f32, depth: u32) -> Self {
        Self {
            origin: origin + RAY_EPSILON * direction,
            direction,
            depth,
            time,
        }
    }

    /// Get the ray's origin point.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the ray's direction vector.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the recursion depth.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Get the ray's time value.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }

    /// Point at euclidean distance `s` from the origin, independent of the
    /// direction's length.
    #[inline]
    pub fn at_distance(&self, s: f32) -> Vec3 {
        self.origin + s * self.direction.normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 0.0);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.5), Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(ray.at_distance(1.5), Vec3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn test_offset_ray_moves_origin() {
        let ray = Ray::offset(Vec3::ZERO, Vec3::Y, 0.25, 3);

        assert!((ray.origin().y - RAY_EPSILON).abs() < 1e-9);
        assert_eq!(ray.direction(), Vec3::Y);
        assert_eq!(ray.depth(), 3);
        assert_eq!(ray.time(), 0.25);
    }

    #[test]
    fn test_primary_ray_has_depth_zero() {
        assert_eq!(Ray::new(Vec3::ZERO, Vec3::Z, 0.0).depth(), 0);
    }
}
