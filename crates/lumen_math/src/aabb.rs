use crate::{Interval, Vec3};

/// Minimum extent along any axis; thinner boxes are padded so the slab test
/// never sees a zero-width slab.
const MIN_EXTENT: f32 = 0.0001;

/// Axis-aligned bounding box stored as its two extreme corners.
///
/// Boxes are conservative: a box may be larger than the geometry it wraps but
/// never smaller. Unbounded geometry (half-spaces, infinite cones) reports
/// [`Aabb::UNIVERSE`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box that contains nothing. Neutral element of [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Box that contains everything.
    pub const UNIVERSE: Aabb = Aabb {
        min: Vec3::NEG_INFINITY,
        max: Vec3::INFINITY,
    };

    /// Create a box from two opposite corners, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            min: a.min(b),
            max: a.max(b),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Smallest box containing every point of the iterator.
    pub fn from_iter_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = points.into_iter().fold(Aabb::EMPTY, |acc, p| Aabb {
            min: acc.min.min(p),
            max: acc.max.max(p),
        });
        if !aabb.is_empty() {
            aabb.pad_to_minimums();
        }
        aabb
    }

    /// Create a box that surrounds two other boxes.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Overlap of two boxes. May be empty.
    pub fn overlap(a: &Aabb, b: &Aabb) -> Self {
        Self {
            min: a.min.max(b.min),
            max: a.max.min(b.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// True when every extent is finite.
    pub fn is_bounded(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Extent of the box along one axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, axis: usize) -> Interval {
        Interval::new(self.min[axis], self.max[axis])
    }

    /// Returns true if `p` lies inside the box grown by `tolerance` on every side.
    pub fn contains_point(&self, p: Vec3, tolerance: f32) -> bool {
        let t = Vec3::splat(tolerance);
        p.cmpge(self.min - t).all() && p.cmple(self.max + t).all()
    }

    /// Slab-method ray/box test.
    ///
    /// Returns the parameter range over which the ray is inside the box,
    /// clipped to `ray_t`, or `None` when the clipped range is empty.
    pub fn hit(&self, origin: Vec3, direction: Vec3, mut ray_t: Interval) -> Option<Interval> {
        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d == 0.0 {
                // Parallel to this slab: either always inside it or never.
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return None;
            }
        }
        Some(ray_t)
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let size = self.max - self.min;
        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// The eight corners, used when transforming a box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    fn pad_to_minimums(&mut self) {
        for axis in 0..3 {
            if self.max[axis] - self.min[axis] < MIN_EXTENT {
                let padded = self.axis_interval(axis).expand(MIN_EXTENT);
                self.min[axis] = padded.min;
                self.max[axis] = padded.max;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_pads_flat_boxes() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        assert!(aabb.max.z - aabb.min.z >= MIN_EXTENT);
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::splat(5.0));
        let box2 = Aabb::from_points(Vec3::splat(3.0), Vec3::splat(10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.min, Vec3::ZERO);
        assert_eq!(surrounding.max, Vec3::splat(10.0));
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &box1), box1);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let range = Interval::new(0.0, 100.0);

        let hit = aabb.hit(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, range);
        let span = hit.expect("ray at the center should hit");
        assert!((span.min - 4.0).abs() < 1e-5);
        assert!((span.max - 6.0).abs() < 1e-5);

        // Pointing away
        assert!(aabb.hit(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, range).is_none());

        // Parallel to the X slabs but outside them
        assert!(aabb.hit(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, range).is_none());
    }

    #[test]
    fn test_aabb_hit_respects_interval() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(aabb
            .hit(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, Interval::new(0.0, 3.0))
            .is_none());
    }

    #[test]
    fn test_universe_box_always_hit() {
        let hit = Aabb::UNIVERSE.hit(Vec3::splat(3.0), Vec3::new(0.0, 1.0, 0.0), Interval::from_min(0.0));
        assert!(hit.is_some());
        assert!(!Aabb::UNIVERSE.is_bounded());
    }

    #[test]
    fn test_aabb_contains_point() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::splat(0.5), 0.0));
        assert!(aabb.contains_point(Vec3::new(1.0005, 0.5, 0.5), 1e-3));
        assert!(!aabb.contains_point(Vec3::new(1.1, 0.5, 0.5), 1e-3));
    }

    #[test]
    fn test_aabb_longest_axis_and_centroid() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        assert_eq!(aabb.longest_axis(), 1);
        assert_eq!(aabb.centroid(), Vec3::new(0.5, 5.0, 0.5));
    }
}
