//! Bounding-box culling and linear aggregates.
//!
//! Both wrap shapes that live in the same [`Geometry`] arena and refer to
//! them by [`ShapeId`]. Boxes are looked up once when the wrapper is built.

use crate::{Geometry, HitRecord, Ray, ShapeId};
use lumen_math::{Aabb, Interval};

/// A shape gated by its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounded {
    child: ShapeId,
    bbox: Aabb,
}

impl Bounded {
    pub(crate) fn new(child: ShapeId, bbox: Aabb) -> Self {
        Self { child, bbox }
    }

    pub fn child(&self) -> ShapeId {
        self.child
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    pub(crate) fn intersect(&self, geometry: &Geometry, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let ray_t = self.bbox.hit(ray.origin(), ray.direction(), ray_t)?;
        geometry.intersect(self.child, ray, ray_t)
    }
}

/// Ordered list of shapes; answers with the nearest hit among them.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    members: Vec<(ShapeId, Aabb)>,
    bbox: Aabb,
}

impl Aggregate {
    pub(crate) fn new(members: Vec<(ShapeId, Aabb)>) -> Self {
        let bbox = members
            .iter()
            .fold(Aabb::EMPTY, |acc, (_, b)| Aabb::surrounding(&acc, b));
        Self { members, bbox }
    }

    pub fn members(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.members.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    pub(crate) fn intersect(&self, geometry: &Geometry, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        nearest_hit(geometry, &self.members, ray, ray_t)
    }
}

/// Nearest hit over `members`, shrinking the search interval as hits are
/// found. Members whose box misses the remaining interval are skipped.
pub(crate) fn nearest_hit(
    geometry: &Geometry,
    members: &[(ShapeId, Aabb)],
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord> {
    let mut closest: Option<HitRecord> = None;
    let mut range = ray_t;

    for (id, bbox) in members {
        if bbox.hit(ray.origin(), ray.direction(), range).is_none() {
            continue;
        }
        if let Some(rec) = geometry.intersect(*id, ray, range) {
            range = range.with_max(rec.t);
            closest = Some(rec);
        }
    }
    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MaterialId, Solid, Sphere};
    use lumen_math::Vec3;

    fn sphere(geometry: &mut Geometry, z: f32) -> ShapeId {
        geometry.add(Solid::Sphere(Sphere::new(Vec3::new(0.0, 0.0, z), 0.5, MaterialId::default())))
    }

    #[test]
    fn test_aggregate_returns_nearest_regardless_of_order() {
        let mut geometry = Geometry::new();
        let far = sphere(&mut geometry, -10.0);
        let near = sphere(&mut geometry, -3.0);
        let list = geometry.add_aggregate(&[far, near]).unwrap();

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let rec = geometry.intersect(list, &ray, Interval::from_min(1e-4)).unwrap();
        assert!((rec.t - 2.5).abs() < 1e-5);
        assert_eq!(rec.shape, Some(near));
    }

    #[test]
    fn test_empty_aggregate_misses() {
        let mut geometry = Geometry::new();
        let list = geometry.add_aggregate(&[]).unwrap();
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);

        assert!(geometry.intersect(list, &ray, Interval::from_min(1e-4)).is_none());
        assert!(geometry.bounding_box(list).is_empty());
    }

    #[test]
    fn test_bounded_culls_and_forwards() {
        let mut geometry = Geometry::new();
        let inner = sphere(&mut geometry, -3.0);
        let bounded = geometry.add_bounded(inner).unwrap();

        let hit = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        assert!(geometry.intersect(bounded, &hit, Interval::from_min(1e-4)).is_some());

        let miss = Ray::new(Vec3::new(2.0, 0.0, 0.0), -Vec3::Z, 0.0);
        assert!(geometry.intersect(bounded, &miss, Interval::from_min(1e-4)).is_none());
    }

    #[test]
    fn test_aggregate_box_is_union_of_children() {
        let mut geometry = Geometry::new();
        let a = sphere(&mut geometry, -3.0);
        let b = sphere(&mut geometry, 3.0);
        let list = geometry.add_aggregate(&[a, b]).unwrap();

        let bbox = geometry.bounding_box(list);
        assert!((bbox.min.z + 3.5).abs() < 1e-5);
        assert!((bbox.max.z - 3.5).abs() < 1e-5);
    }
}
