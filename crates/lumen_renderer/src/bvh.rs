//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shapes of a [`Geometry`] arena. Leaves hold shape
//! handles together with their boxes.

use crate::aggregate::nearest_hit;
use crate::{Geometry, HitRecord, Ray, ShapeId};
use lumen_math::{Aabb, Interval};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf {
        members: Vec<(ShapeId, Aabb)>,
        bbox: Aabb,
    },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH from shape handles and their boxes.
    pub(crate) fn new(members: Vec<(ShapeId, Aabb)>) -> Self {
        if members.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(members)
    }

    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort members by centroid on longest axis,
    /// split in half, recurse.
    fn build(mut members: Vec<(ShapeId, Aabb)>) -> Self {
        let n = members.len();

        let bounds = members
            .iter()
            .fold(Aabb::EMPTY, |acc, (_, b)| Aabb::surrounding(&acc, b));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                members,
                bbox: bounds,
            };
        }

        // Choose split axis based on centroid spread
        let centroid_bounds = members.iter().fold(Aabb::EMPTY, |acc, (_, b)| {
            let c = b.centroid();
            Aabb::surrounding(&acc, &Aabb { min: c, max: c })
        });
        let axis = centroid_bounds.longest_axis();

        // total_cmp keeps unbounded (NaN centroid) members sortable
        members.sort_unstable_by(|(_, a), (_, b)| a.centroid()[axis].total_cmp(&b.centroid()[axis]));

        // Split at midpoint
        let right_members = members.split_off(n / 2);
        let left = Self::build(members);
        let right = Self::build(right_members);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Number of shapes below this node.
    pub fn len(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { members, .. } => members.len(),
            BvhNode::Branch { left, right, .. } => left.len() + right.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn intersect(&self, geometry: &Geometry, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { members, bbox } => {
                bbox.hit(ray.origin(), ray.direction(), ray_t)?;
                nearest_hit(geometry, members, ray, ray_t)
            }

            BvhNode::Branch { left, right, bbox } => {
                bbox.hit(ray.origin(), ray.direction(), ray_t)?;

                let hit_left = left.intersect(geometry, ray, ray_t);
                // Only check right up to closest hit
                let right_t = hit_left.map_or(ray_t, |rec| ray_t.with_max(rec.t));
                right.intersect(geometry, ray, right_t).or(hit_left)
            }
        }
    }
}
