//! Shape arena and intersection dispatch.
//!
//! All shapes of a scene live in one [`Geometry`] and refer to each other by
//! [`ShapeId`]. A composite can only be added after its children, so the
//! shape graph has no cycles.

use crate::{
    Aggregate, Bounded, BvhNode, HitRecord, Instance, MaterialId, Plane, Ray, Rectangle, Solid,
    Triangle,
};
use lumen_math::{Aabb, Interval, Mat4, Vec3};
use thiserror::Error;

/// Smallest ray parameter accepted as a hit by top-level queries.
pub const MIN_HIT_T: f32 = 1e-5;

/// Handle to a shape in a [`Geometry`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u32);

impl ShapeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("instance transform is singular")]
    SingularTransform,

    #[error("mesh index {index} is out of range for {vertex_count} vertices")]
    MeshIndexOutOfRange { index: u32, vertex_count: usize },

    #[error("shape {0:?} does not exist in this geometry")]
    UnknownShape(ShapeId),
}

/// Everything a ray can hit.
#[derive(Debug, PartialEq)]
pub enum Shape {
    /// Infinite two-sided plane
    Plane(Plane),
    Rectangle(Rectangle),
    Triangle(Triangle),
    Solid(Solid),
    Bounded(Bounded),
    Aggregate(Aggregate),
    Bvh(BvhNode),
    Instance(Instance),
}

impl Shape {
    fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Plane(_) => Aabb::UNIVERSE,
            Shape::Rectangle(r) => r.bounding_box(),
            Shape::Triangle(t) => t.bounding_box(),
            Shape::Solid(s) => s.bounding_box(),
            Shape::Bounded(b) => b.bounding_box(),
            Shape::Aggregate(a) => a.bounding_box(),
            Shape::Bvh(b) => b.bounding_box(),
            Shape::Instance(i) => i.bounding_box(),
        }
    }
}

impl From<Plane> for Shape {
    fn from(plane: Plane) -> Self {
        Shape::Plane(plane)
    }
}

impl From<Rectangle> for Shape {
    fn from(rect: Rectangle) -> Self {
        Shape::Rectangle(rect)
    }
}

impl From<Triangle> for Shape {
    fn from(tri: Triangle) -> Self {
        Shape::Triangle(tri)
    }
}

impl From<Solid> for Shape {
    fn from(solid: Solid) -> Self {
        Shape::Solid(solid)
    }
}

/// Append-only shape storage with cached bounding boxes.
#[derive(Debug, Default)]
pub struct Geometry {
    shapes: Vec<Shape>,
    boxes: Vec<Aabb>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.index())
    }

    /// Cached box of a shape; empty for unknown ids.
    pub fn bounding_box(&self, id: ShapeId) -> Aabb {
        self.boxes.get(id.index()).copied().unwrap_or(Aabb::EMPTY)
    }

    /// Add a leaf shape (plane, rectangle, triangle or solid). Composites
    /// go through the `add_*` methods so their children can be checked.
    pub fn add(&mut self, shape: impl Into<Shape>) -> ShapeId {
        self.push(shape.into())
    }

    /// Wrap a shape with a bounding-box pre-test.
    pub fn add_bounded(&mut self, child: ShapeId) -> Result<ShapeId, GeometryError> {
        let bbox = self.checked_box(child)?;
        Ok(self.push(Shape::Bounded(Bounded::new(child, bbox))))
    }

    /// Linear list of shapes answering with the nearest hit.
    pub fn add_aggregate(&mut self, members: &[ShapeId]) -> Result<ShapeId, GeometryError> {
        let members = self.members_with_boxes(members)?;
        Ok(self.push(Shape::Aggregate(Aggregate::new(members))))
    }

    /// BVH over shapes.
    pub fn add_bvh(&mut self, members: &[ShapeId]) -> Result<ShapeId, GeometryError> {
        let members = self.members_with_boxes(members)?;
        Ok(self.push(Shape::Bvh(BvhNode::new(members))))
    }

    /// Place `child` with an affine transform. Fails on singular transforms.
    pub fn add_instance(&mut self, child: ShapeId, transform: Mat4) -> Result<ShapeId, GeometryError> {
        let bbox = self.checked_box(child)?;
        let instance = Instance::new(child, bbox, transform)?;
        Ok(self.push(Shape::Instance(instance)))
    }

    /// Triangle mesh from in-memory arrays, stored as a BVH of triangles.
    /// With `normals`, one normal per vertex is interpolated across faces.
    pub fn add_mesh(
        &mut self,
        vertices: &[Vec3],
        normals: Option<&[Vec3]>,
        indices: &[[u32; 3]],
        material: MaterialId,
    ) -> Result<ShapeId, GeometryError> {
        let vertex_count = normals.map_or(vertices.len(), |n| n.len().min(vertices.len()));
        let lookup = |index: u32| {
            if (index as usize) < vertex_count {
                Ok(index as usize)
            } else {
                Err(GeometryError::MeshIndexOutOfRange {
                    index,
                    vertex_count,
                })
            }
        };

        let mut triangles = Vec::with_capacity(indices.len());
        for face in indices {
            let [a, b, c] = [lookup(face[0])?, lookup(face[1])?, lookup(face[2])?];
            let triangle = match normals {
                Some(n) => Triangle::with_normals(vertices[a], vertices[b], vertices[c], [n[a], n[b], n[c]], material),
                None => Triangle::new(vertices[a], vertices[b], vertices[c], material),
            };
            triangles.push(self.add(triangle));
        }

        let mesh = self.add_bvh(&triangles)?;
        log::info!(
            "Built mesh: {} triangles, bbox {:?}",
            triangles.len(),
            self.bounding_box(mesh)
        );
        Ok(mesh)
    }

    /// Nearest hit of `ray` with shape `id` inside `ray_t`. The record's
    /// `shape` names the leaf that was hit.
    pub fn intersect(&self, id: ShapeId, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let hit = match self.get(id)? {
            Shape::Plane(p) => p.intersect(ray, ray_t),
            Shape::Rectangle(r) => r.intersect(ray, ray_t),
            Shape::Triangle(t) => t.intersect(ray, ray_t),
            Shape::Solid(s) => s.intersect(ray, ray_t),
            Shape::Bounded(b) => return b.intersect(self, ray, ray_t),
            Shape::Aggregate(a) => return a.intersect(self, ray, ray_t),
            Shape::Bvh(b) => return b.intersect(self, ray, ray_t),
            Shape::Instance(i) => return i.intersect(self, ray, ray_t),
        };
        hit.map(|rec| rec.with_shape(id))
    }

    fn push(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.shapes.len() as u32);
        self.boxes.push(shape.bounding_box());
        self.shapes.push(shape);
        id
    }

    fn checked_box(&self, id: ShapeId) -> Result<Aabb, GeometryError> {
        self.boxes
            .get(id.index())
            .copied()
            .ok_or(GeometryError::UnknownShape(id))
    }

    fn members_with_boxes(&self, members: &[ShapeId]) -> Result<Vec<(ShapeId, Aabb)>, GeometryError> {
        members
            .iter()
            .map(|&id| Ok((id, self.checked_box(id)?)))
            .collect()
    }
}
