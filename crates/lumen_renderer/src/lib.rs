//! Lumen - CPU ray tracing core
//!
//! Constructive solid geometry over interval boundaries, bounding volume
//! hierarchies and instancing, Whitted-style and volumetric integrators,
//! and a tiled multi-threaded scheduler writing into a lock-free film.

mod ray;
mod hittable;
mod material;
mod plane;
mod sphere;
mod cone;
mod cylinder;
mod triangle;
mod rectangle;
pub mod csg;
mod aggregate;
mod bvh;
mod instance;
mod geometry;
pub mod noise;
mod sampler;
mod light;
mod camera;
mod film;
pub mod integrator;
pub mod whitted;
pub mod volumetric;
mod scene;
pub mod bucket;
mod renderer;

pub use ray::{Ray, RAY_EPSILON};
pub use hittable::HitRecord;
pub use material::{
    reflect, AreaLightMaterial, Dielectric, Diffuse, Material, MaterialId, Materials, Mirror,
    PointLightMaterial, ShadingSample, Spectrum,
};
pub use plane::Plane;
pub use sphere::Sphere;
pub use cone::DoubleCone;
pub use cylinder::Cylinder;
pub use triangle::Triangle;
pub use rectangle::Rectangle;
pub use csg::{BooleanOp, BoundaryKind, CsgInstance, CsgNode, IntervalBoundary, Solid};
pub use aggregate::{Aggregate, Bounded};
pub use bvh::BvhNode;
pub use instance::Instance;
pub use geometry::{Geometry, GeometryError, Shape, ShapeId, MIN_HIT_T};
pub use sampler::{OneSampler, RandomSampler, Sampler, SamplerKind, StratifiedSampler};
pub use light::{AreaLight, LightGeometry, LightSample, PointLight};
pub use camera::{Camera, FixedCamera, PinholeCamera};
pub use film::{spectrum_to_rgba, BoxFilterFilm, Film};
pub use integrator::{DirectIntegrator, Integrator, IntegratorKind, DEFAULT_MAX_DEPTH};
pub use whitted::WhittedIntegrator;
pub use volumetric::{MediumSettings, OcclusionReference, VolumetricIntegrator};
pub use scene::Scene;
pub use bucket::{Tile, TileOrder, DEFAULT_TILE_SIZE};
pub use renderer::{render, CancelToken, RenderConfig, RenderError, RenderStats, RenderTask};

/// Re-export the math types from lumen_math
pub use lumen_math::{Aabb, Interval, Mat4, Vec3};
