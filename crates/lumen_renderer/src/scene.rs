//! Everything a render needs: shapes, lights, materials, camera and the
//! factories for per-task integrators and samplers.

use crate::geometry::MIN_HIT_T;
use crate::{
    Camera, Geometry, HitRecord, Integrator, IntegratorKind, LightGeometry, Materials, Ray,
    Sampler, SamplerKind, ShapeId,
};
use lumen_math::Interval;

pub struct Scene {
    pub geometry: Geometry,
    /// Shape every camera and shadow ray is cast against
    pub root: ShapeId,
    pub materials: Materials,
    pub lights: Vec<Box<dyn LightGeometry>>,
    pub camera: Box<dyn Camera>,
    pub width: u32,
    pub height: u32,
    /// Samples per pixel
    pub spp: u32,
    pub integrator: IntegratorKind,
    pub sampler: SamplerKind,
}

impl Scene {
    pub fn new(
        geometry: Geometry,
        root: ShapeId,
        materials: Materials,
        camera: Box<dyn Camera>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            geometry,
            root,
            materials,
            lights: Vec::new(),
            camera,
            width,
            height,
            spp: 1,
            integrator: IntegratorKind::default(),
            sampler: SamplerKind::default(),
        }
    }

    pub fn with_light(mut self, light: impl LightGeometry + 'static) -> Self {
        self.lights.push(Box::new(light));
        self
    }

    pub fn with_spp(mut self, spp: u32) -> Self {
        self.spp = spp;
        self
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_sampler(mut self, sampler: SamplerKind) -> Self {
        self.sampler = sampler;
        self
    }

    /// Nearest hit of `ray` with the scene root.
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        self.geometry
            .intersect(self.root, ray, Interval::from_min(MIN_HIT_T))
    }

    /// Fresh integrator for one render task.
    pub fn make_integrator(&self, seed: u64) -> Box<dyn Integrator + '_> {
        self.integrator.make(self, seed)
    }

    /// Fresh pixel sampler for one render task.
    pub fn make_sampler(&self, seed: u64) -> Box<dyn Sampler> {
        self.sampler.make(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedCamera, Plane, Solid, Sphere, Spectrum};
    use lumen_math::Vec3;

    fn ball_scene() -> Scene {
        let mut geometry = Geometry::new();
        let ball = geometry.add(Solid::Sphere(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Default::default(),
        )));
        let root = geometry.add_aggregate(&[ball]).unwrap();
        Scene::new(geometry, root, Materials::new(), Box::new(FixedCamera::new(2, 2)), 2, 2)
    }

    #[test]
    fn test_intersect_root() {
        let scene = ball_scene();
        let rec = scene.intersect(&Ray::new(Vec3::ZERO, -Vec3::Z, 0.0)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!(scene.intersect(&Ray::new(Vec3::ZERO, Vec3::Z, 0.0)).is_none());
    }

    #[test]
    fn test_hits_closer_than_threshold_are_ignored() {
        let mut geometry = Geometry::new();
        let wall = geometry.add(Plane::new(Vec3::Z, 0.0, Default::default()));
        let scene = Scene::new(geometry, wall, Materials::new(), Box::new(FixedCamera::new(1, 1)), 1, 1);
        // Origin on the plane itself.
        assert!(scene.intersect(&Ray::new(Vec3::ZERO, -Vec3::Z, 0.0)).is_none());
    }

    #[test]
    fn test_factories_follow_settings() {
        let scene = ball_scene()
            .with_spp(4)
            .with_integrator(IntegratorKind::Direct)
            .with_sampler(SamplerKind::One);
        assert_eq!(scene.spp, 4);

        let mut sampler = scene.make_sampler(7);
        assert_eq!(sampler.make_samples(3, 2), vec![vec![0.5, 0.5]; 3]);

        // No lights: the ball is black, the miss is black.
        let mut integrator = scene.make_integrator(7);
        let radiance = integrator.integrate(&Ray::new(Vec3::ZERO, -Vec3::Z, 0.0));
        assert_eq!(radiance, Spectrum::ZERO);
        assert_eq!(integrator.rays_traced(), 1);
    }
}
