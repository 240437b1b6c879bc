//! Integrators estimate the radiance arriving along a camera ray.
//!
//! One integrator instance is created per render task, so integrators may
//! keep mutable state (a light sampler, counters) without synchronisation.

use crate::volumetric::{MediumSettings, VolumetricIntegrator};
use crate::whitted::WhittedIntegrator;
use crate::{HitRecord, RandomSampler, Ray, Sampler, Scene, Spectrum};
use lumen_math::Vec3;
use serde::{Deserialize, Serialize};

pub trait Integrator: Send {
    /// Radiance arriving at the ray origin from the ray direction. Zero when
    /// the ray escapes.
    fn integrate(&mut self, ray: &Ray) -> Spectrum;

    /// Sub-pixel samples for one pixel.
    fn make_pixel_samples(&self, sampler: &mut dyn Sampler, count: usize) -> Vec<Vec<f32>> {
        sampler.make_samples(count, 2)
    }

    /// Rays cast into the scene so far, shadow rays included.
    fn rays_traced(&self) -> u64;
}

/// Default number of specular bounces.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Which integrator a scene renders with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IntegratorKind {
    /// Direct lighting only; specular surfaces look black
    Direct,
    /// Direct lighting plus recursive specular reflection and refraction
    Whitted { max_depth: u32 },
    /// Direct lighting plus single scattering in a noisy medium
    Volumetric(MediumSettings),
}

impl Default for IntegratorKind {
    fn default() -> Self {
        IntegratorKind::Whitted {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl IntegratorKind {
    pub fn make<'a>(self, scene: &'a Scene, seed: u64) -> Box<dyn Integrator + 'a> {
        match self {
            IntegratorKind::Direct => Box::new(DirectIntegrator::new(scene, seed)),
            IntegratorKind::Whitted { max_depth } => {
                Box::new(WhittedIntegrator::new(scene, seed).with_max_depth(max_depth))
            }
            IntegratorKind::Volumetric(settings) => {
                Box::new(VolumetricIntegrator::new(scene, seed).with_settings(settings))
            }
        }
    }
}

/// Scene access shared by the integrators: ray casting with a counter, and
/// the direct-lighting estimate.
pub struct Tracer<'a> {
    scene: &'a Scene,
    light_sampler: RandomSampler,
    rays_traced: u64,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, seed: u64) -> Self {
        Self {
            scene,
            light_sampler: RandomSampler::new(seed),
            rays_traced: 0,
        }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn rays_traced(&self) -> u64 {
        self.rays_traced
    }

    pub fn trace(&mut self, ray: &Ray) -> Option<HitRecord> {
        self.rays_traced += 1;
        self.scene.intersect(ray)
    }

    /// Two uniform numbers for picking a point on a light.
    pub fn light_sample(&mut self) -> [f32; 2] {
        match self.light_sampler.make_samples(1, 2).as_slice() {
            [s] => [s[0], s[1]],
            _ => [0.5, 0.5],
        }
    }

    /// True when something that casts shadows sits between `from` and a
    /// point at squared distance `d2` along `dir`. The blocker's distance
    /// is measured from `reference`.
    pub fn occluded(&mut self, from: Vec3, reference: Vec3, dir: Vec3, d2: f32, time: f32) -> bool {
        let shadow_ray = Ray::offset(from, dir, time, 0);
        match self.trace(&shadow_ray) {
            Some(blocker) => {
                self.scene.materials.get(blocker.material).casts_shadows()
                    && blocker.position.distance_squared(reference) < d2
            }
            None => false,
        }
    }

    /// Sum over all lights of BRDF × emission × cosines / (d² × p), for
    /// lights not blocked from `hit`.
    pub fn direct_lighting(&mut self, hit: &HitRecord, time: f32) -> Spectrum {
        let scene = self.scene;
        let material = scene.materials.get(hit.material);
        let mut outgoing = Spectrum::ZERO;

        for light in &scene.lights {
            let light_hit = light.sample(self.light_sample());
            if light_hit.p == 0.0 {
                continue;
            }

            let to_light = light_hit.position - hit.position;
            let d2 = to_light.length_squared();
            let Some(light_dir) = to_light.try_normalize() else {
                continue;
            };

            if self.occluded(hit.position, hit.position, light_dir, d2, time) {
                continue;
            }

            let brdf = material.evaluate_brdf(hit, hit.w, light_dir);
            let emission = scene
                .materials
                .get(light_hit.material)
                .evaluate_emission(light_hit.normal, -light_dir)
                .unwrap_or(Spectrum::ZERO);

            // Point lights have no normal and emit equally everywhere.
            let cos_light = light_hit.normal.map_or(1.0, |n| n.dot(-light_dir).max(0.0));
            let cos_surface = hit.normal.dot(light_dir).max(0.0);

            outgoing += brdf * emission * (cos_surface * cos_light / (d2 * light_hit.p));
        }
        outgoing
    }
}

/// Direct lighting only. Emitters return their emission.
pub struct DirectIntegrator<'a> {
    tracer: Tracer<'a>,
}

impl<'a> DirectIntegrator<'a> {
    pub fn new(scene: &'a Scene, seed: u64) -> Self {
        Self {
            tracer: Tracer::new(scene, seed),
        }
    }
}

impl Integrator for DirectIntegrator<'_> {
    fn integrate(&mut self, ray: &Ray) -> Spectrum {
        let Some(hit) = self.tracer.trace(ray) else {
            return Spectrum::ZERO;
        };
        let material = self.tracer.scene().materials.get(hit.material);
        if let Some(emission) = material.evaluate_emission(Some(hit.normal), hit.w) {
            return emission;
        }
        self.tracer.direct_lighting(&hit, ray.time())
    }

    fn rays_traced(&self) -> u64 {
        self.tracer.rays_traced()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        AreaLight, AreaLightMaterial, Diffuse, FixedCamera, Geometry, Materials, Plane,
        PointLight, PointLightMaterial, Rectangle, Solid, Sphere,
    };
    use std::f32::consts::PI;

    /// Floor plane y = -1 facing up, with a point light above it.
    pub(crate) fn floor_scene(albedo: f32, intensity: f32, light_height: f32) -> Scene {
        let mut materials = Materials::new();
        let diffuse = materials.add(Diffuse::new(Spectrum::splat(albedo)));
        let emitter = materials.add(PointLightMaterial::new(Spectrum::splat(intensity)));

        let mut geometry = Geometry::new();
        let floor = geometry.add(Plane::new(Vec3::Y, 1.0, diffuse));
        let root = geometry.add_aggregate(&[floor]).unwrap();

        Scene::new(geometry, root, materials, Box::new(FixedCamera::new(8, 8)), 8, 8)
            .with_light(PointLight::new(Vec3::new(0.0, light_height, 0.0), emitter))
    }

    #[test]
    fn test_point_light_energy() {
        let (albedo, intensity, height) = (0.8, 10.0, 2.0);
        let scene = floor_scene(albedo, intensity, height);
        let mut integrator = DirectIntegrator::new(&scene, 0);

        // Straight down onto the floor below the light.
        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), -Vec3::Y, 0.0);
        let radiance = integrator.integrate(&ray);

        let d = height + 1.0;
        let expected = albedo / PI * intensity / (d * d);
        assert!((radiance - Spectrum::splat(expected)).length() < 1e-4, "{radiance} vs {expected}");
        // Primary ray and one shadow ray.
        assert_eq!(integrator.rays_traced(), 2);
    }

    #[test]
    fn test_miss_is_black() {
        let scene = floor_scene(0.8, 10.0, 2.0);
        let mut integrator = DirectIntegrator::new(&scene, 0);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        assert_eq!(integrator.integrate(&ray), Spectrum::ZERO);
    }

    #[test]
    fn test_occluder_blocks_light() {
        let mut scene = floor_scene(0.8, 10.0, 2.0);
        let blocker = scene
            .geometry
            .add(Solid::Sphere(Sphere::new(Vec3::new(0.0, 0.5, 0.0), 0.25, Default::default())));
        let floor = scene.root;
        scene.root = scene.geometry.add_aggregate(&[floor, blocker]).unwrap();

        let mut integrator = DirectIntegrator::new(&scene, 0);
        let ray = Ray::new(Vec3::new(0.0, -0.5, 3.0), Vec3::new(0.0, -0.5, -3.0), 0.0);
        assert_eq!(integrator.integrate(&ray), Spectrum::ZERO);
    }

    #[test]
    fn test_light_behind_surface_gives_nothing() {
        let scene = floor_scene(0.8, 10.0, -3.0);
        let mut integrator = DirectIntegrator::new(&scene, 0);
        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), -Vec3::Y, 0.0);
        assert_eq!(integrator.integrate(&ray), Spectrum::ZERO);
    }

    #[test]
    fn test_area_light_matches_analytic_small_light() {
        // A tiny area light approximates a point light of intensity L × A.
        let mut materials = Materials::new();
        let diffuse = materials.add(Diffuse::new(Spectrum::ONE));
        let emitter = materials.add(AreaLightMaterial::new(Spectrum::splat(1000.0)));

        let side = 0.01;
        let light_rect = Rectangle::new(
            Vec3::new(-side / 2.0, 2.0, -side / 2.0),
            Vec3::new(side, 0.0, 0.0),
            Vec3::new(0.0, 0.0, side),
            emitter,
        );
        let mut geometry = Geometry::new();
        let floor = geometry.add(Plane::new(Vec3::Y, 1.0, diffuse));
        let lamp = geometry.add(light_rect);
        let root = geometry.add_aggregate(&[floor, lamp]).unwrap();
        let scene = Scene::new(geometry, root, materials, Box::new(FixedCamera::new(4, 4)), 4, 4)
            .with_light(AreaLight::new(light_rect));

        let mut integrator = DirectIntegrator::new(&scene, 3);
        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), -Vec3::Y, 0.0);
        let radiance = integrator.integrate(&ray);

        let expected = 1.0 / PI * 1000.0 * side * side / 9.0;
        assert!((radiance.x - expected).abs() < expected * 1e-2, "{radiance} vs {expected}");

        // The lamp itself faces down and is seen from below.
        let up = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        assert_eq!(integrator.integrate(&up), Spectrum::splat(1000.0));
    }

    #[test]
    fn test_integrator_kind_serde_round_trip() {
        for kind in [
            IntegratorKind::Direct,
            IntegratorKind::default(),
            IntegratorKind::Volumetric(MediumSettings::default()),
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            let back: IntegratorKind = serde_json::from_str(&json).unwrap();
            assert_eq!(kind, back);
        }
    }
}
