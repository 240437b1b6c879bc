//! Single scattering in a heterogeneous medium lit by one point light.
//!
//! The primary ray is marched from the camera to the first surface. Each
//! step picks up light scattered towards the camera and loses some
//! transmittance to a scattering coefficient driven by Perlin noise.

use crate::integrator::Tracer;
use crate::noise::perlin;
use crate::{HitRecord, Integrator, Ray, Scene, Spectrum};
use lumen_math::Vec3;
use serde::{Deserialize, Serialize};

/// Which point the blocker of a march-step shadow ray is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OcclusionReference {
    /// Distance from the surface the camera ray hit
    #[default]
    SurfaceHit,
    /// Distance from the march point itself
    MarchPoint,
}

/// Constants of the participating medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediumSettings {
    /// Extinction along the path from a march point to the light
    pub extinction: f32,
    /// Scale of the light scattered towards the camera
    pub volume_emission: f32,
    /// Frequency of the noise behind the scattering coefficient
    pub noise_frequency: f32,
    /// Number of march steps between the camera and the surface
    pub steps: u32,
    pub occlusion: OcclusionReference,
}

impl Default for MediumSettings {
    fn default() -> Self {
        Self {
            extinction: 0.2,
            volume_emission: 0.005,
            noise_frequency: 20.0,
            steps: 100,
            occlusion: OcclusionReference::SurfaceHit,
        }
    }
}

impl MediumSettings {
    pub fn with_extinction(mut self, extinction: f32) -> Self {
        self.extinction = extinction;
        self
    }

    pub fn with_volume_emission(mut self, volume_emission: f32) -> Self {
        self.volume_emission = volume_emission;
        self
    }

    pub fn with_noise_frequency(mut self, noise_frequency: f32) -> Self {
        self.noise_frequency = noise_frequency;
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_occlusion(mut self, occlusion: OcclusionReference) -> Self {
        self.occlusion = occlusion;
        self
    }

    /// Scattering coefficient at `p`, roughly in [0, 0.4].
    pub fn scattering(&self, p: Vec3) -> f32 {
        (perlin(p * self.noise_frequency) + 1.0) / 5.0
    }
}

pub struct VolumetricIntegrator<'a> {
    tracer: Tracer<'a>,
    settings: MediumSettings,
}

impl<'a> VolumetricIntegrator<'a> {
    pub fn new(scene: &'a Scene, seed: u64) -> Self {
        Self {
            tracer: Tracer::new(scene, seed),
            settings: MediumSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: MediumSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &MediumSettings {
        &self.settings
    }

    /// Radiance leaving the surface towards the camera.
    fn surface_radiance(&mut self, hit: &HitRecord, time: f32) -> Spectrum {
        let material = self.tracer.scene().materials.get(hit.material);
        match material.evaluate_emission(Some(hit.normal), hit.w) {
            Some(emission) => emission,
            None => self.tracer.direct_lighting(hit, time),
        }
    }

    /// March from the ray origin to `hit`, returning the in-scattered
    /// radiance and the transmittance left at the surface.
    fn march(&mut self, ray: &Ray, hit: &HitRecord) -> (Spectrum, f32) {
        let scene = self.tracer.scene();
        let dist = ray.origin().distance(hit.position);
        let steps = self.settings.steps;
        if steps == 0 || dist == 0.0 {
            return (Spectrum::ZERO, 1.0);
        }
        let ds = dist / steps as f32;

        let light_sample = self.tracer.light_sample();
        let light = scene.lights.first().map(|light| light.sample(light_sample));

        let mut transmittance = 1.0_f32;
        let mut inscattered = Spectrum::ZERO;

        for i in 1..=steps {
            let p = ray.at_distance(i as f32 * ds);

            if let Some(light_hit) = light.as_ref().filter(|l| l.p != 0.0) {
                let to_light = light_hit.position - p;
                let d2 = to_light.length_squared();
                if let Some(light_dir) = to_light.try_normalize() {
                    let reference = match self.settings.occlusion {
                        OcclusionReference::SurfaceHit => hit.position,
                        OcclusionReference::MarchPoint => p,
                    };
                    if !self.tracer.occluded(p, reference, light_dir, d2, ray.time()) {
                        let emission = scene
                            .materials
                            .get(light_hit.material)
                            .evaluate_emission(light_hit.normal, -light_dir)
                            .unwrap_or(Spectrum::ZERO);
                        let attenuation = (-self.settings.extinction * d2.sqrt()).exp();
                        inscattered += emission
                            * (transmittance * self.settings.volume_emission * attenuation);
                    }
                }
            }

            // Large steps through dense medium would turn negative.
            transmittance *= (1.0 - self.settings.scattering(p) * ds).max(0.0);
        }

        (inscattered * ds, transmittance)
    }
}

impl Integrator for VolumetricIntegrator<'_> {
    fn integrate(&mut self, ray: &Ray) -> Spectrum {
        let Some(hit) = self.tracer.trace(ray) else {
            return Spectrum::ZERO;
        };
        let surface = self.surface_radiance(&hit, ray.time());
        let (inscattered, transmittance) = self.march(ray, &hit);
        inscattered + surface * transmittance
    }

    fn rays_traced(&self) -> u64 {
        self.tracer.rays_traced()
    }
}
