//! Whitted-style ray tracing: direct lighting on diffuse surfaces, recursive
//! rays for mirrors and glass.

use crate::integrator::{Tracer, DEFAULT_MAX_DEPTH};
use crate::{Integrator, Ray, Scene, Spectrum};

pub struct WhittedIntegrator<'a> {
    tracer: Tracer<'a>,
    max_depth: u32,
}

impl<'a> WhittedIntegrator<'a> {
    pub fn new(scene: &'a Scene, seed: u64) -> Self {
        Self {
            tracer: Tracer::new(scene, seed),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the number of specular bounces after which paths are cut off.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Integrator for WhittedIntegrator<'_> {
    fn integrate(&mut self, ray: &Ray) -> Spectrum {
        let Some(hit) = self.tracer.trace(ray) else {
            return Spectrum::ZERO;
        };
        let material = self.tracer.scene().materials.get(hit.material);

        if let Some(emission) = material.evaluate_emission(Some(hit.normal), hit.w) {
            return emission;
        }

        let reflects = material.has_specular_reflection();
        let refracts = material.has_specular_refraction();
        if !reflects && !refracts {
            return self.tracer.direct_lighting(&hit, ray.time());
        }

        // Specular surfaces past the depth limit are truncated to black.
        if ray.depth() >= self.max_depth {
            return Spectrum::ZERO;
        }

        let mut outgoing = Spectrum::ZERO;
        let bounces = [
            reflects.then(|| material.evaluate_specular_reflection(&hit)).flatten(),
            // None here is total internal reflection
            refracts.then(|| material.evaluate_specular_refraction(&hit)).flatten(),
        ];
        for sample in bounces.into_iter().flatten() {
            let next = Ray::offset(hit.position, sample.w, ray.time(), ray.depth() + 1);
            outgoing += sample.brdf * self.integrate(&next);
        }
        outgoing
    }

    fn rays_traced(&self) -> u64 {
        self.tracer.rays_traced()
    }
}
