//! Material capability and the built-in materials.
//!
//! Materials live in a [`Materials`] arena and hit records refer to them by
//! [`MaterialId`], so geometry never holds references into material storage.

use crate::HitRecord;
use lumen_math::Vec3;
use std::f32::consts::PI;

/// Radiance / throughput value (RGB, non-negative channels).
pub type Spectrum = Vec3;

/// Handle to a material in a [`Materials`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialId(u32);

impl MaterialId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Outgoing direction and weight of a specular event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingSample {
    /// Direction of the continued ray, pointing away from the surface
    pub w: Vec3,
    /// Specular BRDF value the recursive radiance is multiplied with
    pub brdf: Spectrum,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// BRDF for light arriving from `wi` and leaving toward `wo`. Both point
    /// away from the surface.
    fn evaluate_brdf(&self, hit: &HitRecord, wo: Vec3, wi: Vec3) -> Spectrum;

    /// Radiance emitted toward `direction` from a point with the given
    /// normal (absent for point lights). `None` for non-emitters.
    fn evaluate_emission(&self, _normal: Option<Vec3>, _direction: Vec3) -> Option<Spectrum> {
        None
    }

    fn has_specular_reflection(&self) -> bool {
        false
    }

    fn has_specular_refraction(&self) -> bool {
        false
    }

    fn evaluate_specular_reflection(&self, _hit: &HitRecord) -> Option<ShadingSample> {
        None
    }

    /// `None` signals total internal reflection.
    fn evaluate_specular_refraction(&self, _hit: &HitRecord) -> Option<ShadingSample> {
        None
    }

    fn casts_shadows(&self) -> bool {
        true
    }
}

/// Append-only material storage. Slot 0 always holds a white diffuse
/// material, which is what [`MaterialId::default`] refers to.
pub struct Materials {
    items: Vec<Box<dyn Material>>,
}

impl Materials {
    pub fn new() -> Self {
        Self {
            items: vec![Box::new(Diffuse::new(Spectrum::ONE))],
        }
    }

    /// Store a material and return its handle.
    pub fn add(&mut self, material: impl Material + 'static) -> MaterialId {
        self.items.push(Box::new(material));
        MaterialId((self.items.len() - 1) as u32)
    }

    /// Look up a material. Panics on a handle from another arena.
    pub fn get(&self, id: MaterialId) -> &dyn Material {
        &*self.items[id.index()]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Materials {
    fn default() -> Self {
        Self::new()
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Diffuse {
    albedo: Spectrum,
}

impl Diffuse {
    /// Create a new diffuse material with the given albedo.
    pub fn new(albedo: Spectrum) -> Self {
        Self {
            albedo: albedo.max(Spectrum::ZERO),
        }
    }
}

impl Material for Diffuse {
    fn evaluate_brdf(&self, _hit: &HitRecord, _wo: Vec3, _wi: Vec3) -> Spectrum {
        self.albedo / PI
    }
}

/// Perfect mirror.
#[derive(Debug, Clone)]
pub struct Mirror {
    reflectance: Spectrum,
}

impl Mirror {
    pub fn new(reflectance: Spectrum) -> Self {
        Self { reflectance }
    }
}

impl Material for Mirror {
    fn evaluate_brdf(&self, _hit: &HitRecord, _wo: Vec3, _wi: Vec3) -> Spectrum {
        Spectrum::ZERO
    }

    fn has_specular_reflection(&self) -> bool {
        true
    }

    fn evaluate_specular_reflection(&self, hit: &HitRecord) -> Option<ShadingSample> {
        Some(ShadingSample {
            w: reflect(hit.w, hit.normal),
            brdf: self.reflectance,
        })
    }
}

/// Dielectric (glass) material with Fresnel-weighted reflection and
/// refraction.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

/// Incident geometry at a dielectric interface, oriented so `normal` is on
/// the same side as `w`.
struct Interface {
    normal: Vec3,
    cos_i: f32,
    eta: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    fn interface(&self, hit: &HitRecord) -> Interface {
        let cos = hit.normal.dot(hit.w);
        if cos >= 0.0 {
            Interface {
                normal: hit.normal,
                cos_i: cos,
                eta: 1.0 / self.ior,
            }
        } else {
            Interface {
                normal: -hit.normal,
                cos_i: -cos,
                eta: self.ior,
            }
        }
    }

    /// Squared sine of the transmitted angle; above 1 means TIR.
    fn sin2_t(iface: &Interface) -> f32 {
        iface.eta * iface.eta * (1.0 - iface.cos_i * iface.cos_i).max(0.0)
    }

    /// Schlick's approximation for reflectance
    fn reflectance(&self, iface: &Interface) -> f32 {
        let sin2_t = Self::sin2_t(iface);
        if sin2_t > 1.0 {
            return 1.0;
        }
        // Schlick uses the angle on the less dense side.
        let cosine = if iface.eta > 1.0 {
            (1.0 - sin2_t).sqrt()
        } else {
            iface.cos_i
        };
        let r0 = ((1.0 - self.ior) / (1.0 + self.ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn evaluate_brdf(&self, _hit: &HitRecord, _wo: Vec3, _wi: Vec3) -> Spectrum {
        Spectrum::ZERO
    }

    fn has_specular_reflection(&self) -> bool {
        true
    }

    fn has_specular_refraction(&self) -> bool {
        true
    }

    fn evaluate_specular_reflection(&self, hit: &HitRecord) -> Option<ShadingSample> {
        let iface = self.interface(hit);
        Some(ShadingSample {
            w: reflect(hit.w, iface.normal),
            brdf: Spectrum::splat(self.reflectance(&iface)),
        })
    }

    fn evaluate_specular_refraction(&self, hit: &HitRecord) -> Option<ShadingSample> {
        let iface = self.interface(hit);
        let sin2_t = Self::sin2_t(&iface);
        if sin2_t > 1.0 {
            return None;
        }
        let cos_t = (1.0 - sin2_t).sqrt();
        let w = (-iface.eta * hit.w + (iface.eta * iface.cos_i - cos_t) * iface.normal).normalize();
        Some(ShadingSample {
            w,
            brdf: Spectrum::splat(1.0 - self.reflectance(&iface)),
        })
    }
}

/// Emission of a point light. Radiates the same intensity in every direction.
#[derive(Debug, Clone)]
pub struct PointLightMaterial {
    emission: Spectrum,
}

impl PointLightMaterial {
    pub fn new(emission: Spectrum) -> Self {
        Self { emission }
    }
}

impl Material for PointLightMaterial {
    fn evaluate_brdf(&self, _hit: &HitRecord, _wo: Vec3, _wi: Vec3) -> Spectrum {
        Spectrum::ZERO
    }

    fn evaluate_emission(&self, _normal: Option<Vec3>, _direction: Vec3) -> Option<Spectrum> {
        Some(self.emission)
    }
}

/// One-sided emitter for area lights. Light geometry never blocks its own
/// shadow rays.
#[derive(Debug, Clone)]
pub struct AreaLightMaterial {
    emission: Spectrum,
}

impl AreaLightMaterial {
    pub fn new(emission: Spectrum) -> Self {
        Self { emission }
    }
}

impl Material for AreaLightMaterial {
    fn evaluate_brdf(&self, _hit: &HitRecord, _wo: Vec3, _wi: Vec3) -> Spectrum {
        Spectrum::ZERO
    }

    fn evaluate_emission(&self, normal: Option<Vec3>, direction: Vec3) -> Option<Spectrum> {
        match normal {
            Some(n) if n.dot(direction) <= 0.0 => Some(Spectrum::ZERO),
            _ => Some(self.emission),
        }
    }

    fn casts_shadows(&self) -> bool {
        false
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Mirror `w` (pointing away from the surface) about the normal.
#[inline]
pub fn reflect(w: Vec3, n: Vec3) -> Vec3 {
    2.0 * w.dot(n) * n - w
}
