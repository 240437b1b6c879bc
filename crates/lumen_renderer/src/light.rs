//! Light sources, described by how to pick a point on them.

use crate::{MaterialId, Rectangle};
use lumen_math::Vec3;

/// A point chosen on a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    pub position: Vec3,
    /// Surface normal at the sample; `None` for point lights
    pub normal: Option<Vec3>,
    /// Emissive material of the light
    pub material: MaterialId,
    /// Area density of the sample (1 for point lights)
    pub p: f32,
}

pub trait LightGeometry: Send + Sync {
    /// Pick a point on the light from two uniform numbers in `[0, 1)`.
    fn sample(&self, sample: [f32; 2]) -> LightSample;
}

/// Light emitted from a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    position: Vec3,
    material: MaterialId,
}

impl PointLight {
    pub fn new(position: Vec3, material: MaterialId) -> Self {
        Self { position, material }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

impl LightGeometry for PointLight {
    fn sample(&self, _sample: [f32; 2]) -> LightSample {
        LightSample {
            position: self.position,
            normal: None,
            material: self.material,
            p: 1.0,
        }
    }
}

/// One-sided rectangular emitter, sampled uniformly by area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaLight {
    rect: Rectangle,
    /// 1 / area, or 0 for a degenerate rectangle
    density: f32,
}

impl AreaLight {
    pub fn new(rect: Rectangle) -> Self {
        let area = rect.area();
        let density = if area > 0.0 {
            1.0 / area
        } else {
            log::warn!("Area light at {:?} has zero area and will emit nothing", rect.corner());
            0.0
        };
        Self { rect, density }
    }

    /// The rectangle, for adding the visible emitter to the geometry.
    pub fn rectangle(&self) -> Rectangle {
        self.rect
    }
}

impl LightGeometry for AreaLight {
    fn sample(&self, [s, t]: [f32; 2]) -> LightSample {
        LightSample {
            position: self.rect.point_at(s, t),
            normal: Some(self.rect.normal()),
            material: self.rect.material(),
            p: self.density,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_sample() {
        let light = PointLight::new(Vec3::new(1.0, 2.0, 3.0), MaterialId::default());
        let s = light.sample([0.3, 0.9]);
        assert_eq!(s.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(s.normal, None);
        assert_eq!(s.p, 1.0);
    }

    #[test]
    fn test_area_light_sample_on_rectangle() {
        let rect = Rectangle::new(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.5),
            MaterialId::default(),
        );
        let light = AreaLight::new(rect);
        let s = light.sample([0.5, 0.5]);

        assert!((s.position - Vec3::new(1.0, 2.0, 0.25)).length() < 1e-5);
        assert!((s.p - 1.0).abs() < 1e-5);
        assert!((s.normal.unwrap() + Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_degenerate_area_light_has_zero_density() {
        let rect = Rectangle::new(Vec3::ZERO, Vec3::X, Vec3::X, MaterialId::default());
        assert_eq!(AreaLight::new(rect).sample([0.1, 0.1]).p, 0.0);
    }
}
