//! Cameras turn pixel coordinates plus a sample into primary rays.
//!
//! Pixel `(i, j)` covers the square `[i, i+1] x [j, j+1]` of the image
//! plane, with `j = 0` the bottom row.

use crate::Ray;
use lumen_math::{Mat4, Vec3, Vec4};

pub trait Camera: Send + Sync {
    /// Primary ray through pixel `(i, j)`. `sample` holds the sub-pixel
    /// offset in its first two entries and, optionally, a time in the third.
    fn make_world_space_ray(&self, i: u32, j: u32, sample: &[f32]) -> Ray;
}

fn sub_pixel(sample: &[f32]) -> (f32, f32, f32) {
    let at = |k: usize, default: f32| sample.get(k).copied().unwrap_or(default);
    (at(0, 0.5), at(1, 0.5), at(2, 0.0))
}

/// Perspective camera.
#[derive(Debug, Clone)]
pub struct PinholeCamera {
    width: u32,
    height: u32,

    // Camera positioning
    eye: Vec3,
    look_at: Vec3,
    up: Vec3,

    /// Vertical field of view in degrees
    fov: f32,
    /// Width / height of the image plane
    aspect: f32,

    /// Viewport-to-world matrix (set by `rebuild`)
    viewport_to_world: Mat4,
}

impl PinholeCamera {
    /// Camera at the origin looking down −Z with a 60° field of view.
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            width,
            height,
            eye: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            fov: 60.0,
            aspect: width as f32 / height.max(1) as f32,
            viewport_to_world: Mat4::IDENTITY,
        };
        camera.rebuild();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, eye: Vec3, look_at: Vec3, up: Vec3) -> Self {
        self.eye = eye;
        self.look_at = look_at;
        self.up = up;
        self.rebuild();
        self
    }

    /// Set the vertical field of view (degrees) and aspect ratio.
    pub fn with_lens(mut self, fov: f32, aspect: f32) -> Self {
        self.fov = fov;
        self.aspect = aspect;
        self.rebuild();
        self
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    fn rebuild(&mut self) {
        // Camera basis vectors
        let w = (self.eye - self.look_at).normalize();
        let u = self.up.cross(w).normalize();
        let v = w.cross(u);
        let camera_to_world = Mat4::from_cols(
            u.extend(0.0),
            v.extend(0.0),
            w.extend(0.0),
            self.eye.extend(1.0),
        );

        // Viewport [0, width] x [0, height] on the plane z = -1
        let t = (self.fov.to_radians() / 2.0).tan();
        let r = self.aspect * t;
        let viewport = Mat4::from_cols(
            Vec4::new(2.0 * r / self.width as f32, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * t / self.height as f32, 0.0, 0.0),
            Vec4::new(r, t, 1.0, 0.0),
            Vec4::W,
        );

        self.viewport_to_world = camera_to_world * viewport;
    }
}

impl Camera for PinholeCamera {
    fn make_world_space_ray(&self, i: u32, j: u32, sample: &[f32]) -> Ray {
        let (sx, sy, time) = sub_pixel(sample);
        let d = self.viewport_to_world * Vec4::new(i as f32 + sx, j as f32 + sy, -1.0, 1.0);
        Ray::new(self.eye, d.truncate() - self.eye, time)
    }
}

/// Camera at the origin looking down −Z; the image covers `[-1, 1]²` of the
/// plane z = −1 (a 90° field of view for square images).
#[derive(Debug, Clone, Copy)]
pub struct FixedCamera {
    width: u32,
    height: u32,
}

impl FixedCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Camera for FixedCamera {
    fn make_world_space_ray(&self, i: u32, j: u32, sample: &[f32]) -> Ray {
        let (sx, sy, time) = sub_pixel(sample);
        let x = (i as f32 + sx) / self.width as f32 * 2.0 - 1.0;
        let y = (j as f32 + sy) / self.height as f32 * 2.0 - 1.0;
        Ray::new(Vec3::ZERO, Vec3::new(x, y, -1.0), time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_ray_points_at_look_at() {
        let camera = PinholeCamera::new(100, 100)
            .with_position(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(60.0, 1.0);

        let ray = camera.make_world_space_ray(50, 50, &[0.0, 0.0]);
        assert_eq!(ray.origin(), Vec3::new(0.0, 0.0, 3.0));
        let dir = ray.direction().normalize();
        assert!((dir - -Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_corner_rays_span_field_of_view() {
        let camera = PinholeCamera::new(64, 32).with_lens(90.0, 2.0);

        // Bottom-left corner of the image plane.
        let ray = camera.make_world_space_ray(0, 0, &[0.0, 0.0]);
        assert!((ray.direction() - Vec3::new(-2.0, -1.0, -1.0)).length() < 1e-5);

        // Top-right corner.
        let ray = camera.make_world_space_ray(63, 31, &[1.0, 1.0]);
        assert!((ray.direction() - Vec3::new(2.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_time_from_third_sample() {
        let camera = PinholeCamera::new(10, 10);
        assert_eq!(camera.make_world_space_ray(1, 1, &[0.5, 0.5, 0.75]).time(), 0.75);
        assert_eq!(camera.make_world_space_ray(1, 1, &[0.5, 0.5]).time(), 0.0);
    }

    #[test]
    fn test_fixed_camera_centre() {
        let camera = FixedCamera::new(2, 2);
        let ray = camera.make_world_space_ray(1, 1, &[0.0, 0.0]);
        assert_eq!(ray.direction(), Vec3::new(0.0, 0.0, -1.0));
    }
}
