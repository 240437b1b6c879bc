//! 3-D gradient noise (Perlin's improved noise with a hashed lattice).
//!
//! Drives the density of the participating medium in the volumetric
//! integrator.

use lumen_math::Vec3;

/// Noise value in roughly `[-1, 1]` at `p`. Zero on every integer lattice
/// point.
pub fn perlin(p: Vec3) -> f32 {
    let cell = p.floor();
    let (xi, yi, zi) = (cell.x as i32, cell.y as i32, cell.z as i32);
    let f = p - cell;

    let u = fade(f.x);
    let v = fade(f.y);
    let w = fade(f.z);

    let corner = |dx: i32, dy: i32, dz: i32| {
        grad(
            hash(xi + dx, yi + dy, zi + dz),
            f.x - dx as f32,
            f.y - dy as f32,
            f.z - dz as f32,
        )
    };

    lerp(
        lerp(
            lerp(corner(0, 0, 0), corner(1, 0, 0), u),
            lerp(corner(0, 1, 0), corner(1, 1, 0), u),
            v,
        ),
        lerp(
            lerp(corner(0, 0, 1), corner(1, 0, 1), u),
            lerp(corner(0, 1, 1), corner(1, 1, 1), u),
            v,
        ),
        w,
    )
}

#[inline(always)]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline(always)]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[inline(always)]
fn hash(x: i32, y: i32, z: i32) -> u32 {
    let mut h = x as u32;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= y as u32;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= z as u32;
    h = h.wrapping_mul(0x27D4_EB2D);
    h ^= h >> 16;
    h
}

/// Dot product with one of the twelve cube-edge gradients.
#[inline(always)]
fn grad(hash: u32, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}
