//! Film: where radiance samples are accumulated.
//!
//! Samples from different worker threads can land on the same pixel, so the
//! box-filter film keeps its sums in atomics and never takes a lock.

use crate::Spectrum;
use image::{ImageResult, Rgba, RgbaImage};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

pub trait Film: Send + Sync {
    /// Add a sample at continuous image coordinates; pixel `(i, j)` covers
    /// `[i, i+1) x [j, j+1)`. Safe to call from many threads at once.
    fn add_sample(&self, x: f32, y: f32, value: Spectrum);

    fn width(&self) -> u32;

    fn height(&self) -> u32;
}

/// Each sample counts fully toward the one pixel it falls in; the pixel value
/// is the mean of its samples.
pub struct BoxFilterFilm {
    width: u32,
    height: u32,
    /// Per-channel sums stored as f32 bits
    sums: Vec<[AtomicU32; 3]>,
    counts: Vec<AtomicU32>,
}

impl BoxFilterFilm {
    pub fn new(width: u32, height: u32) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            sums: (0..n).map(|_| Default::default()).collect(),
            counts: (0..n).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    fn index(&self, i: u32, j: u32) -> usize {
        j as usize * self.width as usize + i as usize
    }

    /// Number of samples pixel `(i, j)` received.
    pub fn sample_count(&self, i: u32, j: u32) -> u32 {
        self.counts[self.index(i, j)].load(Ordering::Relaxed)
    }

    /// Mean of the samples of pixel `(i, j)`, zero if it has none.
    pub fn pixel(&self, i: u32, j: u32) -> Spectrum {
        let idx = self.index(i, j);
        let count = self.counts[idx].load(Ordering::Relaxed);
        if count == 0 {
            return Spectrum::ZERO;
        }
        let [r, g, b] = &self.sums[idx];
        let load = |a: &AtomicU32| f32::from_bits(a.load(Ordering::Relaxed));
        Spectrum::new(load(r), load(g), load(b)) / count as f32
    }

    /// 8-bit image with channels clamped to `[0, 1]`. Row 0 of the film is
    /// the bottom of the picture, so rows are flipped.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let c = self.pixel(x, self.height - 1 - y);
            Rgba(spectrum_to_rgba(c))
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.to_image().save_with_format(path, image::ImageFormat::Png)
    }
}

impl Film for BoxFilterFilm {
    fn add_sample(&self, x: f32, y: f32, value: Spectrum) {
        if !(x >= 0.0 && y >= 0.0) {
            return;
        }
        let (i, j) = (x as u32, y as u32);
        if i >= self.width || j >= self.height {
            return;
        }
        let idx = self.index(i, j);
        for (cell, v) in self.sums[idx].iter().zip(value.to_array()) {
            atomic_add_f32(cell, v);
        }
        self.counts[idx].fetch_add(1, Ordering::Relaxed);
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// Add to an f32 stored as bits with a compare-and-swap loop.
fn atomic_add_f32(cell: &AtomicU32, value: f32) {
    let mut old = cell.load(Ordering::Relaxed);
    loop {
        let new = (f32::from_bits(old) + value).to_bits();
        match cell.compare_exchange_weak(old, new, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(current) => old = current,
        }
    }
}

/// Clamp to [0, 1] and scale to bytes.
pub fn spectrum_to_rgba(color: Spectrum) -> [u8; 4] {
    let c = color.clamp(Spectrum::ZERO, Spectrum::ONE) * 255.0;
    [c.x as u8, c.y as u8, c.z as u8, 255]
}
