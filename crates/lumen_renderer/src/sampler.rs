//! Sample generators.
//!
//! A sampler hands out `count` points in `[0, 1)^dims`. Every render task owns
//! its own sampler, seeded from the task's position, so images are
//! reproducible regardless of thread scheduling.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub trait Sampler: Send {
    /// `count` samples with `dims` coordinates each.
    fn make_samples(&mut self, count: usize, dims: usize) -> Vec<Vec<f32>>;
}

/// Independent uniform random samples.
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for RandomSampler {
    fn make_samples(&mut self, count: usize, dims: usize) -> Vec<Vec<f32>> {
        (0..count)
            .map(|_| (0..dims).map(|_| self.rng.gen::<f32>()).collect())
            .collect()
    }
}

/// Every coordinate is 0.5: one ray through the pixel centre.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneSampler;

impl Sampler for OneSampler {
    fn make_samples(&mut self, count: usize, dims: usize) -> Vec<Vec<f32>> {
        vec![vec![0.5; dims]; count]
    }
}

/// Jittered strata per dimension, shuffled independently across samples
/// (Latin hypercube).
pub struct StratifiedSampler {
    rng: StdRng,
}

impl StratifiedSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for StratifiedSampler {
    fn make_samples(&mut self, count: usize, dims: usize) -> Vec<Vec<f32>> {
        let mut samples = vec![vec![0.0; dims]; count];
        let mut strata: Vec<usize> = (0..count).collect();
        for d in 0..dims {
            strata.shuffle(&mut self.rng);
            for (sample, &stratum) in samples.iter_mut().zip(&strata) {
                let jitter: f32 = self.rng.gen();
                // Clamp below 1 against rounding in the division.
                sample[d] = ((stratum as f32 + jitter) / count as f32).min(1.0 - f32::EPSILON);
            }
        }
        samples
    }
}

/// Which sampler each render task gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SamplerKind {
    #[default]
    Random,
    One,
    Stratified,
}

impl SamplerKind {
    pub fn make(self, seed: u64) -> Box<dyn Sampler> {
        match self {
            SamplerKind::Random => Box::new(RandomSampler::new(seed)),
            SamplerKind::One => Box::new(OneSampler),
            SamplerKind::Stratified => Box::new(StratifiedSampler::new(seed)),
        }
    }
}
