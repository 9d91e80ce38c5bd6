//! Deterministic RNG for scenario setup.
//!
//! Steering itself is deterministic and never draws random numbers.  `SimRng`
//! exists for the code around it: scattering agents at startup, shuffling
//! neighbor lists in tests, jittering demo spawn points.  The same seed always
//! produces the same crowd.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Vec3;

/// Simulation-level RNG.
///
/// Used only in single-threaded setup code.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// A point uniformly distributed in the axis-aligned box `[min, max)`.
    ///
    /// Axes where `min == max` are returned as-is (flat crowds keep `y`).
    pub fn point_in_box(&mut self, min: Vec3, max: Vec3) -> Vec3 {
        let mut axis = |lo: f32, hi: f32| if hi > lo { self.0.gen_range(lo..hi) } else { lo };
        let x = axis(min.x, max.x);
        let y = axis(min.y, max.y);
        let z = axis(min.z, max.z);
        Vec3::new(x, y, z)
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }
}
