//! Smooth gradient noise for the idle shimmer.
//!
//! A classic permutation-table Perlin field evaluated along the `y = 0` line,
//! so each dot can walk its own 1D offset and get a value that drifts instead
//! of flickering.

use rand::seq::SliceRandom;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const BELOW_ONE: f32 = 1.0 - f32::EPSILON;

pub struct NoiseField {
    perm: [u8; 512],
}

impl NoiseField {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut p: Vec<u8> = (0..=255).collect();
        p.shuffle(rng);
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }
        Self { perm }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(&mut SmallRng::seed_from_u64(seed))
    }

    /// Noise at `offset`, in `[0, 1)`.
    pub fn sample(&self, offset: f32) -> f32 {
        ((self.noise2(offset, 0.0) + 1.0) * 0.5).clamp(0.0, BELOW_ONE)
    }

    fn noise2(&self, x: f32, y: f32) -> f32 {
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let x = x - xf;
        let y = y - yf;
        let u = fade(x);
        let v = fade(y);

        let a = self.perm[xi] as usize + yi;
        let b = self.perm[xi + 1] as usize + yi;

        lerp(
            v,
            lerp(u, grad(self.perm[a], x, y), grad(self.perm[b], x - 1.0, y)),
            lerp(
                u,
                grad(self.perm[a + 1], x, y - 1.0),
                grad(self.perm[b + 1], x - 1.0, y - 1.0),
            ),
        )
    }
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: u8, x: f32, y: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        0.0
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}
