//! Seeded 2D gradient noise with fractal octave summation.
//!
//! The permutation table is shuffled by a ChaCha stream seeded from the
//! construction seed, so every field is a pure function of its seed.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const TABLE_SIZE: usize = 256;

#[derive(Clone)]
pub struct NoiseField {
    seed: u64,
    // 256 shuffled entries followed by a copy, so `perm[i + 1]` never wraps.
    perm: [u8; TABLE_SIZE * 2],
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..TABLE_SIZE).map(|i| i as u8).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        table.shuffle(&mut rng);

        let mut perm = [0u8; TABLE_SIZE * 2];
        for (i, value) in table.iter().enumerate() {
            perm[i] = *value;
            perm[i + TABLE_SIZE] = *value;
        }
        Self { seed, perm }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Single-octave noise in `[0, 1]`. Non-finite coordinates give 0.5.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        if !x.is_finite() || !y.is_finite() {
            return 0.5;
        }
        let cell_x = x.floor();
        let cell_y = y.floor();
        let xi = (cell_x as i64 & 255) as usize;
        let yi = (cell_y as i64 & 255) as usize;
        let fx = x - cell_x;
        let fy = y - cell_y;

        let u = fade(fx);
        let v = fade(fy);

        let a = self.hash(xi) + yi;
        let b = self.hash(xi + 1) + yi;
        let aa = self.hash(a);
        let ab = self.hash(a + 1);
        let ba = self.hash(b);
        let bb = self.hash(b + 1);

        let bottom = lerp(
            u,
            gradient(self.perm[aa], fx, fy),
            gradient(self.perm[ba], fx - 1.0, fy),
        );
        let top = lerp(
            u,
            gradient(self.perm[ab], fx, fy - 1.0),
            gradient(self.perm[bb], fx - 1.0, fy - 1.0),
        );
        ((lerp(v, bottom, top) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Fractal sum of `octaves` samples, frequency doubling per octave and
    /// amplitude decaying by `persistence`, normalised back into `[0, 1]`.
    pub fn octave_sample(&self, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves.max(1) {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        let value = total / max_value;
        if max_value > 0.0 && value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.5
        }
    }

    fn hash(&self, index: usize) -> usize {
        self.perm[index] as usize
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn gradient(hash: u8, x: f64, y: f64) -> f64 {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_values() {
        let a = NoiseField::new(12345);
        let b = NoiseField::new(12345);
        for i in 0..64 {
            let x = i as f64 * 0.37 - 9.0;
            let y = i as f64 * 0.11 + 3.0;
            assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..64).any(|i| {
            let x = i as f64 * 0.41 + 0.5;
            (a.sample(x, x * 0.7) - b.sample(x, x * 0.7)).abs() > 1e-9
        });
        assert!(differs);
    }

    #[test]
    fn samples_stay_in_unit_range() {
        let field = NoiseField::new(99);
        for i in -200..200 {
            let x = i as f64 * 0.173;
            let y = i as f64 * -0.291;
            let plain = field.sample(x, y);
            let fractal = field.octave_sample(x, y, 4, 0.5);
            assert!((0.0..=1.0).contains(&plain), "sample {plain} out of range");
            assert!((0.0..=1.0).contains(&fractal), "octave {fractal} out of range");
        }
    }

    #[test]
    fn non_finite_inputs_stay_in_range() {
        let field = NoiseField::new(3);
        for (x, y) in [(f64::NAN, 0.2), (1.5, f64::INFINITY), (f64::NEG_INFINITY, f64::NAN)] {
            assert_eq!(field.sample(x, y), 0.5);
            assert_eq!(field.octave_sample(x, y, 4, 0.5), 0.5);
        }
        for persistence in [f64::NAN, f64::INFINITY, -1.0] {
            let value = field.octave_sample(0.3, 0.7, 3, persistence);
            assert!((0.0..=1.0).contains(&value), "persistence {persistence} gave {value}");
        }
    }

    #[test]
    fn lattice_points_sit_at_midpoint() {
        let field = NoiseField::new(7);
        for x in -5..5 {
            for y in -5..5 {
                assert!((field.sample(x as f64, y as f64) - 0.5).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn noise_is_continuous_across_cell_edges() {
        let field = NoiseField::new(4242);
        let eps = 1e-6;
        for edge in -3..3 {
            let x = edge as f64;
            let left = field.sample(x - eps, 0.37);
            let right = field.sample(x + eps, 0.37);
            assert!((left - right).abs() < 1e-4);
        }
    }
}
