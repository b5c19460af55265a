//! Mersenne-Twister style generator used to scatter scenario boids.
//!
//! Twists one state word per draw instead of regenerating the whole block,
//! and its output tempering ends with `y ^ (y >> 1)`. Sequences therefore
//! differ from MT19937 after seeding, but are fully reproducible.

use rand::{RngCore, SeedableRng};

use crate::error::{FlockError, FlockResult};

const STATE_SIZE: usize = 624;
const SHIFT_SIZE: usize = 397;
const INIT_MULTIPLIER: u32 = 1_812_433_253;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;
const TEMPER_B: u32 = 0x9d2c_5680;
const TEMPER_C: u32 = 0xefc6_0000;

#[derive(Clone)]
pub struct MersenneTwister {
    state: [u32; STATE_SIZE],
    index: usize,
}

impl MersenneTwister {
    pub fn new(seed: u32) -> Self {
        let mut state = [0u32; STATE_SIZE];
        state[0] = seed;
        for i in 1..STATE_SIZE {
            let prev = state[i - 1];
            state[i] = INIT_MULTIPLIER
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        Self { state, index: 0 }
    }

    /// Uniform value in `min..=max`, by modulo reduction.
    pub fn range(&mut self, min: u32, max: u32) -> FlockResult<u32> {
        if min > max {
            return Err(FlockError::EmptyRange { min, max });
        }
        let span = u64::from(max - min) + 1;
        let offset = u64::from(self.next_u32()) % span;
        // offset < span <= 2^32, so it fits
        Ok(min + offset as u32)
    }

    fn twist(&mut self) -> u32 {
        let k = self.index;
        let next = (k + 1) % STATE_SIZE;
        let far = (k + SHIFT_SIZE) % STATE_SIZE;

        let x = (self.state[k] & UPPER_MASK) | (self.state[next] & LOWER_MASK);
        let mut x_a = x >> 1;
        if x & 1 != 0 {
            x_a ^= MATRIX_A;
        }

        let word = self.state[far] ^ x_a;
        self.state[k] = word;
        self.index = next;
        word
    }
}

impl std::fmt::Debug for MersenneTwister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MersenneTwister")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl RngCore for MersenneTwister {
    fn next_u32(&mut self) -> u32 {
        let x = self.twist();
        let mut y = x ^ (x >> 11);
        y ^= (y << 7) & TEMPER_B;
        y ^= (y << 15) & TEMPER_C;
        y ^ (y >> 1)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_u32());
        let hi = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for MersenneTwister {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as u32)
    }
}
