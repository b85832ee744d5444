//! Seeded linear-congruential shuffle for the group forming attempts.
//!
//! Every attempt reorders the entrants with the same generator and seed,
//! so formation is reproducible run to run.

use rand::{Error, RngCore, SeedableRng};

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

/// Classic `(state * 9301 + 49297) % 233280` generator.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Advance and return the new state, always below the modulus.
    fn step(&mut self) -> u64 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.state
    }

    /// Uniform index in `0..bound` scaled from the current state.
    fn below(&mut self, bound: usize) -> usize {
        let state = self.step();
        (state * bound as u64 / MODULUS) as usize
    }
}

/// Draws are scaled from `0..MODULUS` onto the full `u32` range, so callers
/// going through `rand` see every bit in use.
impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        ((self.step() << 32) / MODULUS) as u32
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seed_from_u64(u64::from_le_bytes(seed))
    }

    /// The state is the seed itself, reduced into range.
    fn seed_from_u64(state: u64) -> Self {
        Self {
            state: state % MODULUS,
        }
    }
}

/// Fisher-Yates from the back, drawing from an [`Lcg`] seeded with `seed`.
pub fn shuffled<T: Clone>(items: &[T], seed: u64) -> Vec<T> {
    let mut out = items.to_vec();
    let mut rng = Lcg::seed_from_u64(seed);
    for i in (1..out.len()).rev() {
        let j = rng.below(i + 1);
        out.swap(i, j);
    }
    out
}
