//! Deterministic RNG based on splitmix64. Anything that consumes randomness
//! takes a `RandomSource` so tests can script the sequence.

#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Source of uniformly distributed integers.
pub trait RandomSource {
    /// Returns a value in `[0, n)`. Returns 0 when `n == 0`.
    fn uniform_int(&mut self, n: usize) -> usize;
}

/// Simple sequential RNG for direction picks.
#[derive(Clone, Debug)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = splitmix64(self.state);
        self.state
    }

    pub fn range_usize(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % max as u64) as usize
    }
}

impl RandomSource for Rng {
    fn uniform_int(&mut self, n: usize) -> usize {
        self.range_usize(n)
    }
}
