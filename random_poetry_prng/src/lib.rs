// Seedable pseudo-random number generator for poem generation.
//
// xoshiro256++ (Blackman & Vigna, 2019), expanded from a single `u64` seed
// with SplitMix64. Every random decision the generator makes (rhyme class
// draws, seed-word order, candidate order during backtracking) comes from a
// `PoetryRng`, so a fixed seed reproduces a poem exactly. Callers that do
// not care about reproducibility seed from the clock via `from_clock()`.
//
// On top of the raw integer stream this crate provides the two collection
// helpers the search needs: an unbiased Fisher-Yates `shuffle` and a
// uniform `choose`.
//
// Output must be identical on every platform for a given seed. The core
// generator uses integer arithmetic only.

use std::time::{SystemTime, UNIX_EPOCH};

/// Xoshiro256++ PRNG used by every generation call.
///
/// A `PoetryRng` is cheap to clone; independent generation calls should each
/// own one rather than share a single stream across threads.
#[derive(Clone, Debug)]
pub struct PoetryRng {
    s: [u64; 4],
}

impl PoetryRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// Two instances created with the same seed produce identical sequences.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Create a PRNG seeded from the system clock (nanoseconds since the
    /// Unix epoch). Returns the seed alongside the generator so callers can
    /// log it and replay the run.
    pub fn from_clock() -> (Self, u64) {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed_5eed_5eed_5eed);
        (Self::new(seed), seed)
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform random integer in `[low, high)`.
    ///
    /// Uses rejection sampling to avoid modulo bias.
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        let threshold = range.wrapping_neg() % range;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }

    /// Generate a uniform random `usize` in `[low, high)`.
    ///
    /// Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Pick one element uniformly, or `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.range_usize(0, items.len());
        items.get(idx)
    }

    /// Shuffle a slice in place (Fisher-Yates, back to front).
    ///
    /// Every permutation is equally likely. Visiting a shuffled slice in
    /// order is sampling without replacement.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.range_usize(0, i + 1);
            items.swap(i, j);
        }
    }
}

/// SplitMix64, used only to expand a `u64` seed into the 256-bit state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
