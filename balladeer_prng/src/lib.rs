// Deterministic, portable pseudo-random number generator.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding.
// Hand-rolled with zero external dependencies so that a given seed yields the
// same poem on every platform and compiler version.
//
// This crate is the single random source used across Balladeer: the verse
// crate draws rhyme candidates, weighted trigram continuations, and fallback
// seeds from it, and the CLI seeds one instance per generated poem. Every
// function that makes a random decision takes `&mut VerseRng`, so callers
// (and tests) decide the seed.
//
// **Critical constraint: determinism.** Every method on `VerseRng` must
// produce identical output given the same prior state. Do not read clocks,
// the OS entropy pool, or any other ambient state in this module; seeding
// from wall-clock time is the CLI's business.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG.
///
/// Cheap to clone; cloning forks an identical stream, which tests use to
/// replay a generation step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerseRng {
    s: [u64; 4],
}

impl VerseRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// Uses SplitMix64 to expand the seed into the 256-bit internal state.
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

    /// Generate a uniform `f64` in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
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
        let threshold = range.wrapping_neg() % range; // = (2^64 - range) % range
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

    /// Uniformly pick an index into a collection of `len` items.
    /// Returns `None` for an empty collection instead of panicking.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.range_usize(0, len))
        }
    }

    /// Uniformly pick one element of a slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.pick_index(items.len()).map(|i| &items[i])
    }

    /// Remove and return a uniformly chosen element. Order of the remaining
    /// elements is not preserved.
    pub fn take_random<T>(&mut self, items: &mut Vec<T>) -> Option<T> {
        self.pick_index(items.len()).map(|i| items.swap_remove(i))
    }

    /// Pick one item with probability proportional to its weight.
    ///
    /// Walks the cumulative weights in iteration order, so ties between equal
    /// weights are broken uniformly. Zero-weight items are never chosen.
    /// Returns `None` if the iterator is empty or every weight is zero.
    pub fn choose_weighted<T, I>(&mut self, items: I) -> Option<T>
    where
        I: IntoIterator<Item = (T, u64)>,
        I::IntoIter: Clone,
    {
        let items = items.into_iter();
        let total: u64 = items.clone().map(|(_, w)| w).sum();
        if total == 0 {
            return None;
        }
        let mut target = self.range_u64(0, total);
        for (item, weight) in items {
            if target < weight {
                return Some(item);
            }
            target -= weight;
        }
        None
    }
}

/// SplitMix64, used only for seeding xoshiro256++ from a single `u64`.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
