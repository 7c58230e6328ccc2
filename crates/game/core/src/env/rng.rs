//! Seedable pseudo-random generator for every roll in a battle.
//!
//! The generator is sfc32 (Small Fast Counting, 32-bit). Its state is four
//! `u32` words held in an immutable [`RngState`]. Every draw consumes a
//! state and returns the advanced one next to the value, so a state can
//! never be reused by accident.
//!
//! # Determinism
//!
//! Only wrapping 32-bit integer arithmetic is used to advance the state, so
//! a seed produces the same stream on every platform. The float output is
//! `t / 2^32`, which is exact in `f64`.

/// Seed mixing constants, one per state word.
const SEED_CONSTANTS: [u32; 4] = [0x9e37_79b9, 0x85eb_ca6b, 0xc2b2_ae35, 0x27d4_eb2f];

/// Multiplier of the integer hash used for seed mixing.
const HASH_MULTIPLIER: u32 = 0x045d_9f3b;

/// Draws discarded right after seeding so that nearby seeds diverge.
const WARMUP_DRAWS: usize = 12;

/// Scale from a `u32` to `[0, 1)`.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Internal state of the sfc32 generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RngState {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
}

impl RngState {
    /// Derives a warmed-up state from a 32-bit seed.
    pub fn from_seed(seed: u32) -> Self {
        let [ka, kb, kc, kd] = SEED_CONSTANTS;
        let mut state = Self {
            a: hash_mix(seed, ka),
            b: hash_mix(seed, kb),
            c: hash_mix(seed, kc),
            d: hash_mix(seed, kd),
        };
        for _ in 0..WARMUP_DRAWS {
            state = state.next().1;
        }
        state
    }

    /// Draws a value in `[0, 1)`.
    ///
    /// # Formula
    ///
    /// ```text
    /// t = a + b + d
    /// d = d + 1
    /// a = b ^ (b >> 9)
    /// b = c + (c << 3)
    /// c = rotl(c, 21) + t
    /// value = t / 2^32
    /// ```
    #[must_use]
    pub fn next(self) -> (f64, Self) {
        let t = self.a.wrapping_add(self.b).wrapping_add(self.d);
        let next = Self {
            a: self.b ^ (self.b >> 9),
            b: self.c.wrapping_add(self.c << 3),
            c: self.c.rotate_left(21).wrapping_add(t),
            d: self.d.wrapping_add(1),
        };
        (f64::from(t) / TWO_POW_32, next)
    }

    /// Draws an integer in `[min, max]` inclusive.
    ///
    /// Always consumes one draw; yields `min` when `max <= min`.
    #[must_use]
    pub fn range(self, min: i64, max: i64) -> (i64, Self) {
        let (value, next) = self.next();
        if max <= min {
            return (min, next);
        }
        let span = (max - min + 1) as f64;
        (min + (value * span).floor() as i64, next)
    }

    /// Returns `true` with probability `p`.
    #[must_use]
    pub fn chance(self, p: f64) -> (bool, Self) {
        let (value, next) = self.next();
        (value < p, next)
    }

    /// Picks a uniformly random element.
    ///
    /// An empty slice yields `None` and leaves the state untouched.
    #[must_use]
    pub fn pick<T>(self, items: &[T]) -> (Option<&T>, Self) {
        if items.is_empty() {
            return (None, self);
        }
        let (value, next) = self.next();
        let index = ((value * items.len() as f64).floor() as usize).min(items.len() - 1);
        (items.get(index), next)
    }
}

/// 32-bit integer hash used to spread a seed over the state words.
fn hash_mix(seed: u32, key: u32) -> u32 {
    let mut h = seed.wrapping_add(key);
    h = (h ^ (h >> 16)).wrapping_mul(HASH_MULTIPLIER);
    h = (h ^ (h >> 13)).wrapping_mul(HASH_MULTIPLIER);
    h ^ (h >> 16)
}

/// Stateful convenience wrapper that threads an [`RngState`] through a
/// sequence of draws.
///
/// Factories that roll several values in a row use this instead of passing
/// states by hand. [`SeededRandom::state`] hands the current state back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeededRandom {
    state: RngState,
}

impl SeededRandom {
    pub fn new(seed: u32) -> Self {
        Self {
            state: RngState::from_seed(seed),
        }
    }

    pub fn from_state(state: RngState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> RngState {
        self.state
    }

    pub fn next(&mut self) -> f64 {
        let (value, next) = self.state.next();
        self.state = next;
        value
    }

    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        let (value, next) = self.state.range(min, max);
        self.state = next;
        value
    }

    pub fn chance(&mut self, p: f64) -> bool {
        let (hit, next) = self.state.chance(p);
        self.state = next;
        hit
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let (item, next) = self.state.pick(items);
        self.state = next;
        item
    }

    /// Fisher-Yates shuffle, drawing one value per position.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.range(0, i as i64) as usize;
            items.swap(i, j);
        }
    }
}

impl From<RngState> for SeededRandom {
    fn from(state: RngState) -> Self {
        Self::from_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_yields_identical_stream() {
        let mut left = SeededRandom::new(12345);
        let mut right = SeededRandom::new(12345);
        for _ in 0..1000 {
            assert_eq!(left.next().to_bits(), right.next().to_bits());
        }
    }

    #[test]
    fn next_does_not_mutate_input() {
        let state = RngState::from_seed(7);
        let copy = state;
        let (first, _) = state.next();
        let (second, _) = state.next();
        assert_eq!(state, copy);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let mut rng = SeededRandom::new(99);
        for _ in 0..10_000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = RngState::from_seed(1).next().0;
        let b = RngState::from_seed(2).next().0;
        assert_ne!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn range_is_inclusive_and_bounded() {
        let mut rng = SeededRandom::new(42);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2000 {
            let v = rng.range(1, 6);
            assert!((1..=6).contains(&v));
            seen_min |= v == 1;
            seen_max |= v == 6;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn degenerate_range_still_consumes_a_draw() {
        let state = RngState::from_seed(3);
        let (_, after_draw) = state.next();

        let (v, next) = state.range(5, 5);
        assert_eq!(v, 5);
        assert_eq!(next, after_draw);

        let (v, next) = state.range(9, 2);
        assert_eq!(v, 9);
        assert_eq!(next, after_draw);
    }

    #[test]
    fn chance_extremes() {
        let mut rng = SeededRandom::new(5);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn pick_on_empty_slice_is_none() {
        let state = RngState::from_seed(8);
        let empty: [u8; 0] = [];
        let (item, next) = state.pick(&empty);
        assert!(item.is_none());
        assert_eq!(next, state);
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut rng = SeededRandom::new(11);
        let mut items = [1, 2, 3, 4, 5, 6, 7, 8];
        rng.shuffle(&mut items);
        let mut sorted = items;
        sorted.sort_unstable();
        assert_eq!(sorted, [1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
