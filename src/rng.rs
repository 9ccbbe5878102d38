//! Randomness used by every probabilistic rule.
//!
//! The rules only ever talk to [`Dice`], so a run can be driven by the seeded
//! [`GameRng`] or replayed from a fixed list of rolls with [`LoadedDice`].

use std::collections::VecDeque;

use bracket_random::prelude::RandomNumberGenerator;
use serde::{Deserialize, Serialize};

/// Integer sampling service.
pub trait Dice {
    /// Uniform value in `min..=max`. A range with `max < min` collapses to `min`.
    fn roll(&mut self, min: i32, max: i32) -> i32;

    /// Fair coin. `true` on the upper face.
    fn coin(&mut self) -> bool {
        self.roll(0, 1) == 1
    }

    /// Index in `0..len`, or 0 for an empty collection.
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.roll(0, len as i32 - 1) as usize
    }
}

/// Seeded generator backing normal play.
pub struct GameRng {
    rng: RandomNumberGenerator,
    seed: u64,
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: RandomNumberGenerator::seeded(seed),
            seed,
        }
    }
}

impl std::fmt::Debug for GameRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameRng").field("seed", &self.seed).finish()
    }
}

impl Dice for GameRng {
    fn roll(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.range(min, max + 1)
    }
}

/// Replays queued rolls, clamped into whatever range is asked for. A range
/// holding a single value is answered without consuming a roll, same as
/// [`GameRng`].
///
/// Once the queue runs dry the fallback generator takes over; without one
/// every further roll returns the lower bound.
#[derive(Debug, Default)]
pub struct LoadedDice {
    rolls: VecDeque<i32>,
    fallback: Option<GameRng>,
}

impl LoadedDice {
    pub fn new<I: IntoIterator<Item = i32>>(rolls: I) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback: None,
        }
    }

    pub fn then(mut self, fallback: GameRng) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for LoadedDice {
    fn roll(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        match self.rolls.pop_front() {
            Some(value) => value.clamp(min, max),
            None => match self.fallback.as_mut() {
                Some(rng) => rng.roll(min, max),
                None => min,
            },
        }
    }
}

/// Inclusive range loaded from rule files.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: i32,
    pub max: i32,
}

impl Span {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn roll(&self, dice: &mut dyn Dice) -> i32 {
        dice.roll(self.min, self.max)
    }
}

/// `max(1, value * percent / 100)`, the damage formula shared by bites,
/// touches and traps.
pub fn percent_of(value: i32, percent: i32) -> i32 {
    (value * percent / 100).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_stays_inside_inclusive_bounds() {
        let mut rng = GameRng::seeded(42);
        for _ in 0..1000 {
            let n = rng.roll(5, 10);
            assert!((5..=10).contains(&n));
        }
    }

    #[test]
    fn both_ends_are_reachable() {
        let mut rng = GameRng::seeded(7);
        let rolls: Vec<i32> = (0..500).map(|_| rng.roll(0, 1)).collect();
        assert!(rolls.contains(&0));
        assert!(rolls.contains(&1));
    }

    #[test]
    fn inverted_range_collapses_to_min() {
        let mut rng = GameRng::seeded(1);
        assert_eq!(rng.roll(9, 3), 9);
        assert_eq!(rng.roll(4, 4), 4);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = GameRng::seeded(42);
        let mut b = GameRng::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.roll(0, 100), b.roll(0, 100));
        }
    }

    #[test]
    fn loaded_dice_replay_then_clamp() {
        let mut dice = LoadedDice::new([3, 99, -5]);
        assert_eq!(dice.roll(0, 4), 3);
        assert_eq!(dice.roll(0, 4), 4);
        assert_eq!(dice.roll(0, 4), 0);
        assert_eq!(dice.roll(2, 6), 2);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn fixed_range_does_not_consume() {
        let mut dice = LoadedDice::new([4]);
        assert_eq!(dice.roll(3, 3), 3);
        assert_eq!(dice.roll(9, 1), 9);
        assert_eq!(dice.remaining(), 1);
    }

    #[test]
    fn loaded_dice_falls_back_to_generator() {
        let mut dice = LoadedDice::new([1]).then(GameRng::seeded(3));
        assert_eq!(dice.roll(0, 9), 1);
        for _ in 0..50 {
            assert!((0..=9).contains(&dice.roll(0, 9)));
        }
    }

    #[test]
    fn pick_handles_empty() {
        let mut dice = LoadedDice::new([2]);
        assert_eq!(dice.pick(0), 0);
        assert_eq!(dice.pick(5), 2);
    }

    #[test]
    fn percent_never_below_one() {
        assert_eq!(percent_of(20, 1), 1);
        assert_eq!(percent_of(20, 15), 3);
        assert_eq!(percent_of(100, 3), 3);
        assert_eq!(percent_of(0, 15), 1);
    }
}
