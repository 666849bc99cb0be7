//! Difficulty schedule and anti-streak fairness.
//!
//! Model
//! - `DifficultyBag` holds `k` copies of each level and is drawn without
//!   replacement; it refills to full composition as soon as it runs empty.
//!   Every cycle of `3k` draws therefore shows each level exactly `k` times,
//!   in a uniformly random order.
//! - `DifficultyBands` maps a level to a count-distance band
//!   `[min, min + choices)`; bands are disjoint and ordered easy > medium > hard,
//!   so `classify` can map a distance back to at most one level.
//! - `FairnessState` (see `fairness`) caps runs of the same correct side.

mod fairness;

pub use fairness::{FairnessState, Side, Verdict};

use crate::error::{Result, StimulusError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Easy => "EASY",
            Level::Medium => "MEDIUM",
            Level::Hard => "HARD",
        };
        f.write_str(s)
    }
}

/// Replenishing multiset of difficulty levels.
#[derive(Clone, Debug)]
pub struct DifficultyBag {
    copies: u32,
    remaining: Vec<Level>,
}

impl DifficultyBag {
    /// Errors with `Configuration` when `copies == 0`.
    pub fn new(copies: u32) -> Result<Self> {
        if copies == 0 {
            return Err(StimulusError::config(
                "difficulty bag needs at least one copy per level",
            ));
        }
        let mut bag = Self {
            copies,
            remaining: Vec::with_capacity(3 * copies as usize),
        };
        bag.refill();
        Ok(bag)
    }

    fn refill(&mut self) {
        self.remaining.clear();
        for _ in 0..self.copies {
            self.remaining.extend_from_slice(&Level::ALL);
        }
    }

    /// Remove one uniformly random level; refill once the bag is empty.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Level {
        let idx = rng.gen_range(0..self.remaining.len());
        let level = self.remaining.swap_remove(idx);
        if self.remaining.is_empty() {
            self.refill();
            trace!(capacity = self.capacity(), "difficulty bag refilled");
        }
        level
    }

    /// Levels still in the bag for the current cycle.
    pub fn remaining(&self) -> &[Level] {
        &self.remaining
    }

    pub fn capacity(&self) -> usize {
        3 * self.copies as usize
    }
}

/// Count-distance band per level: `[min, min + choices_per_level)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyBands {
    pub easy_min: u32,
    pub medium_min: u32,
    pub hard_min: u32,
    pub choices_per_level: u32,
}

impl Default for DifficultyBands {
    fn default() -> Self {
        Self {
            easy_min: 14,
            medium_min: 8,
            hard_min: 2,
            choices_per_level: 4,
        }
    }
}

impl DifficultyBands {
    #[inline]
    pub fn min_for(&self, level: Level) -> u32 {
        match level {
            Level::Easy => self.easy_min,
            Level::Medium => self.medium_min,
            Level::Hard => self.hard_min,
        }
    }

    pub fn range_for(&self, level: Level) -> RangeInclusive<u32> {
        let lo = self.min_for(level);
        lo..=lo + self.choices_per_level.saturating_sub(1)
    }

    /// Level whose band contains `distance`; `None` between or outside bands.
    pub fn classify(&self, distance: u32) -> Option<Level> {
        Level::ALL
            .into_iter()
            .find(|&l| self.range_for(l).contains(&distance))
    }

    /// Largest distance any band can produce.
    pub fn max_distance(&self) -> u32 {
        Level::ALL
            .iter()
            .map(|&l| *self.range_for(l).end())
            .max()
            .unwrap_or(0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.choices_per_level == 0 {
            return Err(StimulusError::config("difficulty bands need a positive width"));
        }
        if self.hard_min == 0 {
            return Err(StimulusError::config(
                "hard band must start at distance >= 1 (equal counts are not a pair)",
            ));
        }
        if !(self.hard_min < self.medium_min && self.medium_min < self.easy_min) {
            return Err(StimulusError::config(format!(
                "difficulty bands inverted: easy {} / medium {} / hard {}",
                self.easy_min, self.medium_min, self.hard_min
            )));
        }
        let hard = self.range_for(Level::Hard);
        let medium = self.range_for(Level::Medium);
        if *hard.end() >= *medium.start() || *medium.end() >= self.easy_min {
            return Err(StimulusError::config(format!(
                "difficulty bands overlap with width {}",
                self.choices_per_level
            )));
        }
        Ok(())
    }
}

/// Draws a level per round and maps it onto a target count distance.
#[derive(Clone, Debug)]
pub struct DifficultyScheduler {
    bag: DifficultyBag,
    bands: DifficultyBands,
}

impl DifficultyScheduler {
    pub fn new(copies: u32, bands: DifficultyBands) -> Result<Self> {
        bands.validate()?;
        Ok(Self {
            bag: DifficultyBag::new(copies)?,
            bands,
        })
    }

    pub fn draw_difficulty<R: Rng>(&mut self, rng: &mut R) -> Level {
        self.bag.draw(rng)
    }

    /// `min_for(level) + uniform[0, choices_per_level)`.
    pub fn distance_for_level<R: Rng>(&self, level: Level, rng: &mut R) -> u32 {
        self.bands.min_for(level) + rng.gen_range(0..self.bands.choices_per_level)
    }

    pub fn bag(&self) -> &DifficultyBag {
        &self.bag
    }

    pub fn bands(&self) -> &DifficultyBands {
        &self.bands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashMap;

    #[test]
    fn every_cycle_has_exact_composition() {
        let mut rng = StdRng::seed_from_u64(42);
        let k = 2;
        let mut bag = DifficultyBag::new(k).unwrap();
        for _cycle in 0..50 {
            let mut counts: HashMap<Level, u32> = HashMap::new();
            for _ in 0..3 * k {
                *counts.entry(bag.draw(&mut rng)).or_default() += 1;
            }
            for level in Level::ALL {
                assert_eq!(counts.get(&level), Some(&k));
            }
            assert_eq!(bag.remaining().len(), bag.capacity());
        }
    }

    #[test]
    fn bag_orders_vary_between_cycles() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bag = DifficultyBag::new(2).unwrap();
        let mut orders = std::collections::HashSet::new();
        for _ in 0..40 {
            let order: Vec<Level> = (0..6).map(|_| bag.draw(&mut rng)).collect();
            orders.insert(order);
        }
        assert!(orders.len() > 1);
    }

    #[test]
    fn easy_distance_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(1);
        let sched = DifficultyScheduler::new(2, DifficultyBands::default()).unwrap();
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..500 {
            let d = sched.distance_for_level(Level::Easy, &mut rng);
            assert!((14..=17).contains(&d));
            seen.insert(d);
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![14, 15, 16, 17]);
        for _ in 0..100 {
            assert!((8..=11).contains(&sched.distance_for_level(Level::Medium, &mut rng)));
            assert!((2..=5).contains(&sched.distance_for_level(Level::Hard, &mut rng)));
        }
    }

    #[test]
    fn bands_validation() {
        DifficultyBands::default().validate().unwrap();
        let overlapping = DifficultyBands {
            choices_per_level: 7,
            ..DifficultyBands::default()
        };
        assert!(overlapping.validate().is_err());
        let inverted = DifficultyBands {
            easy_min: 2,
            hard_min: 14,
            ..DifficultyBands::default()
        };
        assert!(inverted.validate().is_err());
        let zero = DifficultyBands {
            hard_min: 0,
            ..DifficultyBands::default()
        };
        assert!(zero.validate().is_err());
        assert_eq!(DifficultyBands::default().max_distance(), 17);
    }

    #[test]
    fn scheduler_rejects_empty_bag() {
        assert!(matches!(
            DifficultyBag::new(0),
            Err(StimulusError::Configuration { .. })
        ));
        assert!(DifficultyScheduler::new(0, DifficultyBands::default()).is_err());
    }

    #[test]
    fn classify_maps_distance_to_band() {
        let bands = DifficultyBands::default();
        for level in Level::ALL {
            for d in bands.range_for(level) {
                assert_eq!(bands.classify(d), Some(level));
            }
        }
        for d in [0, 1, 6, 7, 12, 13, 18, 25] {
            assert_eq!(bands.classify(d), None);
        }
    }
}
