//! Pair building: fairness, packing and area control for one round.
//!
//! Flow per pair
//! 1. Validate counts (distinct, within range) and derive the requested side.
//! 2. Run the anti-streak check; a forced swap exchanges the two counts.
//! 3. Pack both sets, then apply area control (off / match / inverse / coin).
//! 4. Commit the fairness state only once packing succeeded.
//!
//! `PairBuilder` is the single owner of RNG, difficulty bag and fairness state.
//! Seed it explicitly for reproducible sessions.

use crate::cfg::{AreaControl, DiameterPolicy, GeneratorCfg};
use crate::dots::{diverge, equalize, pack, DotSet};
use crate::error::{Result, StimulusError};
use crate::schedule::{DifficultyScheduler, FairnessState, Level, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Area normalization actually applied to a pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaMode {
    None,
    Equal,
    Inverse,
    /// No rescale ran, but mean/variance packing fixed the average diameter.
    EqualAverageRadii,
}

impl fmt::Display for AreaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AreaMode::None => "None",
            AreaMode::Equal => "Equal Areas",
            AreaMode::Inverse => "Inverse Areas",
            AreaMode::EqualAverageRadii => "Equal Average Radii",
        })
    }
}

/// Two dot sets shown side by side; `one` is left, `two` is right.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DotSetPair {
    one: DotSet,
    two: DotSet,
    difference: i64,
    correct: Side,
    area_mode: AreaMode,
    swapped: bool,
    level: Option<Level>,
}

impl DotSetPair {
    pub fn one(&self) -> &DotSet {
        &self.one
    }

    pub fn two(&self) -> &DotSet {
        &self.two
    }

    /// `len(one) − len(two)`; never zero.
    pub fn difference(&self) -> i64 {
        self.difference
    }

    pub fn correct(&self) -> Side {
        self.correct
    }

    pub fn is_left_correct(&self) -> bool {
        self.correct == Side::Left
    }

    pub fn area_mode(&self) -> AreaMode {
        self.area_mode
    }

    /// True if the anti-streak guard exchanged the requested counts.
    pub fn swapped(&self) -> bool {
        self.swapped
    }

    /// Drawn level, or the band `|difference|` falls in when none was drawn.
    pub fn level(&self) -> Option<Level> {
        self.level
    }
}

pub struct PairBuilder {
    cfg: GeneratorCfg,
    rng: StdRng,
    scheduler: DifficultyScheduler,
    fairness: FairnessState,
}

impl PairBuilder {
    pub fn new(cfg: GeneratorCfg, seed: u64) -> Result<Self> {
        cfg.validate()?;
        let scheduler = DifficultyScheduler::new(cfg.difficulty_copies, cfg.bands)?;
        Ok(Self {
            cfg,
            rng: StdRng::seed_from_u64(seed),
            scheduler,
            fairness: FairnessState::default(),
        })
    }

    pub fn cfg(&self) -> &GeneratorCfg {
        &self.cfg
    }

    pub fn fairness(&self) -> FairnessState {
        self.fairness
    }

    pub fn scheduler(&self) -> &DifficultyScheduler {
        &self.scheduler
    }

    /// Build a pair with `count1` dots on the left and `count2` on the right,
    /// unless the anti-streak guard swaps them.
    ///
    /// Errors
    /// - `InvalidPairRequest` for equal counts or counts outside `cfg.counts`.
    /// - `PackingInfeasible` from the packer; fairness state is left untouched.
    pub fn build_pair(&mut self, count1: u32, count2: u32, area: AreaControl) -> Result<DotSetPair> {
        self.build(count1, count2, area, None)
    }

    /// Pair whose count distance falls in `level`'s band, with random order.
    pub fn build_difficulty_pair(&mut self, level: Level) -> Result<DotSetPair> {
        let distance = self.scheduler.distance_for_level(level, &mut self.rng);
        let counts = self.cfg.counts;
        let base = self.rng.gen_range(counts.min..=counts.max - distance);
        let (mut count1, mut count2) = (base, base + distance);
        if self.rng.gen::<bool>() {
            std::mem::swap(&mut count1, &mut count2);
        }
        let area = self.cfg.area_control;
        self.build(count1, count2, area, Some(level))
    }

    /// Draw the next level from the bag and build its pair.
    pub fn next_pair(&mut self) -> Result<DotSetPair> {
        let level = self.scheduler.draw_difficulty(&mut self.rng);
        self.build_difficulty_pair(level)
    }

    /// Two distinct counts uniform over the count range, no difficulty target.
    pub fn build_random_pair(&mut self) -> Result<DotSetPair> {
        let counts = self.cfg.counts;
        let count1 = self.rng.gen_range(counts.min..=counts.max);
        let mut count2 = self.rng.gen_range(counts.min..counts.max);
        if count2 >= count1 {
            count2 += 1;
        }
        let area = self.cfg.area_control;
        self.build(count1, count2, area, None)
    }

    fn build(
        &mut self,
        count1: u32,
        count2: u32,
        area: AreaControl,
        level: Option<Level>,
    ) -> Result<DotSetPair> {
        if count1 == count2 {
            return Err(StimulusError::request(format!(
                "equal counts ({count1}) leave no correct side"
            )));
        }
        for count in [count1, count2] {
            if !self.cfg.counts.contains(count) {
                return Err(StimulusError::request(format!(
                    "count {count} outside {}..={}",
                    self.cfg.counts.min, self.cfg.counts.max
                )));
            }
        }
        let requested = if count1 > count2 { Side::Left } else { Side::Right };
        let mut fairness = self.fairness;
        let verdict = fairness.observe(requested, self.cfg.max_run_length);
        let (left, right) = if verdict.swapped {
            (count2, count1)
        } else {
            (count1, count2)
        };

        let cfg = &self.cfg;
        let mut one = pack(
            left as usize,
            cfg.region,
            cfg.diameter,
            cfg.max_attempts_per_dot,
            &mut self.rng,
        )?;
        let mut two = pack(
            right as usize,
            cfg.region,
            cfg.diameter,
            cfg.max_attempts_per_dot,
            &mut self.rng,
        )?;
        let area_mode = self.apply_area_control(area, &mut one, &mut two);
        self.fairness = fairness;

        let difference = left as i64 - right as i64;
        let correct = if difference > 0 { Side::Left } else { Side::Right };
        debug_assert_eq!(correct, verdict.realized);
        let level = level.or_else(|| self.cfg.bands.classify(left.abs_diff(right)));
        debug!(
            left,
            right,
            swapped = verdict.swapped,
            ?area_mode,
            ?level,
            "built dot set pair"
        );
        Ok(DotSetPair {
            one,
            two,
            difference,
            correct,
            area_mode,
            swapped: verdict.swapped,
            level,
        })
    }

    fn apply_area_control(
        &mut self,
        area: AreaControl,
        one: &mut DotSet,
        two: &mut DotSet,
    ) -> AreaMode {
        let mode = match area {
            AreaControl::Off => {
                return match self.cfg.diameter {
                    DiameterPolicy::MeanVariance { .. } => AreaMode::EqualAverageRadii,
                    DiameterPolicy::Uniform { .. } => AreaMode::None,
                };
            }
            AreaControl::Match => AreaMode::Equal,
            AreaControl::InverseMatch => AreaMode::Inverse,
            AreaControl::RandomChoice => {
                if self.rng.gen::<bool>() {
                    AreaMode::Equal
                } else {
                    AreaMode::Inverse
                }
            }
        };
        match mode {
            AreaMode::Equal => {
                equalize(one, two);
            }
            AreaMode::Inverse => {
                diverge(one, two, self.cfg.inverse_area_factor);
            }
            AreaMode::None | AreaMode::EqualAverageRadii => {}
        }
        mode
    }
}
