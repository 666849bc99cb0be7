//! Generator configuration.
//!
//! One struct enumerates every knob the core reads: region, diameter policy,
//! count range, area control, difficulty replication and bands, the anti-streak
//! threshold and the packer's attempt budget. Nothing is read from globals.
//!
//! `GeneratorCfg::reference` reproduces the classic task layout (300×450 option
//! panels, diameters 20..=50, 1..=26 dots); the run-length threshold has no
//! sensible default and must always be supplied.

use crate::dots::Dot;
use crate::error::{Result, StimulusError};
use crate::schedule::DifficultyBands;
use serde::{Deserialize, Serialize};

/// Bounding rectangle each dot set is packed into (pixels, origin top-left).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Largest top-left offsets that keep a dot of diameter `max_diameter` inside.
    #[inline]
    pub(crate) fn max_offset(&self, max_diameter: f64) -> (u32, u32) {
        let x = (self.width as f64 - max_diameter).floor().max(0.0) as u32;
        let y = (self.height as f64 - max_diameter).floor().max(0.0) as u32;
        (x, y)
    }

    /// True iff the dot's bounding square lies inside the region.
    pub fn contains(&self, dot: &Dot) -> bool {
        let o = dot.origin();
        o.x >= 0.0
            && o.y >= 0.0
            && o.x + dot.diameter <= self.width as f64
            && o.y + dot.diameter <= self.height as f64
    }
}

/// How dot diameters are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiameterPolicy {
    /// Each dot independently uniform in `[min, max]`.
    Uniform { min: f64, max: f64 },
    /// Dots come in pairs `mean ± v` with `v` uniform in `(0, max_variance]`;
    /// an odd last dot gets exactly `mean`. Keeps the average diameter fixed.
    MeanVariance { mean: f64, max_variance: f64 },
}

impl DiameterPolicy {
    pub fn min_diameter(&self) -> f64 {
        match *self {
            DiameterPolicy::Uniform { min, .. } => min,
            DiameterPolicy::MeanVariance { mean, max_variance } => mean - max_variance,
        }
    }

    pub fn max_diameter(&self) -> f64 {
        match *self {
            DiameterPolicy::Uniform { max, .. } => max,
            DiameterPolicy::MeanVariance { mean, max_variance } => mean + max_variance,
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            DiameterPolicy::Uniform { min, max } => {
                if !(min.is_finite() && max.is_finite()) {
                    return Err(StimulusError::config("diameter bounds must be finite"));
                }
                if min <= 0.0 {
                    return Err(StimulusError::config("min diameter must be > 0"));
                }
                if min > max {
                    return Err(StimulusError::config(format!(
                        "min diameter {min} exceeds max diameter {max}"
                    )));
                }
            }
            DiameterPolicy::MeanVariance { mean, max_variance } => {
                if !(mean.is_finite() && max_variance.is_finite()) {
                    return Err(StimulusError::config("mean/variance must be finite"));
                }
                if max_variance <= 0.0 {
                    return Err(StimulusError::config("max diameter variance must be > 0"));
                }
                if mean - max_variance <= 0.0 {
                    return Err(StimulusError::config(format!(
                        "mean diameter {mean} must exceed max variance {max_variance}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Inclusive range of dot counts a single set may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    #[inline]
    pub fn contains(&self, count: u32) -> bool {
        (self.min..=self.max).contains(&count)
    }

    /// Largest achievable count difference within the range.
    #[inline]
    pub fn span(&self) -> u32 {
        self.max - self.min
    }
}

/// Area normalization applied to a freshly packed pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaControl {
    Off,
    /// Scale the larger-area set down to the smaller one's total area.
    Match,
    /// Shrink the smaller-area set further, widening the gap.
    InverseMatch,
    /// Fair coin between `Match` and `InverseMatch`, per pair.
    RandomChoice,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorCfg {
    pub region: Region,
    pub diameter: DiameterPolicy,
    pub counts: CountRange,
    pub area_control: AreaControl,
    /// Area multiplier in (0, 1) applied to the smaller set on inverse match.
    pub inverse_area_factor: f64,
    /// Copies of each level in the difficulty bag.
    pub difficulty_copies: u32,
    pub bands: DifficultyBands,
    /// Hard ceiling on consecutive rounds sharing the same correct side.
    pub max_run_length: u32,
    /// Candidate positions tried for a single dot before giving up.
    pub max_attempts_per_dot: u32,
}

impl GeneratorCfg {
    pub fn reference(max_run_length: u32) -> Self {
        Self {
            region: Region::new(300, 450),
            diameter: DiameterPolicy::Uniform {
                min: 20.0,
                max: 50.0,
            },
            counts: CountRange { min: 1, max: 26 },
            area_control: AreaControl::RandomChoice,
            inverse_area_factor: 0.75,
            difficulty_copies: 2,
            bands: DifficultyBands::default(),
            max_run_length,
            max_attempts_per_dot: 10_000,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.region.width == 0 || self.region.height == 0 {
            return Err(StimulusError::config("region must have positive size"));
        }
        self.diameter.validate()?;
        let max_d = self.diameter.max_diameter();
        if max_d > self.region.width as f64 || max_d > self.region.height as f64 {
            return Err(StimulusError::config(format!(
                "max diameter {max_d} does not fit in {}x{} region",
                self.region.width, self.region.height
            )));
        }
        if self.counts.min == 0 {
            return Err(StimulusError::config("dot counts must be positive"));
        }
        if self.counts.min >= self.counts.max {
            return Err(StimulusError::config(format!(
                "count range {}..={} cannot produce two distinct counts",
                self.counts.min, self.counts.max
            )));
        }
        if !(self.inverse_area_factor > 0.0 && self.inverse_area_factor < 1.0) {
            return Err(StimulusError::config(format!(
                "inverse area factor {} must lie in (0, 1)",
                self.inverse_area_factor
            )));
        }
        if self.difficulty_copies == 0 {
            return Err(StimulusError::config("difficulty bag needs at least one copy per level"));
        }
        self.bands.validate()?;
        let widest = self.bands.max_distance();
        if widest > self.counts.span() {
            return Err(StimulusError::config(format!(
                "difficulty distance up to {widest} exceeds count span {}",
                self.counts.span()
            )));
        }
        if self.max_run_length == 0 {
            return Err(StimulusError::config("max run length must be >= 1"));
        }
        if self.max_attempts_per_dot == 0 {
            return Err(StimulusError::config("max attempts per dot must be >= 1"));
        }
        Ok(())
    }
}
