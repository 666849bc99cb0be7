//! Rejection-sampling circle packer.
//!
//! Each dot draws a top-left position uniformly in
//! `[0, W − maxD] × [0, H − maxD]` (integers, inclusive) and is accepted only if
//! its disk overlaps nothing placed so far. Every single placement has a hard
//! candidate budget; running out is reported, never papered over.

use super::{Coordinate, Dot, DotSet};
use crate::cfg::{DiameterPolicy, Region};
use crate::error::{Result, StimulusError};
use rand::Rng;
use tracing::debug;

/// Pack `count` non-overlapping dots into `region` following `policy`.
///
/// Errors
/// - `Configuration` if `count == 0`.
/// - `PackingInfeasible` once any single dot exhausts `max_attempts` candidates.
pub fn pack<R: Rng>(
    count: usize,
    region: Region,
    policy: DiameterPolicy,
    max_attempts: u32,
    rng: &mut R,
) -> Result<DotSet> {
    if count == 0 {
        return Err(StimulusError::config("dot count must be positive"));
    }
    let (x_hi, y_hi) = region.max_offset(policy.max_diameter());
    let mut packer = Packer {
        set: DotSet::with_capacity(count),
        requested: count,
        x_hi,
        y_hi,
        max_attempts,
        attempts: 0,
    };
    match policy {
        DiameterPolicy::Uniform { min, max } => {
            while packer.set.len() < count {
                packer.place(rng, |rng| rng.gen_range(min..=max))?;
            }
        }
        DiameterPolicy::MeanVariance { mean, max_variance } => {
            while count - packer.set.len() >= 2 {
                // gen::<f64>() is in [0, 1), so v lands in (0, max_variance].
                let v = max_variance * (1.0 - rng.gen::<f64>());
                packer.place(rng, |_| mean + v)?;
                packer.place(rng, |_| mean - v)?;
            }
            if packer.set.len() < count {
                packer.place(rng, |_| mean)?;
            }
        }
    }
    debug!(
        requested = count,
        attempts = packer.attempts,
        total_area = packer.set.total_area(),
        "packed dot set"
    );
    Ok(packer.set)
}

struct Packer {
    set: DotSet,
    requested: usize,
    x_hi: u32,
    y_hi: u32,
    max_attempts: u32,
    attempts: u64,
}

impl Packer {
    /// Sample candidates until one fits; `diameter` is asked once per candidate.
    fn place<R, F>(&mut self, rng: &mut R, mut diameter: F) -> Result<()>
    where
        R: Rng,
        F: FnMut(&mut R) -> f64,
    {
        for _ in 0..self.max_attempts {
            self.attempts += 1;
            let x = rng.gen_range(0..=self.x_hi);
            let y = rng.gen_range(0..=self.y_hi);
            let d = diameter(&mut *rng);
            let candidate = Dot::new(Coordinate::new(x, y), d);
            if !self.set.overlaps_any(&candidate) {
                self.set.push(candidate);
                return Ok(());
            }
        }
        Err(StimulusError::PackingInfeasible {
            requested: self.requested,
            placed: self.set.len(),
            attempts: self.max_attempts,
        })
    }
}
