//! Anti-streak control on the numerically correct side.
//!
//! The streak counts repeats of the previous round's side. When it reaches
//! `max_run_length` the round is flipped, the remembered side flips with it and
//! the streak resets, so at most `max_run_length` consecutive rounds can share
//! a side no matter how the counts were drawn.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn flipped(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

/// Outcome of observing one round's requested side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub realized: Side,
    pub swapped: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FairnessState {
    streak: u32,
    last: Side,
}

impl Default for FairnessState {
    fn default() -> Self {
        Self {
            streak: 0,
            last: Side::Right,
        }
    }
}

impl FairnessState {
    #[inline]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[inline]
    pub fn last(&self) -> Side {
        self.last
    }

    /// Record `requested` as this round's correct side, forcing a swap when the
    /// streak would reach `max_run_length`. Post: `streak() < max_run_length`.
    pub fn observe(&mut self, requested: Side, max_run_length: u32) -> Verdict {
        if requested == self.last {
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        self.last = requested;
        if self.streak >= max_run_length {
            debug!(side = %requested, streak = self.streak, "forcing side swap");
            self.last = requested.flipped();
            self.streak = 0;
            return Verdict {
                realized: self.last,
                swapped: true,
            };
        }
        Verdict {
            realized: requested,
            swapped: false,
        }
    }
}
