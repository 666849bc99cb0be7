//! Stimulus pairs for numerosity comparison.
//!
//! Two clusters of non-overlapping dots whose counts differ by a controlled
//! amount, optionally area-normalized, sequenced through a difficulty bag with
//! an anti-streak guard on the correct side.
//!
//! Layout
//! - `dots`: dot sets, the rejection-sampling packer, and area normalization.
//! - `schedule`: difficulty bag/bands and the fairness (anti-streak) state.
//! - `pair`: `PairBuilder`, the single owner of RNG and schedule state.
//! - `cfg`: one explicit configuration struct, validated up front.
//!
//! API Policy
//! - Everything here is synchronous and seedable. Callers on a UI thread should
//!   run `PairBuilder` calls on a worker and hand the finished pair back.

pub mod cfg;
pub mod dots;
pub mod error;
pub mod pair;
pub mod schedule;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{AreaControl, CountRange, DiameterPolicy, GeneratorCfg, Region};
pub use error::{Result, StimulusError};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{AreaControl, CountRange, DiameterPolicy, GeneratorCfg, Region};
    pub use crate::dots::{pack, Coordinate, Dot, DotSet};
    pub use crate::error::StimulusError;
    pub use crate::pair::{AreaMode, DotSetPair, PairBuilder};
    pub use crate::schedule::{
        DifficultyBag, DifficultyBands, DifficultyScheduler, FairnessState, Level, Side, Verdict,
    };
}
