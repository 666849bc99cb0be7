//! Total-area normalization between two packed dot sets.
//!
//! Both operations only shrink: diameters are multiplied by a ratio ≤ 1, which
//! keeps every disk inside its packed footprint. Neither is idempotent; call
//! each once per freshly packed pair.

use super::DotSet;
use crate::schedule::Side;
use tracing::debug;

impl DotSet {
    /// Rescale every diameter by `sqrt(reference_area / total_area)`.
    ///
    /// Pre: `0 < reference_area <= total_area` (shrink only).
    /// Post: `total_area() ≈ reference_area`.
    pub fn match_area(&mut self, reference_area: f64) {
        debug_assert!(
            reference_area > 0.0 && reference_area <= self.total_area(),
            "match_area must shrink: reference {reference_area} vs total {}",
            self.total_area()
        );
        let ratio = (reference_area / self.total_area()).sqrt();
        self.rescale(ratio);
    }

    /// Multiply the total area by `area_factor` (diameters by its square root).
    ///
    /// Pre: `0 < area_factor < 1`.
    pub fn shrink_area(&mut self, area_factor: f64) {
        debug_assert!(area_factor > 0.0 && area_factor < 1.0);
        self.rescale(area_factor.sqrt());
    }
}

/// Ratio of the larger to the smaller total area (≥ 1).
pub fn area_ratio(one: &DotSet, two: &DotSet) -> f64 {
    let (a, b) = (one.total_area(), two.total_area());
    a.max(b) / a.min(b)
}

/// Scale the larger-area set down to the smaller one. Returns the rescaled side.
pub fn equalize(one: &mut DotSet, two: &mut DotSet) -> Side {
    let side = if one.total_area() >= two.total_area() {
        one.match_area(two.total_area());
        Side::Left
    } else {
        two.match_area(one.total_area());
        Side::Right
    };
    debug!(?side, area = one.total_area(), "equalized areas");
    side
}

/// Shrink the smaller-area set by `area_factor`, widening the area gap.
/// Ties shrink `two`. Returns the rescaled side.
pub fn diverge(one: &mut DotSet, two: &mut DotSet, area_factor: f64) -> Side {
    let before = area_ratio(one, two);
    let side = if one.total_area() < two.total_area() {
        one.shrink_area(area_factor);
        Side::Left
    } else {
        two.shrink_area(area_factor);
        Side::Right
    };
    debug!(
        ?side,
        ratio_before = before,
        ratio_after = area_ratio(one, two),
        "diverged areas"
    );
    side
}
