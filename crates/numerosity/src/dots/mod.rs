//! Dot sets: packed clusters of non-overlapping disks.
//!
//! Model
//! - A dot is packed at an integer top-left corner of its bounding square with
//!   a real diameter; the centre sits at `position + d/2` on both axes.
//! - Rescaling keeps the centre fixed. The packed corner stays as recorded and
//!   the shrink is tracked as an `inset`, so the drawn bounding square starts
//!   at `position + inset` (see `Dot::origin`).
//! - `DotSet` keeps dots in placement order and maintains the total disk area
//!   incrementally as dots are added or rescaled.
//!
//! Invariants (hold after `pack` returns)
//! - Every dot lies inside the packing region.
//! - No two disks overlap: centre distance ≥ sum of radii.
//! - Rescaling only ever shrinks about fixed centres, so each shrunk disk is
//!   concentric with and inside its original one and both invariants survive.
//!
//! Code cross-refs: `pack::pack`, `area::{equalize, diverge}`.

pub mod area;
mod pack;

pub use area::{diverge, equalize};
pub use pack::pack;

use nalgebra::Vector2;
use serde::Serialize;
use std::f64::consts::PI;

/// Integer pixel position (top-left of the dot's bounding square as packed).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    #[inline]
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Dot {
    /// Packed top-left corner; never moves after packing.
    pub position: Coordinate,
    pub diameter: f64,
    /// Offset of the current bounding square from `position` after shrinking.
    inset: f64,
}

impl Dot {
    #[inline]
    pub fn new(position: Coordinate, diameter: f64) -> Self {
        Self {
            position,
            diameter,
            inset: 0.0,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    #[inline]
    pub fn inset(&self) -> f64 {
        self.inset
    }

    /// Top-left of the current bounding square (what a renderer draws from).
    #[inline]
    pub fn origin(&self) -> Vector2<f64> {
        Vector2::new(
            self.position.x as f64 + self.inset,
            self.position.y as f64 + self.inset,
        )
    }

    #[inline]
    pub fn center(&self) -> Vector2<f64> {
        let r = self.radius();
        self.origin().add_scalar(r)
    }

    /// Shrink or grow about the fixed centre.
    #[inline]
    pub(crate) fn scale(&mut self, ratio: f64) {
        let scaled = self.diameter * ratio;
        self.inset += (self.diameter - scaled) / 2.0;
        self.diameter = scaled;
    }

    #[inline]
    pub fn area(&self) -> f64 {
        disk_area(self.diameter)
    }

    /// Disks overlap iff centre distance < sum of radii (touching is allowed).
    #[inline]
    pub fn overlaps(&self, other: &Dot) -> bool {
        (self.center() - other.center()).norm() < self.radius() + other.radius()
    }
}

#[inline]
pub(crate) fn disk_area(diameter: f64) -> f64 {
    let r = diameter / 2.0;
    PI * r * r
}

/// Ordered dots plus their running total area.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DotSet {
    dots: Vec<Dot>,
    total_area: f64,
}

impl DotSet {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            dots: Vec::with_capacity(n),
            total_area: 0.0,
        }
    }

    #[inline]
    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    #[inline]
    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    pub fn positions(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.dots.iter().map(|d| d.position)
    }

    pub fn diameters(&self) -> impl Iterator<Item = f64> + '_ {
        self.dots.iter().map(|d| d.diameter)
    }

    /// True iff `candidate` would overlap any dot already in the set.
    pub(crate) fn overlaps_any(&self, candidate: &Dot) -> bool {
        self.dots.iter().any(|d| d.overlaps(candidate))
    }

    pub(crate) fn push(&mut self, dot: Dot) {
        self.total_area += dot.area();
        self.dots.push(dot);
    }

    /// Multiply every diameter by `ratio` about its centre and recompute the total area.
    pub(crate) fn rescale(&mut self, ratio: f64) {
        let mut total = 0.0;
        for dot in &mut self.dots {
            dot.scale(ratio);
            total += dot.area();
        }
        self.total_area = total;
    }
}

#[cfg(test)]
mod tests;
