//! Iso-value ranges for density map sliders.
//!
//! A volume's native value range is snapped to a "nice" slider range whose
//! step is one order of magnitude below a 25th of the spread, padded by one
//! step on each side.

use serde::{Deserialize, Serialize};

/// Closed numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl ValueRange {
    /// Create a range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Slider range and step derived from a native value range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsoBounds {
    /// Slider minimum.
    pub min: f64,
    /// Slider maximum.
    pub max: f64,
    /// Slider increment.
    pub step: f64,
}

/// Step used when a volume has no spread.
const DEGENERATE_STEP: f64 = 0.01;

/// Snap `[min, max]` to slider bounds.
///
/// Zero-variance (or inverted) ranges are returned unchanged with a step of
/// `0.01`.
#[must_use]
pub fn iso_bounds(min: f64, max: f64) -> IsoBounds {
    let diff = max - min;
    if diff <= 0.0 {
        return IsoBounds {
            min,
            max,
            step: DEGENERATE_STEP,
        };
    }

    let step = 10.0_f64.powi((diff / 25.0).log10().floor() as i32);
    IsoBounds {
        min: ((min - step) / step).floor() * step,
        max: ((max + step) / step).floor() * step,
        step,
    }
}

/// Midpoint of a range.
#[must_use]
pub fn mid(range: ValueRange) -> f64 {
    range.min + (range.max - range.min) / 2.0
}

/// Snap `iso` down onto the `step` grid.
#[must_use]
pub fn pretty_iso(iso: f64, step: f64) -> f64 {
    ((iso - step) / step).floor() * step + step
}

/// Default iso value of a volume with the given native range.
#[must_use]
pub fn default_iso(range: ValueRange) -> f64 {
    pretty_iso(mid(range), iso_bounds(range.min, range.max).step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_spread() {
        assert_eq!(
            iso_bounds(0.0, 25.0),
            IsoBounds {
                min: -1.0,
                max: 26.0,
                step: 1.0
            }
        );
    }

    #[test]
    fn zero_spread_falls_back() {
        assert_eq!(
            iso_bounds(5.0, 5.0),
            IsoBounds {
                min: 5.0,
                max: 5.0,
                step: 0.01
            }
        );
        assert_eq!(iso_bounds(3.0, 1.0).step, 0.01);
    }

    #[test]
    fn step_is_order_of_magnitude_below_spread() {
        let b = iso_bounds(0.0, 250.0);
        assert_eq!(b.step, 10.0);
        assert_eq!(b.min, -10.0);
        assert_eq!(b.max, 260.0);
    }

    #[test]
    fn bounds_pad_both_sides() {
        let b = iso_bounds(-3.0, 47.0);
        assert_eq!(b.step, 1.0);
        assert!(b.min < -3.0);
        assert!(b.max > 47.0);
    }

    #[test]
    fn midpoint() {
        assert_eq!(mid(ValueRange::new(-1.0, 3.0)), 1.0);
        assert_eq!(mid(ValueRange::new(2.0, 2.0)), 2.0);
    }

    #[test]
    fn default_iso_snaps_midpoint() {
        // spread 50 -> step 1; midpoint 12.5 snaps down to 12
        assert_eq!(default_iso(ValueRange::new(-12.5, 37.5)), 12.0);
        assert_eq!(default_iso(ValueRange::new(0.0, 25.0)), 12.0);
    }
}
