//! "Nice" tick values for chart axes.
use std::{fmt, ops::Range};

use plotters::coord::{
    ranged1d::{DefaultFormatting, KeyPointHint, Ranged},
    types::RangedCoordf64,
};

use super::ax_lims::AxLims;

/// Number of ticks aimed at if nothing else is requested.
pub const DEFAULT_TICK_TARGET: usize = 6;

/// Ordered tick values of an axis, spaced by 1, 2 or 5 times a power of ten.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSet {
    values: Vec<f64>,
    step: f64,
}

impl TickSet {
    /// Tick positions in ascending order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
    /// Distance between neighboring ticks. `0` for a single tick.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }
    /// Number of ticks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }
    /// Returns `true` if there are no ticks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Creates a plotters axis spanning `ax_lims` with these ticks as key points. Ticks outside
    /// of the limits are dropped.
    #[must_use]
    pub fn axis(&self, ax_lims: AxLims) -> TickedAxis {
        TickedAxis {
            inner: (ax_lims.min..ax_lims.max).into(),
            ticks: self
                .values
                .iter()
                .copied()
                .filter(|v| ax_lims.contains(*v))
                .collect(),
        }
    }
}

/// Linear `f64` axis whose key points are exactly the values of a [`TickSet`].
///
/// Labels are formatted by the label formatter of the mesh, so the axis uses the default
/// formatting option.
#[derive(Clone)]
pub struct TickedAxis {
    inner: RangedCoordf64,
    ticks: Vec<f64>,
}

impl fmt::Debug for TickedAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickedAxis")
            .field("range", &self.inner.range())
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl Ranged for TickedAxis {
    type ValueType = f64;
    type FormatOption = DefaultFormatting;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }
    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.weight().allow_light_points() {
            Vec::new()
        } else {
            self.ticks.clone()
        }
    }
    fn range(&self) -> Range<f64> {
        self.inner.range()
    }
}

fn nice_step(rough_step: f64) -> f64 {
    let magnitude = 10_f64.powf(rough_step.log10().floor());
    let normalized = rough_step / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Computes about `target` tick values covering `[min, max]`.
///
/// The step is the rough step `(max - min) / (target - 1)` rounded up to 1, 2, 5 or 10 times its
/// power of ten. The first tick is the smallest multiple of the step not below `min`. Ticks are
/// placed up to `max` plus a tolerance of a tenth of a step. A degenerate or non-finite range
/// yields the single tick `min`.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, target: usize) -> TickSet {
    let target = target.max(2);
    if !min.is_finite() || !max.is_finite() || max <= min {
        return TickSet {
            values: vec![min],
            step: 0.0,
        };
    }
    #[allow(clippy::cast_precision_loss)]
    let step = nice_step((max - min) / (target - 1) as f64);
    let start = (min / step).ceil() * step;
    let limit = 0.1f64.mul_add(step, max);
    #[allow(clippy::cast_precision_loss)]
    let values = (0..)
        .map(|i| (i as f64).mul_add(step, start))
        .take_while(|tick| *tick <= limit)
        .map(|tick| if tick.abs() < step * 1e-9 { 0.0 } else { tick })
        .collect();
    TickSet { values, step }
}

/// [`nice_ticks`] for the range of an [`AxLims`].
#[must_use]
pub fn ticks_for(ax_lims: AxLims, target: usize) -> TickSet {
    nice_ticks(ax_lims.min, ax_lims.max, target)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_ticks(ticks: &TickSet, expected: &[f64]) {
        assert_eq!(ticks.len(), expected.len(), "{:?}", ticks.values());
        for (tick, exp) in ticks.values().iter().zip(expected) {
            assert_relative_eq!(*tick, *exp, epsilon = 1e-9);
        }
    }
    #[test]
    fn zero_to_hundred() {
        let ticks = nice_ticks(0., 100., 6);
        assert_ticks(&ticks, &[0., 20., 40., 60., 80., 100.]);
        assert_relative_eq!(ticks.step(), 20.);
    }
    #[test]
    fn wavelength_axis() {
        let ticks = nice_ticks(200., 1000., 6);
        assert_ticks(&ticks, &[200., 400., 600., 800., 1000.]);
        let ticks = nice_ticks(200., 400., 6);
        assert_ticks(&ticks, &[200., 250., 300., 350., 400.]);
    }
    #[test]
    fn energy_axis() {
        let ticks = nice_ticks(1.5, 6.0, 6);
        assert_ticks(&ticks, &[2., 3., 4., 5., 6.]);
    }
    #[test]
    fn negative_range() {
        let ticks = nice_ticks(-49., 59., 6);
        assert_ticks(&ticks, &[0., 50.]);
        let ticks = nice_ticks(-45., 45., 6);
        assert_ticks(&ticks, &[-40., -20., 0., 20., 40.]);
        assert!(ticks.values().contains(&0.0));
    }
    #[test]
    fn small_values() {
        let ticks = nice_ticks(0., 0.99, 6);
        assert_ticks(&ticks, &[0., 0.2, 0.4, 0.6, 0.8, 1.0]);
    }
    #[test]
    fn end_tolerance() {
        let ticks = nice_ticks(0., 99.5, 6);
        assert_ticks(&ticks, &[0., 20., 40., 60., 80., 100.]);
    }
    #[test]
    fn degenerate() {
        let ticks = nice_ticks(3., 3., 6);
        assert_eq!(ticks.values(), &[3.]);
        assert_relative_eq!(ticks.step(), 0.);
        let ticks = nice_ticks(f64::NAN, 3., 6);
        assert_eq!(ticks.len(), 1);
        let ticks = nice_ticks(5., 3., 6);
        assert_eq!(ticks.values(), &[5.]);
    }
    #[test]
    fn step_is_one_two_five() {
        for (min, max) in [(0., 7.), (0.3, 12345.), (-1e-3, 2e-3), (1e4, 5e4), (0., 1.1e5)] {
            let ticks = nice_ticks(min, max, 6);
            let mantissa = ticks.step() / 10_f64.powf(ticks.step().log10().floor());
            assert!(
                [1., 2., 5.].iter().any(|m| (mantissa - m).abs() < 1e-9)
                    || (mantissa - 10.).abs() < 1e-9,
                "step {} for [{min},{max}]",
                ticks.step()
            );
            assert!(ticks.values().windows(2).all(|w| w[0] < w[1]));
            assert!(*ticks.values().first().unwrap() >= min - 1e-12);
        }
    }
    #[test]
    fn target_clamped() {
        let ticks = nice_ticks(0., 10., 0);
        assert_ticks(&ticks, &[0., 10.]);
    }
    #[test]
    fn ticked_axis() {
        let ax_lims = AxLims::new(0., 99.5).unwrap();
        let axis = nice_ticks(0., 99.5, 6).axis(ax_lims);
        assert_eq!(axis.range(), 0.0..99.5);
        assert_eq!(
            axis.key_points(plotters::coord::ranged1d::BoldPoints(10)),
            vec![0., 20., 40., 60., 80.]
        );
        assert!(axis.key_points(10usize).is_empty());
        assert_eq!(axis.map(&0., (0, 100)), 0);
    }
    #[test]
    fn ticked_axis_debug() {
        let axis = nice_ticks(0., 100., 6).axis(AxLims::new(0., 100.).unwrap());
        assert_eq!(
            format!("{axis:?}"),
            "TickedAxis { range: 0.0..100.0, ticks: [0.0, 20.0, 40.0, 60.0, 80.0, 100.0] }"
        );
    }
    #[test]
    fn from_ax_lims() {
        let ticks = ticks_for(AxLims::new(0., 110.).unwrap(), DEFAULT_TICK_TARGET);
        assert_ticks(&ticks, &[0., 50., 100.]);
    }
}
