//! Axis limits of a chart and the padded intensity range of a set of curves.
use approx::{abs_diff_ne, RelativeEq};
use log::warn;

use crate::{
    error::{PlotSpecError, PsResult},
    synthesis::Curve,
    units::SpectrumMode,
};

/// Relative padding added to the raw intensity range on each side.
pub const Y_PADDING: f64 = 0.1;

/// Struct that holds the maximum and minimum values of an axis
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct AxLims {
    /// minimum value of the axis
    pub min: f64,
    /// maximum value of the axis
    pub max: f64,
}

impl AxLims {
    /// Creates a new [`AxLims`] struct.
    ///
    /// Returns `None` if one of the values is not finite or `min` is not smaller than `max`.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Option<Self> {
        let axlim = Self { min, max };
        if axlim.check_validity() {
            Some(axlim)
        } else {
            warn!("Invalid axis limits. Must be finite and min < max.");
            None
        }
    }
    /// Checks the validity of the delivered min and max values and returns a true if it is valid, false otherwise
    #[must_use]
    pub fn check_validity(self) -> bool {
        self.max.is_finite()
            && self.min.is_finite()
            && abs_diff_ne!(self.max, self.min)
            && self.max > self.min
    }
    /// Width of the axis range.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
    /// Returns `true` if `value` lies within the limits (both inclusive).
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
    /// Creates an [`AxLims`] struct from `min` and `max`, repairing them if necessary.
    ///
    /// Swapped values are reordered. A missing (non-finite) bound is replaced by the other one.
    /// Equal bounds are spread around their value by half its magnitude. If both bounds are zero or
    /// non-finite, the limits `[-0.5, 0.5]` are used.
    #[must_use]
    pub fn create_useful_axlims(min_in: f64, max_in: f64) -> Option<Self> {
        if !min_in.is_finite() && !max_in.is_finite() {
            return Self::new(-0.5, 0.5);
        }
        let (min, max) = if !min_in.is_finite() {
            (max_in, max_in)
        } else if !max_in.is_finite() {
            (min_in, min_in)
        } else {
            (min_in, max_in)
        };
        let (mut min, mut max) = if max < min { (max, min) } else { (min, max) };
        let mut ax_range = max - min;
        if max.relative_eq(&min, f64::EPSILON, f64::EPSILON) {
            ax_range = max.abs();
            min = max - ax_range / 2.;
            max += ax_range * 0.5;
        }
        if ax_range < f64::EPSILON {
            max = 0.5;
            min = -0.5;
        }
        Self::new(min, max)
    }
}

/// Computes the padded intensity range of a set of curves.
///
/// The raw range spans the finite y values of all curves and is padded by [`Y_PADDING`] of its
/// width on both sides. Unless the mode is a circular dichroism mode, non-negative data is
/// anchored at zero: the lower limit becomes `0` and only the upper limit is padded. Flat data
/// falls back to [`AxLims::create_useful_axlims`].
/// # Errors
/// This function returns a [`PlotSpecError::Other`] if the curves contain no finite y value.
pub fn compute_y_range(curves: &[Curve], mode: SpectrumMode) -> PsResult<AxLims> {
    let (raw_min, raw_max) = curves
        .iter()
        .filter_map(Curve::y_min_max)
        .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.min(min_b), max_a.max(max_b)))
        .ok_or_else(|| {
            PlotSpecError::Other("no finite intensity values to determine the y range".into())
        })?;
    let range = raw_max - raw_min;
    let Some(raw) = AxLims::new(raw_min, raw_max) else {
        return AxLims::create_useful_axlims(raw_min, raw_max).ok_or_else(|| {
            PlotSpecError::Other(format!(
                "cannot create y range from values (min:{raw_min}, max:{raw_max})"
            ))
        });
    };
    let padding = Y_PADDING * range;
    let ax_lims = if !mode.is_circular_dichroism() && raw.min >= 0.0 {
        AxLims {
            min: 0.0,
            max: raw.max + padding,
        }
    } else {
        AxLims {
            min: raw.min - padding,
            max: raw.max + padding,
        }
    };
    Ok(ax_lims)
}
