#![warn(missing_docs)]
//! Lineshape synthesis.
//!
//! A [`Curve`] is generated on an equidistant grid from `x_start` to `x_end` as a sum of Gaussian
//! bands. The band positions, widths and amplitudes are fixed per (mode, unit) pair. The index of
//! the input curve shifts the bands and scales their intensity so that several overlaid spectra
//! are distinguishable.
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use log::{info, warn};

use crate::{
    error::{PlotSpecError, PsResult},
    parameters::SpectrumParameters,
    units::{AxisUnit, SpectrumMode, EV_TO_CM_MINUS_1},
};

/// Shift of the band positions per curve index on the nanometer scale.
pub const SHIFT_PER_CURVE: f64 = 20.0;
/// Relative intensity reduction per curve index.
pub const INTENSITY_STEP_PER_CURVE: f64 = 0.15;
/// Tolerance for including the end point of the spectral range in the grid.
pub const GRID_EPSILON: f64 = 1e-8;

/// One Gaussian band of a lineshape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakDefinition {
    /// band position
    pub center: f64,
    /// 1/e half width
    pub width: f64,
    /// band height
    pub amplitude: f64,
    /// +1 for positive bands, -1 for negative (circular dichroism) bands
    pub sign: f64,
}

impl PeakDefinition {
    const fn positive(center: f64, width: f64, amplitude: f64) -> Self {
        Self {
            center,
            width,
            amplitude,
            sign: 1.0,
        }
    }
    const fn negative(center: f64, width: f64, amplitude: f64) -> Self {
        Self {
            center,
            width,
            amplitude,
            sign: -1.0,
        }
    }
    /// Value of this band at `x` for the given band shift.
    #[must_use]
    pub fn value(&self, x: f64, shift: f64) -> f64 {
        self.sign * self.amplitude * (-((x - self.center - shift) / self.width).powi(2)).exp()
    }
    fn to_wavenumber(self) -> Self {
        Self {
            center: self.center * EV_TO_CM_MINUS_1,
            width: self.width * EV_TO_CM_MINUS_1,
            ..self
        }
    }
}

const ABSORPTION_NM: [PeakDefinition; 4] = [
    PeakDefinition::positive(280.0, 15.0, 15000.0),
    PeakDefinition::positive(320.0, 20.0, 12000.0),
    PeakDefinition::positive(420.0, 25.0, 8000.0),
    PeakDefinition::positive(520.0, 30.0, 5000.0),
];
const ABSORPTION_EV: [PeakDefinition; 3] = [
    PeakDefinition::positive(3.1, 0.15, 15000.0),
    PeakDefinition::positive(3.9, 0.2, 12000.0),
    PeakDefinition::positive(4.4, 0.1, 8000.0),
];
const ABSORPTION_CM: [PeakDefinition; 3] = [
    PeakDefinition::positive(25000.0, 2000.0, 15000.0),
    PeakDefinition::positive(31000.0, 1500.0, 12000.0),
    PeakDefinition::positive(35000.0, 1000.0, 8000.0),
];
const EMISSION_NM: [PeakDefinition; 3] = [
    PeakDefinition::positive(350.0, 20.0, 0.9),
    PeakDefinition::positive(450.0, 25.0, 0.7),
    PeakDefinition::positive(550.0, 30.0, 0.5),
];
const EMISSION_EV: [PeakDefinition; 3] = [
    PeakDefinition::positive(2.8, 0.15, 0.9),
    PeakDefinition::positive(3.2, 0.2, 0.7),
    PeakDefinition::positive(3.6, 0.1, 0.5),
];
const CD_NM: [PeakDefinition; 4] = [
    PeakDefinition::positive(260.0, 15.0, 50.0),
    PeakDefinition::negative(300.0, 20.0, 40.0),
    PeakDefinition::positive(340.0, 18.0, 30.0),
    PeakDefinition::negative(380.0, 25.0, 20.0),
];
const CD_EV: [PeakDefinition; 3] = [
    PeakDefinition::positive(4.0, 0.15, 50.0),
    PeakDefinition::negative(3.5, 0.2, 40.0),
    PeakDefinition::positive(3.0, 0.18, 30.0),
];

/// Returns the bands of the lineshape for the given mode and unit.
///
/// Emission and circular dichroism have no dedicated wavenumber tables. Their energy tables are
/// converted to cm⁻¹ instead.
#[must_use]
pub fn peak_table(mode: SpectrumMode, unit: AxisUnit) -> Vec<PeakDefinition> {
    use AxisUnit::{ElectronVolt, Nanometer, Wavenumber};
    use SpectrumMode::{Absorption, CircularDichroism, CircularDichroismLength, Emission};
    match (mode, unit) {
        (Absorption, Nanometer) => ABSORPTION_NM.to_vec(),
        (Absorption, ElectronVolt) => ABSORPTION_EV.to_vec(),
        (Absorption, Wavenumber) => ABSORPTION_CM.to_vec(),
        (Emission, Nanometer) => EMISSION_NM.to_vec(),
        (Emission, ElectronVolt) => EMISSION_EV.to_vec(),
        (Emission, Wavenumber) => EMISSION_EV
            .iter()
            .map(|p| p.to_wavenumber())
            .collect(),
        (CircularDichroism | CircularDichroismLength, Nanometer) => CD_NM.to_vec(),
        (CircularDichroism | CircularDichroismLength, ElectronVolt) => CD_EV.to_vec(),
        (CircularDichroism | CircularDichroismLength, Wavenumber) => {
            CD_EV.iter().map(|p| p.to_wavenumber()).collect()
        }
    }
}

/// One synthesized (or externally supplied) spectrum.
#[derive(Debug, Clone)]
pub struct Curve {
    x: Vec<f64>,
    y: Vec<f64>,
    x_label: String,
    y_label: String,
    title: String,
}

impl Curve {
    /// Creates a new [`Curve`] from sample vectors and labels.
    /// # Errors
    /// This function returns a [`PlotSpecError::Config`] if
    ///  - `x` and `y` differ in length
    ///  - the curve is empty
    ///  - `x` is not strictly increasing
    pub fn new(
        x: Vec<f64>,
        y: Vec<f64>,
        x_label: &str,
        y_label: &str,
        title: &str,
    ) -> PsResult<Self> {
        if x.len() != y.len() {
            return Err(PlotSpecError::Config(format!(
                "x has {} values but y has {}",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(PlotSpecError::Config("curve must not be empty".into()));
        }
        if !x.iter().tuple_windows().all(|(a, b)| a < b) {
            return Err(PlotSpecError::Config(
                "x values must be strictly increasing".into(),
            ));
        }
        Ok(Self {
            x,
            y,
            x_label: x_label.to_owned(),
            y_label: y_label.to_owned(),
            title: title.to_owned(),
        })
    }
    /// Returns the x values.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }
    /// Returns the y values.
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }
    /// Returns an iterator over the (x, y) sample pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }
    /// Always `false`: empty curves cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
    /// Label of the spectral axis.
    #[must_use]
    pub fn x_label(&self) -> &str {
        &self.x_label
    }
    /// Label of the intensity axis.
    #[must_use]
    pub fn y_label(&self) -> &str {
        &self.y_label
    }
    /// Title of the spectrum.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
    /// Minimum and maximum of the finite y values, `None` if there is none.
    #[must_use]
    pub fn y_min_max(&self) -> Option<(f64, f64)> {
        self.y
            .iter()
            .copied()
            .filter(|y| y.is_finite())
            .minmax_by(f64::total_cmp)
            .into_option()
    }
    /// Position of the sample with the largest y value.
    #[must_use]
    pub fn peak_position(&self) -> Option<f64> {
        self.points()
            .filter(|(_, y)| y.is_finite())
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(x, _)| x)
    }
}

/// Synthesizes the lineshape of the input curve with the given index.
/// # Errors
/// This function returns a [`PlotSpecError::Config`] if the spectral range of the parameters is
/// invalid (see [`SpectrumParameters::validate`]).
pub fn synthesize(params: &SpectrumParameters, curve_index: usize) -> PsResult<Curve> {
    params.validate()?;
    #[allow(clippy::cast_precision_loss)]
    let index = curve_index as f64;
    let shift = params.unit.rescale_shift(index * SHIFT_PER_CURVE);
    let intensity_factor = 1.0 - index * INTENSITY_STEP_PER_CURVE;
    if intensity_factor <= 0.0 {
        warn!("Intensity factor of curve {curve_index} is not positive ({intensity_factor:.2}). Its bands are inverted or vanish.");
    }
    let peaks = peak_table(params.mode, params.unit);
    #[allow(clippy::cast_precision_loss)]
    let x = (0..params.point_count())
        .map(|i| params.x_start + i as f64 * params.interval)
        .collect_vec();
    let y = x
        .iter()
        .map(|x| {
            intensity_factor
                * peaks
                    .iter()
                    .map(|peak| peak.value(*x, shift))
                    .sum::<f64>()
        })
        .collect_vec();
    Curve::new(
        x,
        y,
        params.unit.x_label(),
        params.mode.y_label(),
        params.mode.title(),
    )
}

/// Resolves an input identifier to an existing file.
///
/// The identifier is tried as given. If it carries neither an `.out` nor a `.log` extension,
/// these extensions are appended in turn.
/// # Errors
/// This function returns a [`PlotSpecError::InputNotFound`] if none of the candidates exists.
pub fn resolve_input(identifier: &Path) -> PsResult<PathBuf> {
    if identifier.is_file() {
        return Ok(identifier.to_path_buf());
    }
    let has_output_ext = identifier
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("out") || ext.eq_ignore_ascii_case("log"));
    if !has_output_ext {
        for ext in [".out", ".log"] {
            let mut candidate = OsString::from(identifier.as_os_str());
            candidate.push(ext);
            let candidate = PathBuf::from(candidate);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    Err(PlotSpecError::InputNotFound(format!(
        "cannot open output file: {}",
        identifier.display()
    )))
}

/// Synthesizes one curve per input file of the parameters, in input order.
/// # Errors
/// This function returns an error if
///  - no input files are given
///  - an input cannot be resolved (see [`resolve_input`])
///  - the synthesis fails (see [`synthesize`])
pub fn synthesize_all(params: &SpectrumParameters) -> PsResult<Vec<Curve>> {
    if params.input_files.is_empty() {
        return Err(PlotSpecError::Config("no input files provided".into()));
    }
    let mut curves = Vec::with_capacity(params.input_files.len());
    for (curve_index, identifier) in params.input_files.iter().enumerate() {
        let path = resolve_input(identifier)?;
        println!("Processing: {}", path.display());
        curves.push(synthesize(params, curve_index)?);
    }
    info!("synthesized {} curves", curves.len());
    Ok(curves)
}
