#![warn(missing_docs)]
//! The fully resolved parameter record handed to the synthesis / chart / export pipeline.
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use log::warn;
use strum::{Display, EnumIter, EnumString};
use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::kelvin};

use crate::{
    error::{PlotSpecError, PsResult},
    synthesis::GRID_EPSILON,
    units::{AxisUnit, Fwhm, SpectrumMode, KB_EV_PER_K, ROOM_TEMP_K},
};

/// Largest number of grid points a single curve may have.
pub const MAX_POINT_COUNT: usize = 10_000_000;

/// File format of the exported plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
pub enum OutputFormat {
    /// Scalable vector graphics
    #[strum(to_string = "svg")]
    Svg,
    /// Encapsulated PostScript
    #[strum(to_string = "eps")]
    Eps,
    /// Portable document format
    #[strum(to_string = "pdf")]
    Pdf,
    /// Portable network graphics
    #[strum(to_string = "png")]
    Png,
    /// JPEG, `.jpg` extension
    #[strum(to_string = "jpg")]
    Jpg,
    /// JPEG, `.jpeg` extension
    #[strum(to_string = "jpeg")]
    Jpeg,
}

impl OutputFormat {
    /// Parses an output format string.
    /// # Errors
    /// This function returns a [`PlotSpecError::UnsupportedFormat`] if the format is neither one of
    /// the vector formats (svg, eps, pdf) nor one of the raster formats (png, jpg, jpeg).
    pub fn parse(format: &str) -> PsResult<Self> {
        Self::from_str(format).map_err(|_| {
            PlotSpecError::UnsupportedFormat(format!(
                "output format \"{format}\" is not supported. Choose svg, eps, pdf, png, jpg or jpeg"
            ))
        })
    }
    /// Returns the file extension (without dot) belonging to this format.
    #[must_use]
    pub fn extension(self) -> String {
        self.to_string()
    }
}

/// Plotting parameters of one invocation.
///
/// The record is resolved once at startup (see [`crate::config`]) and passed by reference into
/// the core. After [`SpectrumParameters::resolve_legend_names`] the number of legend names equals
/// the number of input files.
#[derive(Debug, Clone)]
pub struct SpectrumParameters {
    /// kind of spectrum
    pub mode: SpectrumMode,
    /// unit of the spectral axis
    pub unit: AxisUnit,
    /// start of the spectral range (in `unit`)
    pub x_start: f64,
    /// end of the spectral range (in `unit`)
    pub x_end: f64,
    /// grid interval (in `unit`)
    pub interval: f64,
    /// broadening width
    pub fwhm: Fwhm,
    /// temperature used for the thermal energy reported in the summary
    pub temperature: ThermodynamicTemperature,
    /// format of the exported plot
    pub output_format: OutputFormat,
    /// output file name without extension
    pub output_filename: String,
    /// ordered input identifiers, one curve each
    pub input_files: Vec<PathBuf>,
    /// ordered legend labels, one per input
    pub legend_names: Vec<String>,
    /// show the chart in a window after export
    pub interactive: bool,
}

impl Default for SpectrumParameters {
    fn default() -> Self {
        Self {
            mode: SpectrumMode::Absorption,
            unit: AxisUnit::Nanometer,
            x_start: 200.0,
            x_end: 1000.0,
            interval: AxisUnit::Nanometer.default_interval(),
            fwhm: Fwhm::default(),
            temperature: ThermodynamicTemperature::new::<kelvin>(ROOM_TEMP_K),
            output_format: OutputFormat::Svg,
            output_filename: "spectrum_plot".into(),
            input_files: Vec::new(),
            legend_names: Vec::new(),
            interactive: true,
        }
    }
}

impl SpectrumParameters {
    /// Checks the numeric consistency of the spectral range.
    /// # Errors
    /// This function returns a [`PlotSpecError::Config`] if
    ///  - `x_start` or `x_end` is not finite
    ///  - `x_start` is not smaller than `x_end`
    ///  - `interval` is not finite and positive
    ///  - `output_filename` is empty
    pub fn validate(&self) -> PsResult<()> {
        if !self.x_start.is_finite() || !self.x_end.is_finite() {
            return Err(PlotSpecError::Config(
                "x_start and x_end must be finite".into(),
            ));
        }
        if self.x_start >= self.x_end {
            return Err(PlotSpecError::Config(format!(
                "x_start ({}) must be smaller than x_end ({})",
                self.x_start, self.x_end
            )));
        }
        if !self.interval.is_normal() || self.interval.is_sign_negative() {
            return Err(PlotSpecError::Config(
                "interval must be greater than zero and finite".into(),
            ));
        }
        if self.step_count().is_none() {
            return Err(PlotSpecError::Config(format!(
                "the grid from {} to {} with interval {} has more than {MAX_POINT_COUNT} points",
                self.x_start, self.x_end, self.interval
            )));
        }
        if self.output_filename.trim().is_empty() {
            return Err(PlotSpecError::Config("output_filename must not be empty".into()));
        }
        Ok(())
    }
    /// Replaces the legend names by the base names of the input files if no legend names are
    /// given or if their number does not match the number of inputs.
    pub fn resolve_legend_names(&mut self) {
        if self.legend_names.len() == self.input_files.len() {
            return;
        }
        if !self.legend_names.is_empty() {
            warn!(
                "{} legend names given for {} input files. Using file names instead.",
                self.legend_names.len(),
                self.input_files.len()
            );
        }
        self.legend_names = self
            .input_files
            .iter()
            .map(|p| file_stem_name(p))
            .collect();
    }
    /// Path of the exported image: `{output_filename}.{output_format}`.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(format!(
            "{}.{}",
            self.output_filename,
            self.output_format.extension()
        ))
    }
    /// Thermal energy kT at the configured temperature in eV.
    #[must_use]
    pub fn kt_ev(&self) -> f64 {
        self.temperature.get::<kelvin>() * KB_EV_PER_K
    }
    /// Number of grid points between `x_start` and `x_end` (both inclusive).
    ///
    /// Returns `0` if the grid is empty or would exceed [`MAX_POINT_COUNT`] points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.step_count()
            .and_then(|steps| steps.checked_add(1))
            .unwrap_or(0)
    }
    /// Number of intervals on the grid, `None` if it is not finite, negative or too large.
    fn step_count(&self) -> Option<usize> {
        let steps = ((self.x_end - self.x_start + GRID_EPSILON) / self.interval).floor();
        #[allow(clippy::cast_precision_loss)]
        let max_steps = (MAX_POINT_COUNT - 1) as f64;
        if steps.is_finite() && (0.0..=max_steps).contains(&steps) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(steps as usize)
        } else {
            None
        }
    }
}

fn file_stem_name(path: &Path) -> String {
    path.file_stem().map_or_else(
        || path.display().to_string(),
        |stem| stem.to_string_lossy().into_owned(),
    )
}
