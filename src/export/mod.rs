#![warn(missing_docs)]
//! Export of assembled charts to files.
//!
//! Vector formats are written by [`vector`], raster formats by [`raster`]. The eps and pdf writers
//! work on a display list captured by the [`recorder::RecordingBackend`].
pub mod eps;
pub mod pdf;
pub mod raster;
pub mod recorder;
pub mod vector;

use std::path::PathBuf;

use log::info;

use crate::{
    error::{PlotSpecError, PsResult},
    parameters::{OutputFormat, SpectrumParameters},
    plottable::Chart,
};
pub use raster::RasterFormat;
pub use vector::VectorFormat;

/// Exporter responsible for an output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportRoute {
    /// scalable output
    Vector(VectorFormat),
    /// bitmap output
    Raster(RasterFormat),
}

/// Returns the exporter of the given output format.
#[must_use]
pub const fn route(format: OutputFormat) -> ExportRoute {
    match format {
        OutputFormat::Svg => ExportRoute::Vector(VectorFormat::Svg),
        OutputFormat::Eps => ExportRoute::Vector(VectorFormat::Eps),
        OutputFormat::Pdf => ExportRoute::Vector(VectorFormat::Pdf),
        OutputFormat::Png => ExportRoute::Raster(RasterFormat::Png),
        OutputFormat::Jpg | OutputFormat::Jpeg => ExportRoute::Raster(RasterFormat::Jpeg),
    }
}

/// Returns the exporter of an output format given as string.
/// # Errors
/// This function returns a [`PlotSpecError::UnsupportedFormat`] for unknown formats.
pub fn route_for(format: &str) -> PsResult<ExportRoute> {
    OutputFormat::parse(format).map(route)
}

/// Writes the chart to `{output_filename}.{output_format}` and returns the path of the written
/// file.
/// # Errors
/// This function returns a [`PlotSpecError::Export`] if drawing or writing the file fails.
pub fn export(chart: &Chart, params: &SpectrumParameters) -> PsResult<PathBuf> {
    let path = params.output_path();
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.is_dir() {
            return Err(PlotSpecError::Export(format!(
                "output directory {} does not exist",
                dir.display()
            )));
        }
    }
    match route(params.output_format) {
        ExportRoute::Vector(format) => vector::export_vector(chart, format, &path)?,
        ExportRoute::Raster(format) => raster::export_raster(chart, format, &path)?,
    }
    info!("wrote {}", path.display());
    Ok(path)
}
