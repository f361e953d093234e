//! Export of charts to the raster formats png and jpeg.
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use image::{codecs::jpeg::JpegEncoder, ImageFormat, RgbImage};
use plotters::prelude::{BitMapBackend, IntoDrawingArea};

use crate::{
    error::{PlotSpecError, PsResult},
    plottable::Chart,
};

/// Resolution multiplier of raster exports.
pub const RASTER_SCALE: f64 = 2.0;
/// Quality of jpeg exports.
pub const JPEG_QUALITY: u8 = 95;

/// Supported raster formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    /// Portable network graphics
    Png,
    /// JPEG
    Jpeg,
}

fn image_error(err: impl std::fmt::Display) -> PlotSpecError {
    PlotSpecError::Export(format!("image export failed: {err}"))
}

/// Renders the chart into an RGB image of [`Chart::scaled_size`].
/// # Errors
/// This function returns an error if the chart cannot be drawn.
pub fn render_rgb(chart: &Chart, scale: f64) -> PsResult<RgbImage> {
    let (width, height) = chart.scaled_size(scale);
    let mut buf = vec![0_u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        chart.draw(&root, scale)?;
    }
    RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| PlotSpecError::Export("rendered buffer does not match image size".into()))
}

/// Renders the chart with [`RASTER_SCALE`] and writes it in the given raster format to `path`.
/// # Errors
/// This function returns an error if the chart cannot be drawn or the file cannot be written.
pub fn export_raster(chart: &Chart, format: RasterFormat, path: &Path) -> PsResult<()> {
    let image = render_rgb(chart, RASTER_SCALE)?;
    match format {
        RasterFormat::Png => image
            .save_with_format(path, ImageFormat::Png)
            .map_err(image_error),
        RasterFormat::Jpeg => {
            let mut writer = BufWriter::new(File::create(path)?);
            encode_jpeg(&image, JPEG_QUALITY, &mut writer)?;
            writer.flush()?;
            Ok(())
        }
    }
}

fn encode_jpeg<W: Write>(image: &RgbImage, quality: u8, writer: &mut W) -> PsResult<()> {
    JpegEncoder::new_with_quality(writer, quality)
        .encode_image(image)
        .map_err(image_error)
}
