//! Export of charts to the vector formats svg, eps and pdf.
use std::{fs::File, io::BufWriter, io::Write, path::Path};

use log::debug;
use plotters::prelude::{IntoDrawingArea, SVGBackend};

use super::{eps::write_eps, pdf::write_pdf, recorder::DisplayList, recorder::RecordingBackend};
use crate::{error::PsResult, plottable::Chart};

/// Supported vector formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorFormat {
    /// Scalable vector graphics
    Svg,
    /// Encapsulated PostScript
    Eps,
    /// Portable document format
    Pdf,
}

/// Records the chart into a device independent display list.
/// # Errors
/// This function returns an error if the chart cannot be drawn.
pub fn record(chart: &Chart) -> PsResult<DisplayList> {
    let mut list = DisplayList::default();
    {
        let root = RecordingBackend::new(&mut list, chart.size()).into_drawing_area();
        chart.draw(&root, 1.0)?;
    }
    debug!("recorded {} drawing primitives", list.items.len());
    Ok(list)
}

/// Writes the chart in the given vector format to `path`.
/// # Errors
/// This function returns an error if the chart cannot be drawn or the file cannot be written.
pub fn export_vector(chart: &Chart, format: VectorFormat, path: &Path) -> PsResult<()> {
    match format {
        VectorFormat::Svg => {
            let root = SVGBackend::new(path, chart.size()).into_drawing_area();
            chart.draw(&root, 1.0)
        }
        VectorFormat::Eps => {
            let list = record(chart)?;
            let mut writer = BufWriter::new(File::create(path)?);
            write_eps(&list, chart.title(), &mut writer)?;
            writer.flush()?;
            Ok(())
        }
        VectorFormat::Pdf => {
            let list = record(chart)?;
            write_pdf(&list, chart.title(), path)
        }
    }
}
