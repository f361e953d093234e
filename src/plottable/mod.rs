#![warn(missing_docs)]
//! Chart assembly and drawing.
//!
//! A [`Chart`] holds the curves of one invocation together with their shared coordinate system,
//! tick sets and series styles. It does no I/O itself. [`Chart::draw`] renders it onto any
//! plotters [`DrawingArea`] so the same chart can be written to files or shown on screen.

pub mod ax_lims;
pub mod ticks;
pub use ax_lims::AxLims;
pub use ticks::TickSet;

use log::{debug, warn};
use plotters::{
    backend::DrawingBackend,
    chart::{ChartBuilder, SeriesLabelPosition},
    coord::Shift,
    element::{PathElement, Rectangle},
    prelude::DrawingArea,
    series::LineSeries,
    style::{Color, IntoFont, RGBColor, BLACK, TRANSPARENT, WHITE},
};

use crate::{
    error::{PlotSpecError, PsResult},
    parameters::SpectrumParameters,
    synthesis::Curve,
};

/// Logical size of the chart in pixels.
pub const WINDOW_SIZE: (u32, u32) = (1000, 700);
/// Font size of the axis titles.
pub const AXIS_TITLE_FONT_SIZE: u32 = 16;
/// Font size of the tick labels.
pub const TICK_LABEL_FONT_SIZE: u32 = 14;
/// Font size of the legend entries.
pub const LEGEND_FONT_SIZE: u32 = 12;
/// Width of the spectrum lines.
pub const LINE_WIDTH: u32 = 2;
/// Font family used for all texts.
pub const FONT_FAMILY: &str = "sans-serif";

/// Returns the palette color of the series with the given index.
///
/// The `colorous` category palette is cycled if there are more series than colors.
#[must_use]
pub fn series_color(index: usize) -> RGBColor {
    let palette = colorous::CATEGORY10;
    let color = palette[index % palette.len()];
    RGBColor(color.r, color.g, color.b)
}

/// Drawing style of one spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    /// line color
    pub color: RGBColor,
    /// line width in logical pixels
    pub width: u32,
    /// legend entry
    pub label: String,
}

/// Assembled chart, ready to be drawn.
#[derive(Debug, Clone)]
pub struct Chart {
    curves: Vec<Curve>,
    series: Vec<SeriesStyle>,
    x_lims: AxLims,
    y_lims: AxLims,
    x_ticks: TickSet,
    y_ticks: TickSet,
    x_label: String,
    y_label: String,
    title: String,
    size: (u32, u32),
}

fn legend_labels(curves: &[Curve], params: &SpectrumParameters) -> Vec<String> {
    if params.legend_names.len() == curves.len() {
        return params.legend_names.clone();
    }
    let mut resolved = params.clone();
    resolved.resolve_legend_names();
    if resolved.legend_names.len() == curves.len() {
        resolved.legend_names
    } else {
        warn!("No legend names for {} curves. Numbering them.", curves.len());
        (1..=curves.len()).map(|i| format!("Spectrum {i}")).collect()
    }
}

/// Lays out the given curves on a shared coordinate system.
///
/// The x range is fixed to the spectral range of the parameters. The y range is computed from all
/// curves (see [`ax_lims::compute_y_range`]). Each curve gets the palette color of its index and
/// its legend name.
/// # Errors
/// This function returns an error if
///  - no curves are given
///  - the spectral range of the parameters is invalid
///  - the curves contain no finite intensity
pub fn assemble(curves: Vec<Curve>, params: &SpectrumParameters) -> PsResult<Chart> {
    let Some(first) = curves.first() else {
        return Err(PlotSpecError::Other("no curves to plot".into()));
    };
    let x_lims = AxLims::new(params.x_start, params.x_end).ok_or_else(|| {
        PlotSpecError::Config(format!(
            "invalid spectral range {} - {}",
            params.x_start, params.x_end
        ))
    })?;
    let y_lims = ax_lims::compute_y_range(&curves, params.mode)?;
    let x_ticks = ticks::ticks_for(x_lims, ticks::DEFAULT_TICK_TARGET);
    let y_ticks = ticks::ticks_for(y_lims, ticks::DEFAULT_TICK_TARGET);
    let x_label = first.x_label().to_owned();
    let y_label = first.y_label().to_owned();
    let title = first.title().to_owned();
    let series = legend_labels(&curves, params)
        .into_iter()
        .enumerate()
        .map(|(index, label)| SeriesStyle {
            color: series_color(index),
            width: LINE_WIDTH,
            label,
        })
        .collect();
    debug!(
        "chart: x {:?} ticks {:?}, y {:?} ticks {:?}",
        x_lims,
        x_ticks.values(),
        y_lims,
        y_ticks.values()
    );
    Ok(Chart {
        curves,
        series,
        x_lims,
        y_lims,
        x_ticks,
        y_ticks,
        x_label,
        y_label,
        title,
        size: WINDOW_SIZE,
    })
}

fn drawing_error(err: impl std::fmt::Display) -> PlotSpecError {
    PlotSpecError::Export(format!("drawing failed: {err}"))
}

/// Scales a logical pixel size.
#[must_use]
pub fn scaled(px: u32, scale: f64) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let px = (f64::from(px) * scale).round().max(1.0) as u32;
    px
}

/// Number of decimals needed to print ticks with the given spacing.
fn tick_decimals(step: f64) -> usize {
    if !step.is_normal() {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let decimals = (-step.log10().floor()).max(0.0) as usize;
    decimals
}

fn tick_formatter(step: f64) -> impl Fn(&f64) -> String {
    let decimals = tick_decimals(step);
    move |v: &f64| {
        let v = if v.abs() < step * 1e-6 { 0.0 } else { *v };
        format!("{v:.decimals$}")
    }
}

/// Width of the y label area. Room for the longest tick label plus the rotated axis title.
fn y_label_area_size(ticks: &TickSet) -> u32 {
    let formatter = tick_formatter(ticks.step());
    let digits = ticks
        .values()
        .iter()
        .map(|v| formatter(v).chars().count())
        .max()
        .unwrap_or(1);
    let digits = u32::try_from(digits).unwrap_or(u32::MAX / 16);
    digits * 9 + 40
}

impl Chart {
    /// Returns the curves of this chart.
    #[must_use]
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }
    /// Returns the series styles, one per curve.
    #[must_use]
    pub fn series(&self) -> &[SeriesStyle] {
        &self.series
    }
    /// Returns the limits of the spectral axis.
    #[must_use]
    pub const fn x_lims(&self) -> AxLims {
        self.x_lims
    }
    /// Returns the limits of the intensity axis.
    #[must_use]
    pub const fn y_lims(&self) -> AxLims {
        self.y_lims
    }
    /// Returns the ticks of the spectral axis.
    #[must_use]
    pub const fn x_ticks(&self) -> &TickSet {
        &self.x_ticks
    }
    /// Returns the ticks of the intensity axis.
    #[must_use]
    pub const fn y_ticks(&self) -> &TickSet {
        &self.y_ticks
    }
    /// Returns the title of the spectral axis.
    #[must_use]
    pub fn x_label(&self) -> &str {
        &self.x_label
    }
    /// Returns the title of the intensity axis.
    #[must_use]
    pub fn y_label(&self) -> &str {
        &self.y_label
    }
    /// Returns the chart title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
    /// Returns the logical size of the chart in pixels.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        self.size
    }
    /// Returns the pixel size of the chart rendered with the given scale.
    #[must_use]
    pub fn scaled_size(&self, scale: f64) -> (u32, u32) {
        (scaled(self.size.0, scale), scaled(self.size.1, scale))
    }
    /// Draws the chart onto the given drawing area.
    ///
    /// All pixel sizes (fonts, margins, line widths) are multiplied by `scale`. The drawing area
    /// should be of [`Chart::scaled_size`].
    /// # Errors
    /// This function returns a [`PlotSpecError::Export`] if the backend fails to draw.
    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        scale: f64,
    ) -> PsResult<()> {
        let px = |v: u32| scaled(v, scale);
        root.fill(&WHITE).map_err(drawing_error)?;
        let mut chart = ChartBuilder::on(root)
            .margin(px(20))
            .margin_right(px(30))
            .x_label_area_size(px(55))
            .y_label_area_size(px(y_label_area_size(&self.y_ticks)))
            .build_cartesian_2d(
                self.x_ticks.axis(self.x_lims),
                self.y_ticks.axis(self.y_lims),
            )
            .map_err(drawing_error)?;
        let x_format = tick_formatter(self.x_ticks.step());
        let y_format = tick_formatter(self.y_ticks.step());
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .x_label_formatter(&x_format)
            .y_label_formatter(&y_format)
            .axis_style(BLACK.stroke_width(px(1)))
            .axis_desc_style((FONT_FAMILY, px(AXIS_TITLE_FONT_SIZE)).into_font())
            .label_style((FONT_FAMILY, px(TICK_LABEL_FONT_SIZE)).into_font())
            .draw()
            .map_err(drawing_error)?;
        // top and right edges of the frame, no ticks or labels
        chart
            .plotting_area()
            .draw(&Rectangle::new(
                [
                    (self.x_lims.min, self.y_lims.min),
                    (self.x_lims.max, self.y_lims.max),
                ],
                BLACK.stroke_width(px(1)),
            ))
            .map_err(drawing_error)?;
        for (curve, style) in self.curves.iter().zip(&self.series) {
            let line_style = style.color.stroke_width(px(style.width));
            let legend_width = i32::try_from(px(20)).unwrap_or(20);
            chart
                .draw_series(LineSeries::new(curve.points(), line_style))
                .map_err(drawing_error)?
                .label(style.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + legend_width, y)], line_style)
                });
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .margin(px(10))
            .legend_area_size(px(30))
            .background_style(WHITE.mix(0.8))
            .border_style(TRANSPARENT)
            .label_font((FONT_FAMILY, px(LEGEND_FONT_SIZE)).into_font())
            .draw()
            .map_err(drawing_error)?;
        root.present().map_err(drawing_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{synthesis::synthesize, units::SpectrumMode};
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use plotters::prelude::{BitMapBackend, IntoDrawingArea, SVGBackend};

    fn curves_for(params: &SpectrumParameters, count: usize) -> Vec<Curve> {
        (0..count).map(|i| synthesize(params, i).unwrap()).collect()
    }
    fn two_curve_params() -> SpectrumParameters {
        SpectrumParameters {
            input_files: vec!["benzene.out".into(), "toluene.out".into()],
            legend_names: vec!["Benzene".into(), "Toluene".into()],
            ..Default::default()
        }
    }
    #[test]
    fn palette() {
        assert_eq!(series_color(0), RGBColor(0x1f, 0x77, 0xb4));
        assert_eq!(series_color(1), RGBColor(0xff, 0x7f, 0x0e));
        assert_eq!(series_color(10), series_color(0));
        assert_ne!(series_color(0), series_color(1));
    }
    #[test]
    fn assemble_absorption() {
        let params = two_curve_params();
        let chart = assemble(curves_for(&params, 2), &params).unwrap();
        assert_eq!(chart.curves().len(), 2);
        assert_relative_eq!(chart.x_lims().min, 200.);
        assert_relative_eq!(chart.x_lims().max, 1000.);
        assert_relative_eq!(chart.y_lims().min, 0.);
        assert!(chart.y_lims().max > 15000.);
        assert_eq!(chart.x_ticks().values(), &[200., 400., 600., 800., 1000.]);
        assert!(!chart.y_ticks().is_empty());
        assert_eq!(chart.series()[0].label, "Benzene");
        assert_eq!(chart.series()[1].label, "Toluene");
        assert_eq!(chart.series()[0].width, LINE_WIDTH);
        assert_ne!(chart.series()[0].color, chart.series()[1].color);
        assert_eq!(chart.x_label(), "Wavelength (nm)");
        assert_eq!(chart.title(), "Absorption Spectra");
        assert_eq!(chart.size(), WINDOW_SIZE);
        assert_eq!(chart.scaled_size(2.0), (2000, 1400));
    }
    #[test]
    fn assemble_circular_dichroism() {
        let params = SpectrumParameters {
            mode: SpectrumMode::CircularDichroism,
            x_end: 400.,
            ..two_curve_params()
        };
        let chart = assemble(curves_for(&params, 2), &params).unwrap();
        assert!(chart.y_lims().min < 0.);
        assert_eq!(chart.y_label(), "Δε (L/(mol·cm))");
    }
    #[test]
    fn assemble_legend_fallback() {
        let mut params = two_curve_params();
        params.legend_names = vec!["only one".into()];
        let chart = assemble(curves_for(&params, 2), &params).unwrap();
        assert_eq!(chart.series()[0].label, "benzene");
        assert_eq!(chart.series()[1].label, "toluene");
        params.input_files.clear();
        let chart = assemble(curves_for(&params, 2), &params).unwrap();
        assert_eq!(chart.series()[1].label, "Spectrum 2");
    }
    #[test]
    fn assemble_empty() {
        assert_matches!(
            assemble(Vec::new(), &SpectrumParameters::default()),
            Err(PlotSpecError::Other(_))
        );
    }
    #[test]
    fn formatter() {
        assert_eq!(tick_decimals(200.), 0);
        assert_eq!(tick_decimals(1.), 0);
        assert_eq!(tick_decimals(0.5), 1);
        assert_eq!(tick_decimals(0.02), 2);
        assert_eq!(tick_decimals(0.), 0);
        let format = tick_formatter(0.2);
        assert_eq!(format(&0.4), "0.4");
        assert_eq!(format(&-1e-17), "0.0");
        let format = tick_formatter(5000.);
        assert_eq!(format(&15000.), "15000");
    }
    #[test]
    fn scaled_sizes() {
        assert_eq!(scaled(16, 2.0), 32);
        assert_eq!(scaled(1, 0.1), 1);
        assert_eq!(scaled(7, 1.5), 11);
    }
    #[test]
    fn draw_svg() {
        let params = two_curve_params();
        let chart = assemble(curves_for(&params, 2), &params).unwrap();
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, chart.size()).into_drawing_area();
            chart.draw(&root, 1.0).unwrap();
        }
        assert!(svg.contains("Wavelength (nm)"));
        assert!(svg.contains("Benzene"));
        assert!(svg.contains("Toluene"));
        assert!(svg.contains("<polyline"));
    }
    #[test]
    fn draw_bitmap() {
        let params = two_curve_params();
        let chart = assemble(curves_for(&params, 1), &params).unwrap();
        let (w, h) = chart.scaled_size(0.5);
        let mut buffer = vec![0u8; (w * h * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
            chart.draw(&root, 0.5).unwrap();
        }
        assert!(buffer.iter().any(|b| *b == 255));
        assert!(buffer.iter().any(|b| *b != 255));
    }
}
