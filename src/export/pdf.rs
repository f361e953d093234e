//! PDF writer for recorded display lists based on `printpdf`.
use std::{f64::consts::PI, fs::File, io::BufWriter, path::Path};

use printpdf::{
    path::{PaintMode, WindingOrder},
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
    Pt, TextMatrix,
};

use super::recorder::{text_runs, text_width, DisplayList, Primitive, Rgb, RunFont};
use crate::error::{PlotSpecError, PsResult};

/// Size of one pixel in millimeters (96 dpi).
pub const MM_PER_PX: f64 = 0.264_583;
/// Size of one pixel in points (96 dpi).
pub const PT_PER_PX: f64 = 0.75;
/// Number of segments used to approximate circles.
const CIRCLE_SEGMENTS: u32 = 36;

#[allow(clippy::cast_possible_truncation)]
fn mm(px: f64) -> Mm {
    Mm((px * MM_PER_PX) as f32)
}
#[allow(clippy::cast_possible_truncation)]
fn pt(px: f64) -> Pt {
    Pt((px * PT_PER_PX) as f32)
}
fn pdf_color((r, g, b): Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

struct PdfCanvas {
    layer: PdfLayerReference,
    height: f64,
    text_font: IndirectFontRef,
    symbol_font: IndirectFontRef,
}

impl PdfCanvas {
    fn point(&self, x: f64, y: f64) -> (Point, bool) {
        (Point::new(mm(x), mm(self.height - y)), false)
    }
    fn points(&self, coords: &[(i32, i32)]) -> Vec<(Point, bool)> {
        coords
            .iter()
            .map(|(x, y)| self.point(f64::from(*x), f64::from(*y)))
            .collect()
    }
    fn stroke(&self, points: Vec<(Point, bool)>, color: Rgb, width: u32, closed: bool) {
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(pt(f64::from(width)).0);
        self.layer.add_line(Line {
            points,
            is_closed: closed,
        });
    }
    fn fill(&self, points: Vec<(Point, bool)>, color: Rgb) {
        self.layer.set_fill_color(pdf_color(color));
        self.layer.add_polygon(Polygon {
            rings: vec![points],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }
    fn primitive(&self, item: &Primitive) {
        match item {
            Primitive::Polyline {
                points,
                color,
                width,
            } => self.stroke(self.points(points), *color, *width, false),
            Primitive::Polygon { points, color } => self.fill(self.points(points), *color),
            Primitive::Rect {
                upper_left,
                bottom_right,
                color,
                width,
                fill,
            } => {
                let corners = self.points(&[
                    *upper_left,
                    (bottom_right.0, upper_left.1),
                    *bottom_right,
                    (upper_left.0, bottom_right.1),
                ]);
                if *fill {
                    self.fill(corners, *color);
                } else {
                    self.stroke(corners, *color, *width, true);
                }
            }
            Primitive::Circle {
                center,
                radius,
                color,
                width,
                fill,
            } => {
                let (cx, cy) = (f64::from(center.0), f64::from(center.1));
                let r = f64::from(*radius);
                let ring = (0..CIRCLE_SEGMENTS)
                    .map(|i| {
                        let phi = 2.0 * PI * f64::from(i) / f64::from(CIRCLE_SEGMENTS);
                        self.point(r.mul_add(phi.cos(), cx), r.mul_add(phi.sin(), cy))
                    })
                    .collect();
                if *fill {
                    self.fill(ring, *color);
                } else {
                    self.stroke(ring, *color, *width, true);
                }
            }
            Primitive::Text {
                text,
                pos,
                size,
                color,
                h_align,
                v_anchor,
                rotation,
            } => {
                let runs = text_runs(text);
                if runs.is_empty() {
                    return;
                }
                let width: f64 = runs.iter().map(|r| text_width(&r.text, *size)).sum();
                // offset of the baseline start relative to the anchor, in the rotated frame
                let dx = -h_align * width;
                let dy = v_anchor.baseline_offset() * size;
                let (sin, cos) = rotation.to_radians().sin_cos();
                let x = f64::from(pos.0) + dx * cos - dy * sin;
                let y = self.height - f64::from(pos.1) + dx * sin + dy * cos;
                #[allow(clippy::cast_possible_truncation)]
                let angle = *rotation as f32;
                let font_size = pt(*size).0;
                self.layer.begin_text_section();
                self.layer.set_fill_color(pdf_color(*color));
                self.layer
                    .set_text_matrix(TextMatrix::TranslateRotate(pt(x), pt(y), angle));
                for run in runs {
                    let font = match run.font {
                        RunFont::Text => &self.text_font,
                        RunFont::Symbol => &self.symbol_font,
                    };
                    self.layer.set_font(font, font_size);
                    self.layer.write_text(run.text, font);
                }
                self.layer.end_text_section();
            }
        }
    }
}

fn pdf_error(err: impl std::fmt::Display) -> PlotSpecError {
    PlotSpecError::Export(format!("pdf export failed: {err}"))
}

/// Writes the display list as a single page PDF document to `path`.
/// # Errors
/// This function returns an error if the builtin fonts cannot be registered or the file cannot be
/// written.
pub fn write_pdf(list: &DisplayList, title: &str, path: &Path) -> PsResult<()> {
    let width = f64::from(list.size.0);
    let height = f64::from(list.size.1);
    let (doc, page, layer) = PdfDocument::new(title, mm(width), mm(height), "Layer 1");
    let canvas = PdfCanvas {
        layer: doc.get_page(page).get_layer(layer),
        height,
        text_font: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?,
        symbol_font: doc
            .add_builtin_font(BuiltinFont::Symbol)
            .map_err(pdf_error)?,
    };
    for item in &list.items {
        canvas.primitive(item);
    }
    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer).map_err(pdf_error)
}
