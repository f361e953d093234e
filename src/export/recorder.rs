//! A plotters backend that records drawing commands into a display list.
//!
//! The display list is device independent and is translated into PostScript or PDF operators by
//! the vector writers. Text is kept as text (not rasterized) together with its anchor and
//! rotation so the output stays scalable and searchable.
use std::convert::Infallible;

use plotters_backend::{
    text_anchor::{HPos, VPos},
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};

/// Opaque RGB color.
pub type Rgb = (u8, u8, u8);

/// One recorded drawing command. Coordinates are backend pixels with the origin in the upper
/// left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// open stroked path
    Polyline {
        /// vertices
        points: Vec<BackendCoord>,
        /// stroke color
        color: Rgb,
        /// stroke width in pixels
        width: u32,
    },
    /// filled polygon
    Polygon {
        /// vertices
        points: Vec<BackendCoord>,
        /// fill color
        color: Rgb,
    },
    /// axis aligned rectangle
    Rect {
        /// upper left corner
        upper_left: BackendCoord,
        /// lower right corner
        bottom_right: BackendCoord,
        /// fill or stroke color
        color: Rgb,
        /// stroke width in pixels
        width: u32,
        /// fill instead of stroke
        fill: bool,
    },
    /// circle
    Circle {
        /// center point
        center: BackendCoord,
        /// radius in pixels
        radius: u32,
        /// fill or stroke color
        color: Rgb,
        /// stroke width in pixels
        width: u32,
        /// fill instead of stroke
        fill: bool,
    },
    /// text label
    Text {
        /// content as drawn by the chart
        text: String,
        /// anchor point
        pos: BackendCoord,
        /// font size in pixels
        size: f64,
        /// text color
        color: Rgb,
        /// horizontal alignment: 0 for left, 0.5 for centered, 1 for right aligned text
        h_align: f64,
        /// vertical anchor of `pos`
        v_anchor: VerticalAnchor,
        /// counterclockwise rotation in degrees
        rotation: f64,
    },
}

/// Vertical position of a text anchor relative to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    /// anchor at the top of the text
    Top,
    /// anchor at the vertical center of the text
    Center,
    /// anchor at the bottom of the text
    Bottom,
}

impl VerticalAnchor {
    /// Offset from the anchor to the text baseline in units of the font size, measured upwards.
    #[must_use]
    pub const fn baseline_offset(self) -> f64 {
        match self {
            Self::Top => -0.75,
            Self::Center => -0.35,
            Self::Bottom => 0.2,
        }
    }
}

/// Recorded drawing of one chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    /// size of the drawing in pixels
    pub size: (u32, u32),
    /// drawing commands in painting order
    pub items: Vec<Primitive>,
}

/// Plotters backend writing into a [`DisplayList`].
pub struct RecordingBackend<'a> {
    target: &'a mut DisplayList,
}

impl<'a> RecordingBackend<'a> {
    /// Creates a new backend of the given size. The display list is cleared.
    pub fn new(target: &'a mut DisplayList, size: (u32, u32)) -> Self {
        target.size = size;
        target.items.clear();
        Self { target }
    }
}

/// Composes a color over a white page. Returns `None` for fully transparent colors.
fn flatten(color: BackendColor) -> Option<Rgb> {
    if color.alpha <= 0.0 {
        return None;
    }
    let alpha = color.alpha.min(1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let blend = |c: u8| (f64::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
    Some((blend(color.rgb.0), blend(color.rgb.1), blend(color.rgb.2)))
}

const fn rotation_degrees(transform: &FontTransform) -> f64 {
    // plotters rotates clockwise on a y-down canvas
    match transform {
        FontTransform::None => 0.0,
        FontTransform::Rotate90 => -90.0,
        FontTransform::Rotate180 => 180.0,
        FontTransform::Rotate270 => 90.0,
    }
}

/// Approximate advance width of a Helvetica glyph in units of the font size.
fn glyph_width(c: char) -> f64 {
    match c {
        ' ' | '.' | ',' | ':' | ';' | '!' | '\'' | '|' | 'i' | 'j' | 'l' | 'I' | '·' => 0.278,
        'f' | 't' | '(' | ')' | '[' | ']' | '-' | '/' | '⁻' | '¹' => 0.333,
        'r' => 0.333,
        '0'..='9' | '+' | '=' | '<' | '>' | '$' | '#' | '?' | 'a'..='e' | 'g' | 'h' | 'n'
        | 'o' | 'p' | 'q' | 'u' => 0.556,
        'k' | 's' | 'v' | 'x' | 'y' | 'z' | 'J' | 'ε' => 0.5,
        'm' | 'M' => 0.833,
        'w' | 'W' => 0.944,
        'A'..='Z' | 'Δ' => 0.667,
        _ => 0.556,
    }
}

/// Approximate width of `text` set in Helvetica of the given size.
#[must_use]
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().map(glyph_width).sum::<f64>() * size
}

impl DrawingBackend for RecordingBackend<'_> {
    type ErrorType = Infallible;

    fn get_size(&self) -> (u32, u32) {
        self.target.size
    }
    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Infallible>> {
        Ok(())
    }
    fn present(&mut self) -> Result<(), DrawingErrorKind<Infallible>> {
        Ok(())
    }
    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        if let Some(color) = flatten(color) {
            self.target.items.push(Primitive::Rect {
                upper_left: point,
                bottom_right: (point.0 + 1, point.1 + 1),
                color,
                width: 1,
                fill: true,
            });
        }
        Ok(())
    }
    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        self.draw_path([from, to], style)
    }
    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        if let Some(color) = flatten(style.color()) {
            self.target.items.push(Primitive::Rect {
                upper_left,
                bottom_right,
                color,
                width: style.stroke_width(),
                fill,
            });
        }
        Ok(())
    }
    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        let Some(color) = flatten(style.color()) else {
            return Ok(());
        };
        let points: Vec<BackendCoord> = path.into_iter().collect();
        if points.len() > 1 {
            self.target.items.push(Primitive::Polyline {
                points,
                color,
                width: style.stroke_width(),
            });
        }
        Ok(())
    }
    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        if let Some(color) = flatten(style.color()) {
            self.target.items.push(Primitive::Circle {
                center,
                radius,
                color,
                width: style.stroke_width(),
                fill,
            });
        }
        Ok(())
    }
    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        let Some(color) = flatten(style.color()) else {
            return Ok(());
        };
        let points: Vec<BackendCoord> = vert.into_iter().collect();
        if points.len() > 2 {
            self.target.items.push(Primitive::Polygon { points, color });
        }
        Ok(())
    }
    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        let Some(color) = flatten(style.color()) else {
            return Ok(());
        };
        let anchor = style.anchor();
        let h_align = match anchor.h_pos {
            HPos::Left => 0.0,
            HPos::Center => 0.5,
            HPos::Right => 1.0,
        };
        let v_anchor = match anchor.v_pos {
            VPos::Top => VerticalAnchor::Top,
            VPos::Center => VerticalAnchor::Center,
            VPos::Bottom => VerticalAnchor::Bottom,
        };
        self.target.items.push(Primitive::Text {
            text: text.to_owned(),
            pos,
            size: style.size(),
            color,
            h_align,
            v_anchor,
            rotation: rotation_degrees(&style.transform()),
        });
        Ok(())
    }
    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Infallible>> {
        let size = style.size();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let extent = (
            text_width(text, size).ceil() as u32,
            size.ceil() as u32,
        );
        Ok(extent)
    }
}

/// Font a run of text is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunFont {
    /// Helvetica with Latin-1 encoding
    Text,
    /// Symbol font, used for Greek letters
    Symbol,
}

/// Part of a text label set in a single font. The content only consists of Latin-1 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// font of this run
    pub font: RunFont,
    /// Latin-1 content
    pub text: String,
}

/// Maps a Greek letter onto its position in the Symbol font encoding.
const fn symbol_glyph(c: char) -> Option<char> {
    let glyph = match c {
        'Α' => 'A',
        'Β' => 'B',
        'Γ' => 'G',
        'Δ' => 'D',
        'Ε' => 'E',
        'Θ' => 'Q',
        'Λ' => 'L',
        'Π' => 'P',
        'Σ' => 'S',
        'Φ' => 'F',
        'Ψ' => 'Y',
        'Ω' => 'W',
        'α' => 'a',
        'β' => 'b',
        'γ' => 'g',
        'δ' => 'd',
        'ε' => 'e',
        'ζ' => 'z',
        'η' => 'h',
        'θ' => 'q',
        'κ' => 'k',
        'λ' => 'l',
        'μ' => 'm',
        'ν' => 'n',
        'π' => 'p',
        'ρ' => 'r',
        'σ' => 's',
        'τ' => 't',
        'φ' => 'f',
        'χ' => 'c',
        'ψ' => 'y',
        'ω' => 'w',
        _ => return None,
    };
    Some(glyph)
}

/// Maps a character onto Latin-1. Superscript digits and signs become their plain forms.
const fn latin1_glyph(c: char) -> char {
    match c {
        '\u{0}'..='\u{ff}' => c,
        '⁰' => '0',
        '⁴' => '4',
        '⁵' => '5',
        '⁶' => '6',
        '⁷' => '7',
        '⁸' => '8',
        '⁹' => '9',
        '⁻' | '−' | '–' => '-',
        '⁺' => '+',
        _ => '?',
    }
}

/// Splits a label into runs that can be set with the standard PostScript/PDF fonts.
#[must_use]
pub fn text_runs(text: &str) -> Vec<TextRun> {
    let mut runs: Vec<TextRun> = Vec::new();
    for c in text.chars() {
        let (font, glyph) = match symbol_glyph(c) {
            Some(glyph) => (RunFont::Symbol, glyph),
            None => (RunFont::Text, latin1_glyph(c)),
        };
        match runs.last_mut() {
            Some(run) if run.font == font => run.text.push(glyph),
            _ => runs.push(TextRun {
                font,
                text: glyph.to_string(),
            }),
        }
    }
    runs
}
