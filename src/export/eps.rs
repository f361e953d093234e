//! Encapsulated PostScript writer for recorded display lists.
use std::io::{self, Write};

use super::recorder::{text_runs, DisplayList, Primitive, Rgb, RunFont};

/// Size of one pixel in PostScript points (96 dpi).
pub const PT_PER_PX: f64 = 0.75;

const PROLOG: &str = r"/plotspecdict 16 dict def
plotspecdict begin
/ReEncode {
  findfont dup length dict begin
  { 1 index /FID ne { def } { pop pop } ifelse } forall
  /Encoding ISOLatin1Encoding def
  currentdict end definefont pop
} bind def
/Helvetica-Latin1 /Helvetica ReEncode
% runs size hfrac baseline -> shows the runs aligned at the current origin
/ptext {
  /dy exch def /hf exch def /sz exch def /runs exch def
  /w 0 def
  0 2 runs length 1 sub {
    /i exch def
    runs i get findfont sz scalefont setfont
    /w w runs i 1 add get stringwidth pop add def
  } for
  w hf mul neg dy moveto
  0 2 runs length 1 sub {
    /i exch def
    runs i get findfont sz scalefont setfont
    runs i 1 add get show
  } for
} bind def
end
";

/// Escapes a Latin-1 string as PostScript string literal (without parentheses).
fn ps_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            ' '..='~' => escaped.push(c),
            _ => escaped.push_str(&format!("\\{:03o}", u32::from(c).min(255))),
        }
    }
    escaped
}

struct PsCanvas<'a, W: Write> {
    height: f64,
    out: &'a mut W,
}

impl<W: Write> PsCanvas<'_, W> {
    fn x(px: i32) -> f64 {
        f64::from(px) * PT_PER_PX
    }
    fn y(&self, px: i32) -> f64 {
        self.height - f64::from(px) * PT_PER_PX
    }
    fn color(&mut self, (r, g, b): Rgb) -> io::Result<()> {
        writeln!(
            self.out,
            "{:.3} {:.3} {:.3} setrgbcolor",
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0
        )
    }
    fn line_width(&mut self, width: u32) -> io::Result<()> {
        writeln!(self.out, "{:.2} setlinewidth", f64::from(width) * PT_PER_PX)
    }
    fn path(&mut self, points: &[(i32, i32)]) -> io::Result<()> {
        writeln!(self.out, "newpath")?;
        for (i, (x, y)) in points.iter().enumerate() {
            let op = if i == 0 { "moveto" } else { "lineto" };
            writeln!(self.out, "{:.2} {:.2} {op}", Self::x(*x), self.y(*y))?;
        }
        Ok(())
    }
    fn primitive(&mut self, item: &Primitive) -> io::Result<()> {
        match item {
            Primitive::Polyline {
                points,
                color,
                width,
            } => {
                self.color(*color)?;
                self.line_width(*width)?;
                self.path(points)?;
                writeln!(self.out, "stroke")
            }
            Primitive::Polygon { points, color } => {
                self.color(*color)?;
                self.path(points)?;
                writeln!(self.out, "closepath fill")
            }
            Primitive::Rect {
                upper_left,
                bottom_right,
                color,
                width,
                fill,
            } => {
                self.color(*color)?;
                let (x0, y0) = (Self::x(upper_left.0), self.y(bottom_right.1));
                let (x1, y1) = (Self::x(bottom_right.0), self.y(upper_left.1));
                let op = if *fill {
                    "rectfill"
                } else {
                    self.line_width(*width)?;
                    "rectstroke"
                };
                writeln!(
                    self.out,
                    "{x0:.2} {y0:.2} {:.2} {:.2} {op}",
                    x1 - x0,
                    y1 - y0
                )
            }
            Primitive::Circle {
                center,
                radius,
                color,
                width,
                fill,
            } => {
                self.color(*color)?;
                writeln!(
                    self.out,
                    "newpath {:.2} {:.2} {:.2} 0 360 arc closepath",
                    Self::x(center.0),
                    self.y(center.1),
                    f64::from(*radius) * PT_PER_PX
                )?;
                if *fill {
                    writeln!(self.out, "fill")
                } else {
                    self.line_width(*width)?;
                    writeln!(self.out, "stroke")
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
                    return Ok(());
                }
                let size = size * PT_PER_PX;
                self.color(*color)?;
                writeln!(
                    self.out,
                    "gsave {:.2} {:.2} translate {rotation:.1} rotate",
                    Self::x(pos.0),
                    self.y(pos.1)
                )?;
                write!(self.out, "[")?;
                for run in runs {
                    let font = match run.font {
                        RunFont::Text => "/Helvetica-Latin1",
                        RunFont::Symbol => "/Symbol",
                    };
                    write!(self.out, " {font} ({})", ps_string(&run.text))?;
                }
                writeln!(
                    self.out,
                    " ] {size:.2} {h_align:.2} {:.2} ptext grestore",
                    v_anchor.baseline_offset() * size
                )
            }
        }
    }
}

/// Writes the display list as a single page EPS file.
/// # Errors
/// This function returns an error if writing to `out` fails.
pub fn write_eps<W: Write>(list: &DisplayList, title: &str, out: &mut W) -> io::Result<()> {
    let width = f64::from(list.size.0) * PT_PER_PX;
    let height = f64::from(list.size.1) * PT_PER_PX;
    writeln!(out, "%!PS-Adobe-3.0 EPSF-3.0")?;
    writeln!(
        out,
        "%%BoundingBox: 0 0 {:.0} {:.0}",
        width.ceil(),
        height.ceil()
    )?;
    writeln!(out, "%%HiResBoundingBox: 0 0 {width:.3} {height:.3}")?;
    writeln!(out, "%%Title: ({})", ps_string(title))?;
    writeln!(out, "%%Creator: plotspec {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "%%LanguageLevel: 2")?;
    writeln!(out, "%%Pages: 1")?;
    writeln!(out, "%%EndComments")?;
    writeln!(out, "%%BeginProlog")?;
    out.write_all(PROLOG.as_bytes())?;
    writeln!(out, "%%EndProlog")?;
    writeln!(out, "%%Page: 1 1")?;
    writeln!(out, "plotspecdict begin")?;
    writeln!(out, "1 setlinejoin 1 setlinecap")?;
    let mut canvas = PsCanvas {
        height,
        out: &mut *out,
    };
    for item in &list.items {
        canvas.primitive(item)?;
    }
    writeln!(out, "end")?;
    writeln!(out, "showpage")?;
    writeln!(out, "%%EOF")?;
    Ok(())
}
