//! Encapsulated PostScript drawing backend for `plotters`.
//!
//! Drawing operations are recorded as PostScript in a device space of
//! `dpi` units per inch with the origin at the top left, as `plotters`
//! expects. `present` wraps them in an EPSF-3.0 document scaled to points
//! and writes it out. Nothing is painted behind the drawing, so the page
//! stays transparent.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontStyle, FontTransform,
};

use crate::error::RenderError;
use crate::markup::{self, Face, FontFamily, ASCENT, DESCENT};
use crate::style::MAX_DPI;

const PROLOG: &str = "\
/M {moveto} bind def
/L {lineto} bind def
/S {stroke} bind def
/F {fill} bind def
/RGB {setrgbcolor} bind def
/LW {setlinewidth} bind def
";

pub struct EpsBackend {
    path: PathBuf,
    title: String,
    size: (u32, u32),
    dpi: f64,
    body: String,
    fonts: BTreeSet<&'static str>,
}

impl EpsBackend {
    /// A page of `size_inches` at `dpi` device units per inch, written to
    /// `path` on `present`. Fails if the page does not fit in `i32` device
    /// coordinates.
    pub fn new(
        path: impl AsRef<Path>,
        size_inches: (f64, f64),
        dpi: f64,
    ) -> Result<Self, RenderError> {
        let invalid = || RenderError::PageSize {
            width_in: size_inches.0,
            height_in: size_inches.1,
            dpi,
        };
        let units = |inches: f64| -> Option<u32> {
            let v = (inches * dpi).round();
            (v.is_finite() && v >= 1.0 && v <= i32::MAX as f64).then_some(v as u32)
        };
        if !(dpi > 0.0 && dpi <= MAX_DPI) {
            return Err(invalid());
        }
        let size = (
            units(size_inches.0).ok_or_else(invalid)?,
            units(size_inches.1).ok_or_else(invalid)?,
        );
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            title: String::new(),
            size,
            dpi,
            body: String::new(),
            fonts: BTreeSet::new(),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Page size in points.
    pub fn size_points(&self) -> (f64, f64) {
        (
            self.size.0 as f64 * 72.0 / self.dpi,
            self.size.1 as f64 * 72.0 / self.dpi,
        )
    }

    /// The complete EPS document for everything drawn so far.
    pub fn document(&self) -> String {
        let (w, h) = self.size_points();
        let scale = 72.0 / self.dpi;
        let mut doc = String::with_capacity(self.body.len() + 1024);
        doc.push_str("%!PS-Adobe-3.0 EPSF-3.0\n");
        doc.push_str("%%Creator: nearfield-render\n");
        if !self.title.is_empty() {
            let _ = writeln!(doc, "%%Title: {}", self.title);
        }
        let _ = writeln!(doc, "%%BoundingBox: 0 0 {} {}", w.ceil() as u32, h.ceil() as u32);
        let _ = writeln!(doc, "%%HiResBoundingBox: 0 0 {:.3} {:.3}", w, h);
        doc.push_str("%%LanguageLevel: 2\n");
        if !self.fonts.is_empty() {
            let fonts: Vec<&str> = self.fonts.iter().copied().collect();
            let _ = writeln!(doc, "%%DocumentNeededResources: font {}", fonts.join(" "));
        }
        doc.push_str("%%Pages: 1\n%%EndComments\n");
        doc.push_str("%%BeginProlog\n");
        doc.push_str(PROLOG);
        doc.push_str("%%EndProlog\n");
        doc.push_str("%%Page: 1 1\n");
        doc.push_str("gsave\n");
        let _ = writeln!(doc, "{scale:.6} {scale:.6} scale");
        doc.push_str("1 setlinejoin 0 setlinecap\n");
        doc.push_str(&self.body);
        doc.push_str("grestore\nshowpage\n%%Trailer\n%%EOF\n");
        doc
    }

    fn emit(&mut self, line: impl AsRef<str>) {
        self.body.push_str(line.as_ref());
        self.body.push('\n');
    }

    /// Flip to PostScript's bottom-left origin.
    fn point(&self, (x, y): BackendCoord) -> (i32, i32) {
        (x, self.size.1 as i32 - y)
    }

    /// Select `color`; `false` if it is fully transparent.
    fn set_color(&mut self, color: BackendColor) -> bool {
        if color.alpha <= 0.0 {
            return false;
        }
        let (r, g, b) = color.rgb;
        self.emit(format!(
            "{} {} {} RGB",
            channel(r),
            channel(g),
            channel(b)
        ));
        true
    }

    fn stroke_path(&mut self, points: &[BackendCoord], close: bool, fill: bool) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        let (x, y) = self.point(first);
        let mut ops = format!("newpath {x} {y} M");
        for &p in rest {
            let (x, y) = self.point(p);
            let _ = write!(ops, " {x} {y} L");
        }
        if close {
            ops.push_str(" closepath");
        }
        ops.push_str(if fill { " F" } else { " S" });
        self.emit(ops);
    }

    fn font_name(family: FontFamily, face: Face, bold: bool) -> &'static str {
        match (family, face, bold) {
            (_, Face::Symbol, _) => "Symbol",
            (FontFamily::Times, Face::Roman, false) => "Times-Roman",
            (FontFamily::Times, Face::Roman, true) => "Times-Bold",
            (FontFamily::Times, Face::Italic, false) => "Times-Italic",
            (FontFamily::Times, Face::Italic, true) => "Times-BoldItalic",
            (FontFamily::Helvetica, Face::Roman, false) => "Helvetica",
            (FontFamily::Helvetica, Face::Roman, true) => "Helvetica-Bold",
            (FontFamily::Helvetica, Face::Italic, false) => "Helvetica-Oblique",
            (FontFamily::Helvetica, Face::Italic, true) => "Helvetica-BoldOblique",
            (FontFamily::Courier, Face::Roman, false) => "Courier",
            (FontFamily::Courier, Face::Roman, true) => "Courier-Bold",
            (FontFamily::Courier, Face::Italic, false) => "Courier-Oblique",
            (FontFamily::Courier, Face::Italic, true) => "Courier-BoldOblique",
        }
    }
}

fn channel(v: u8) -> String {
    let s = format!("{:.4}", v as f64 / 255.0);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// A PostScript string literal body: parentheses and backslashes escaped,
/// bytes outside printable ASCII as octal.
pub fn ps_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            c if (c as u32) < 256 => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}

fn layout<S: BackendTextStyle>(text: &str, style: &S) -> (Vec<markup::Run>, FontFamily, f64) {
    let family = FontFamily::from_name(style.family().as_str());
    let mut runs = markup::parse(text);
    if matches!(style.style(), FontStyle::Italic | FontStyle::Oblique) {
        for run in runs.iter_mut().filter(|r| r.face == Face::Roman) {
            run.face = Face::Italic;
        }
    }
    let width = markup::width_em(&runs, family) * style.size();
    (runs, family, width)
}

impl DrawingBackend for EpsBackend {
    type ErrorType = io::Error;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        let doc = self.document();
        std::fs::write(&self.path, doc.as_bytes()).map_err(DrawingErrorKind::DrawingError)?;
        debug!("{}: {} bytes of PostScript", self.path.display(), doc.len());
        Ok(())
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if self.set_color(color) {
            let (x, y) = self.point(point);
            self.emit(format!("{x} {} 1 1 rectfill", y - 1));
        }
        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if self.set_color(style.color()) {
            self.emit(format!("{} LW", style.stroke_width()));
            self.stroke_path(&[from, to], false, false);
        }
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if !self.set_color(style.color()) {
            return Ok(());
        }
        let (x0, y0) = self.point(upper_left);
        let (x1, y1) = self.point(bottom_right);
        let (x, y) = (x0.min(x1), y0.min(y1));
        let (w, h) = ((x1 - x0).abs(), (y1 - y0).abs());
        if fill {
            self.emit(format!("{x} {y} {w} {h} rectfill"));
        } else {
            self.emit(format!("{} LW", style.stroke_width()));
            self.emit(format!("{x} {y} {w} {h} rectstroke"));
        }
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let points: Vec<BackendCoord> = path.into_iter().collect();
        if points.len() < 2 || !self.set_color(style.color()) {
            return Ok(());
        }
        self.emit(format!("{} LW", style.stroke_width()));
        self.stroke_path(&points, false, false);
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if !self.set_color(style.color()) {
            return Ok(());
        }
        let (x, y) = self.point(center);
        if fill {
            self.emit(format!("newpath {x} {y} {radius} 0 360 arc closepath F"));
        } else {
            self.emit(format!("{} LW", style.stroke_width()));
            self.emit(format!("newpath {x} {y} {radius} 0 360 arc closepath S"));
        }
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let points: Vec<BackendCoord> = vert.into_iter().collect();
        if points.len() < 3 || !self.set_color(style.color()) {
            return Ok(());
        }
        self.stroke_path(&points, true, true);
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let color = style.color();
        if color.alpha <= 0.0 || text.is_empty() {
            return Ok(());
        }
        let size = style.size();
        let bold = matches!(style.style(), FontStyle::Bold);
        let (runs, family, width) = layout(text, style);

        let anchor = style.anchor();
        let dx = match anchor.h_pos {
            HPos::Left => 0.0,
            HPos::Center => -width / 2.0,
            HPos::Right => -width,
        };
        let dy = match anchor.v_pos {
            VPos::Top => -ASCENT * size,
            VPos::Center => -(ASCENT - DESCENT) / 2.0 * size,
            VPos::Bottom => DESCENT * size,
        };
        // Counter-clockwise degrees in PostScript's y-up space.
        let angle = match style.transform() {
            FontTransform::None => 0,
            FontTransform::Rotate90 => -90,
            FontTransform::Rotate180 => 180,
            FontTransform::Rotate270 => 90,
        };

        let (x, y) = self.point(pos);
        self.emit("gsave");
        self.emit(format!("{x} {y} translate"));
        if angle != 0 {
            self.emit(format!("{angle} rotate"));
        }
        self.set_color(color);
        self.emit(format!("{dx:.2} {dy:.2} M"));
        for run in &runs {
            let font = Self::font_name(family, run.face, bold);
            self.fonts.insert(font);
            self.emit(format!("/{font} findfont {:.2} scalefont setfont", size * run.scale));
            let rise = run.rise * size;
            if rise != 0.0 {
                self.emit(format!("0 {rise:.2} rmoveto"));
            }
            self.emit(format!("({}) show", ps_string(&run.text)));
            if rise != 0.0 {
                self.emit(format!("0 {:.2} rmoveto", -rise));
            }
        }
        self.emit("grestore");
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<io::Error>> {
        let (_, _, width) = layout(text, style);
        let height = (ASCENT + DESCENT) * style.size();
        Ok((width.round() as u32, height.round() as u32))
    }
}
