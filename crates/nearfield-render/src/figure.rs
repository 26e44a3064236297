//! Draw a [`Figure`] with `plotters`.
//!
//! The chart is built in axis space (log10 for log axes) on linear
//! coordinates. Curves are clipped there. Frame, ticks and text are drawn
//! in device units so sizes given in points come out exact.

use log::{debug, warn};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use nearfield_core::{Axis, AxisScale, Figure, Tick};

use crate::clip::{clip_polyline, Rect};
use crate::markup::DESCENT;
use crate::style::RenderStyle;

type DrawResult<T, DB> = Result<T, DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

const ARROW_WIDTH_PT: f64 = 1.0;
const ARROW_SHRINK_PT: f64 = 2.0;
const ARROW_HEAD_LENGTH: f64 = 0.4;
const ARROW_HEAD_HALF_WIDTH: f64 = 0.2;

/// Map a data value onto the axis' linear drawing coordinate.
pub fn axis_coord(axis: &Axis, value: f64) -> f64 {
    match axis.scale {
        AxisScale::Linear => value,
        AxisScale::Log => value.log10(),
    }
}

fn axis_range(axis: &Axis) -> (f64, f64) {
    let a = axis_coord(axis, axis.limits.0);
    let b = axis_coord(axis, axis.limits.1);
    (a.min(b), a.max(b))
}

/// Ticks that fall inside the axis limits.
pub fn visible_ticks(axis: &Axis) -> impl Iterator<Item = &Tick> + '_ {
    let (lo, hi) = axis_range(axis);
    let tol = 1e-9 * (hi - lo);
    axis.ticks.iter().filter(move |t| {
        let u = axis_coord(axis, t.value);
        u >= lo - tol && u <= hi + tol
    })
}

/// Shaft and open head of an arrow from `tail` to `head` in device units,
/// or `None` if the arrow is shorter than its end gaps.
pub fn arrow_geometry(
    tail: (f64, f64),
    head: (f64, f64),
    shrink: f64,
    head_length: f64,
    head_half_width: f64,
) -> Option<([(f64, f64); 2], [(f64, f64); 3])> {
    let (dx, dy) = (head.0 - tail.0, head.1 - tail.1);
    let len = dx.hypot(dy);
    if !(len > 2.0 * shrink) {
        return None;
    }
    let (ux, uy) = (dx / len, dy / len);
    let start = (tail.0 + ux * shrink, tail.1 + uy * shrink);
    let tip = (head.0 - ux * shrink, head.1 - uy * shrink);
    let base = (tip.0 - ux * head_length, tip.1 - uy * head_length);
    let (nx, ny) = (-uy * head_half_width, ux * head_half_width);
    Some((
        [start, tip],
        [(base.0 + nx, base.1 + ny), tip, (base.0 - nx, base.1 - ny)],
    ))
}

fn device(p: (f64, f64)) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

fn font(family: &str, size: f64) -> TextStyle<'_> {
    (family, size).into_font().color(&BLACK)
}

/// Margins around the plotting area, in device units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Margins {
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
}

/// Text extents that decide the margins.
#[derive(Debug, Clone, Copy, Default)]
struct TextExtents {
    x_tick_height: u32,
    x_last_tick_width: u32,
    y_tick_width: u32,
    y_tick_height: u32,
    x_label_height: u32,
    y_label_height: u32,
}

fn measure<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
    style: &RenderStyle,
) -> DrawResult<TextExtents, DB> {
    let family = style.font_family.as_str();
    let x_tick_font = font(family, style.pt(figure.x_axis.tick_pt));
    let y_tick_font = font(family, style.pt(figure.y_axis.tick_pt));
    let mut ext = TextExtents::default();

    for tick in visible_ticks(&figure.x_axis) {
        let (w, h) = root.estimate_text_size(&tick.label, &x_tick_font)?;
        ext.x_tick_height = ext.x_tick_height.max(h);
        ext.x_last_tick_width = w;
    }
    for tick in visible_ticks(&figure.y_axis) {
        let (w, h) = root.estimate_text_size(&tick.label, &y_tick_font)?;
        ext.y_tick_width = ext.y_tick_width.max(w);
        ext.y_tick_height = ext.y_tick_height.max(h);
    }
    ext.x_label_height = root
        .estimate_text_size(&figure.x_axis.label, &font(family, style.pt(figure.x_axis.label_pt)))?
        .1;
    ext.y_label_height = root
        .estimate_text_size(&figure.y_axis.label, &font(family, style.pt(figure.y_axis.label_pt)))?
        .1;
    Ok(ext)
}

fn margins(ext: &TextExtents, style: &RenderStyle) -> Margins {
    let pad = style.pt(style.pad_pt);
    let tick = style.pt(style.tick_length_pt);
    let px = |v: f64| v.ceil().max(0.0) as u32;
    Margins {
        left: px(pad + ext.y_label_height as f64 + pad + ext.y_tick_width as f64 + pad + tick),
        right: px(pad + ext.x_last_tick_width as f64 / 2.0),
        top: px(pad + ext.y_tick_height as f64 / 2.0),
        bottom: px(tick + pad + ext.x_tick_height as f64 + pad + ext.x_label_height as f64 + pad),
    }
}

/// Draw `figure` onto `root`, which must cover the whole backend.
pub fn render<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
    style: &RenderStyle,
) -> DrawResult<(), DB> {
    let ext = measure(figure, root, style)?;
    let m = margins(&ext, style);
    debug!("{}: margins {:?}", figure.file_stem, m);

    let (x0, x1) = axis_range(&figure.x_axis);
    let (y0, y1) = axis_range(&figure.y_axis);
    let mut chart = ChartBuilder::on(root)
        .margin_left(m.left)
        .margin_right(m.right)
        .margin_top(m.top)
        .margin_bottom(m.bottom)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    // Curves first so frame and annotations sit on top.
    let rect = Rect::new((x0, x1), (y0, y1));
    let curve_width = style.pt(style.curve_width_pt).round() as u32;
    for curve in &figure.curves {
        let bad = curve.non_finite_count();
        if bad > 0 {
            warn!("{}: l = {} has {bad} non-finite samples", figure.file_stem, curve.order);
        }
        let grey = (curve.shade * 255.0).round().clamp(0.0, 255.0) as u8;
        let line = RGBColor(grey, grey, grey).stroke_width(curve_width);
        let points = curve
            .points()
            .map(|(x, y)| (axis_coord(&figure.x_axis, x), axis_coord(&figure.y_axis, y)));
        for piece in clip_polyline(points, &rect) {
            chart.draw_series(LineSeries::new(piece, line))?;
        }
    }

    let base = root.get_base_pixel();
    let to_root = |p: (f64, f64)| -> (i32, i32) {
        let (bx, by) = chart.backend_coord(&p);
        (bx - base.0, by - base.1)
    };
    let data_to_root = |(x, y): (f64, f64)| {
        to_root((axis_coord(&figure.x_axis, x), axis_coord(&figure.y_axis, y)))
    };

    let family = style.font_family.as_str();
    let axis_line = BLACK.stroke_width(style.pt(style.axis_width_pt).round().max(1.0) as u32);
    let tick = style.pt(style.tick_length_pt).round() as i32;
    let pad = style.pt(style.pad_pt).round() as i32;

    // Box frame
    let (left, bottom) = to_root((x0, y0));
    let (right, top) = to_root((x1, y1));
    root.draw(&PathElement::new(
        vec![(left, bottom), (right, bottom), (right, top), (left, top), (left, bottom)],
        axis_line,
    ))?;

    // x ticks, outward below the frame
    let x_tick_font =
        font(family, style.pt(figure.x_axis.tick_pt)).pos(Pos::new(HPos::Center, VPos::Top));
    for t in visible_ticks(&figure.x_axis) {
        let (bx, _) = to_root((axis_coord(&figure.x_axis, t.value), y0));
        root.draw(&PathElement::new(vec![(bx, bottom), (bx, bottom + tick)], axis_line))?;
        root.draw(&Text::new(t.label.clone(), (bx, bottom + tick + pad), x_tick_font.clone()))?;
    }

    // y ticks, outward left of the frame
    let y_tick_font =
        font(family, style.pt(figure.y_axis.tick_pt)).pos(Pos::new(HPos::Right, VPos::Center));
    for t in visible_ticks(&figure.y_axis) {
        let (_, by) = to_root((x0, axis_coord(&figure.y_axis, t.value)));
        root.draw(&PathElement::new(vec![(left - tick, by), (left, by)], axis_line))?;
        root.draw(&Text::new(t.label.clone(), (left - tick - pad, by), y_tick_font.clone()))?;
    }

    // Axis titles
    let x_label_y = bottom + tick + pad + ext.x_tick_height as i32 + pad;
    root.draw(&Text::new(
        figure.x_axis.label.clone(),
        ((left + right) / 2, x_label_y),
        font(family, style.pt(figure.x_axis.label_pt)).pos(Pos::new(HPos::Center, VPos::Top)),
    ))?;
    let y_label_x = left - tick - pad - ext.y_tick_width as i32 - pad;
    root.draw(&Text::new(
        figure.y_axis.label.clone(),
        (y_label_x, (top + bottom) / 2),
        font(family, style.pt(figure.y_axis.label_pt))
            .transform(FontTransform::Rotate270)
            .pos(Pos::new(HPos::Center, VPos::Bottom)),
    ))?;

    // Free text, left/baseline anchored
    for label in &figure.labels {
        let size = style.pt(label.font_pt);
        let (bx, by) = data_to_root(label.at);
        let descent = (DESCENT * size).round() as i32;
        root.draw(&Text::new(
            label.text.clone(),
            (bx, by + descent),
            font(family, size).pos(Pos::new(HPos::Left, VPos::Bottom)),
        ))?;
    }

    if let Some(arrow) = &figure.arrow {
        let (tx, ty) = data_to_root(arrow.tail);
        let (hx, hy) = data_to_root(arrow.head);
        let size = style.pt(arrow.size_pt);
        let stroke = BLACK.stroke_width(style.pt(ARROW_WIDTH_PT).round().max(1.0) as u32);
        match arrow_geometry(
            (tx as f64, ty as f64),
            (hx as f64, hy as f64),
            style.pt(ARROW_SHRINK_PT),
            ARROW_HEAD_LENGTH * size,
            ARROW_HEAD_HALF_WIDTH * size,
        ) {
            Some((shaft, head)) => {
                root.draw(&PathElement::new(shaft.map(device).to_vec(), stroke))?;
                root.draw(&PathElement::new(head.map(device).to_vec(), stroke))?;
            }
            None => warn!("{}: arrow too short to draw", figure.file_stem),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nearfield_core::{compute, NearfieldParams};

    use crate::eps::EpsBackend;

    fn log_axis() -> Axis {
        Axis {
            label: "x".into(),
            scale: AxisScale::Log,
            limits: (0.104, 10.0),
            ticks: vec![Tick::new(0.1, "0.1"), Tick::new(1.0, "1"), Tick::new(10.0, "10")],
            label_pt: 16.0,
            tick_pt: 12.0,
        }
    }

    #[test]
    fn test_axis_coord() {
        let axis = log_axis();
        assert_relative_eq!(axis_coord(&axis, 100.0), 2.0);
        let linear = Axis {
            scale: AxisScale::Linear,
            ..log_axis()
        };
        assert_eq!(axis_coord(&linear, -80.0), -80.0);
    }

    #[test]
    fn test_ticks_outside_limits_are_hidden() {
        let axis = log_axis();
        let labels: Vec<&str> = visible_ticks(&axis).map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "10"]);
    }

    #[test]
    fn test_arrow_geometry() {
        let (shaft, head) = arrow_geometry((0.0, 0.0), (100.0, 0.0), 2.0, 8.0, 4.0).unwrap();
        assert_eq!(shaft, [(2.0, 0.0), (98.0, 0.0)]);
        assert_eq!(head[1], (98.0, 0.0));
        assert_relative_eq!(head[0].0, 90.0);
        assert_relative_eq!(head[0].1, 4.0);
        assert_relative_eq!(head[2].1, -4.0);
        assert!(arrow_geometry((0.0, 0.0), (3.0, 0.0), 2.0, 8.0, 4.0).is_none());
    }

    #[test]
    fn test_render_every_figure() {
        let dir = tempfile::tempdir().unwrap();
        let style = RenderStyle::default();
        for figure in compute(&NearfieldParams::default()).unwrap() {
            let path = dir.path().join(format!("{}.eps", figure.file_stem));
            let root = EpsBackend::new(&path, figure.size_inches, style.dpi)
                .unwrap()
                .into_drawing_area();
            render(&figure, &root, &style).unwrap();
            root.present().unwrap();

            let doc = std::fs::read_to_string(&path).unwrap();
            assert!(doc.starts_with("%!PS-Adobe"));
            // One stroke per curve at least, plus frame and ticks.
            assert!(doc.matches(" S\n").count() > figure.curves.len());
            assert!(doc.contains("(6) show"));
            assert!(doc.contains("90 rotate"));
            if figure.file_stem == "nearfield_amplification" {
                assert!(doc.contains("/Symbol findfont"), "ζ must be set in Symbol");
            }
        }
    }

    #[test]
    fn test_margins_grow_with_text() {
        let style = RenderStyle::default();
        let small = margins(&TextExtents::default(), &style);
        let big = margins(
            &TextExtents {
                y_tick_width: 500,
                ..TextExtents::default()
            },
            &style,
        );
        assert_eq!(big.left, small.left + 500);
        assert_eq!(big.bottom, small.bottom);
    }
}
