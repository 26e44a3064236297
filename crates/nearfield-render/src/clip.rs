//! Polyline clipping against the axes rectangle.

/// Axis-aligned rectangle with `x0 < x1`, `y0 < y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new((x0, x1): (f64, f64), (y0, y1): (f64, f64)) -> Self {
        Self {
            x0: x0.min(x1),
            x1: x0.max(x1),
            y0: y0.min(y1),
            y1: y0.max(y1),
        }
    }
}

/// Liang–Barsky: the part of segment `p`–`q` inside `rect`, if any.
/// Endpoints inside the rectangle are returned unchanged.
pub fn clip_segment(p: (f64, f64), q: (f64, f64), rect: &Rect) -> Option<((f64, f64), (f64, f64))> {
    let dx = q.0 - p.0;
    let dy = q.1 - p.1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (pk, qk) in [
        (-dx, p.0 - rect.x0),
        (dx, rect.x1 - p.0),
        (-dy, p.1 - rect.y0),
        (dy, rect.y1 - p.1),
    ] {
        if pk == 0.0 {
            if qk < 0.0 {
                return None;
            }
        } else {
            let r = qk / pk;
            if pk < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }

    let at = |t: f64| (p.0 + t * dx, p.1 + t * dy);
    let a = if t0 == 0.0 { p } else { at(t0) };
    let b = if t1 == 1.0 { q } else { at(t1) };
    Some((a, b))
}

/// Split `points` at non-finite samples and clip every piece to `rect`.
/// Each returned polyline has at least two points.
pub fn clip_polyline<I>(points: I, rect: &Rect) -> Vec<Vec<(f64, f64)>>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut out = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut prev: Option<(f64, f64)> = None;

    let mut flush = |current: &mut Vec<(f64, f64)>| {
        if current.len() >= 2 {
            out.push(std::mem::take(current));
        } else {
            current.clear();
        }
    };

    for p in points {
        if !(p.0.is_finite() && p.1.is_finite()) {
            flush(&mut current);
            prev = None;
            continue;
        }
        if let Some(q) = prev {
            match clip_segment(q, p, rect) {
                Some((a, b)) => {
                    if current.last() != Some(&a) {
                        flush(&mut current);
                        current.push(a);
                    }
                    current.push(b);
                }
                None => flush(&mut current),
            }
        }
        prev = Some(p);
    }
    flush(&mut current);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit() -> Rect {
        Rect::new((0.0, 1.0), (0.0, 1.0))
    }

    #[test]
    fn test_segment_inside_is_unchanged() {
        let p = (0.1, 0.2);
        let q = (0.9, 0.7);
        assert_eq!(clip_segment(p, q, &unit()), Some((p, q)));
    }

    #[test]
    fn test_segment_crossing_edge_is_cut() {
        let (a, b) = clip_segment((0.5, 0.5), (0.5, 2.0), &unit()).unwrap();
        assert_eq!(a, (0.5, 0.5));
        assert_relative_eq!(b.1, 1.0);
        let (a, b) = clip_segment((-1.0, 0.0), (1.0, 1.0), &unit()).unwrap();
        assert_relative_eq!(a.0, 0.0);
        assert_relative_eq!(a.1, 0.5);
        assert_eq!(b, (1.0, 1.0));
    }

    #[test]
    fn test_segment_outside_is_dropped() {
        assert_eq!(clip_segment((2.0, 0.0), (3.0, 1.0), &unit()), None);
        assert_eq!(clip_segment((-1.0, 0.5), (0.5, 2.5), &unit()), None);
    }

    #[test]
    fn test_polyline_splits_at_nan() {
        let points = vec![
            (0.1, 0.1),
            (0.2, 0.2),
            (0.3, f64::NAN),
            (0.4, 0.4),
            (0.5, 0.5),
            (0.6, 0.6),
        ];
        let pieces = clip_polyline(points, &unit());
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], vec![(0.1, 0.1), (0.2, 0.2)]);
        assert_eq!(pieces[1], vec![(0.4, 0.4), (0.5, 0.5), (0.6, 0.6)]);
    }

    #[test]
    fn test_polyline_leaving_and_reentering() {
        let points = vec![(0.1, 0.5), (0.3, 0.5), (0.5, 3.0), (0.7, 0.5), (0.9, 0.5)];
        let pieces = clip_polyline(points, &unit());
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].len(), 3);
        assert_relative_eq!(pieces[0][2].1, 1.0);
        assert_relative_eq!(pieces[1][0].1, 1.0);
        assert_eq!(pieces[1].last(), Some(&(0.9, 0.5)));
    }

    #[test]
    fn test_isolated_point_is_not_drawn() {
        let points = vec![(0.1, f64::INFINITY), (0.5, 0.5), (0.6, f64::NAN)];
        assert!(clip_polyline(points, &unit()).is_empty());
    }

    #[test]
    fn test_rect_normalises_limits() {
        let rect = Rect::new((1.0, 0.0), (5.0, -5.0));
        assert_eq!((rect.x0, rect.x1), (0.0, 1.0));
        assert_eq!((rect.y0, rect.y1), (-5.0, 5.0));
    }
}
