//! The three published figures: near-field amplification, and near-field
//! compensation at 5 cm and at 1 m.

use log::debug;

use crate::error::NearfieldError;
use crate::figure::{Arrow, Axis, AxisScale, Curve, Figure, TextLabel, Tick};
use crate::formulas::{amplification_db_curve, compensation_db_curve};
use crate::grid::Grid;
use crate::NearfieldParams;

const FIGURE_SIZE_INCHES: (f64, f64) = (5.0, 3.3);
const AXIS_LABEL_PT: f64 = 16.0;
const TICK_LABEL_PT: f64 = 12.0;
const TEXT_LABEL_PT: f64 = 14.0;
const ARROW_SIZE_PT: f64 = 20.0;

/// Source-to-listener distance of a compensation figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompensationRadius {
    /// s = 0.05 m
    FiveCentimetres,
    /// s = 1.0 m
    OneMetre,
}

impl CompensationRadius {
    pub fn metres(self) -> f64 {
        match self {
            CompensationRadius::FiveCentimetres => 0.05,
            CompensationRadius::OneMetre => 1.0,
        }
    }

    fn file_stem(self) -> &'static str {
        match self {
            CompensationRadius::FiveCentimetres => "nearfield_compensation_5cm",
            CompensationRadius::OneMetre => "nearfield_compensation_100cm",
        }
    }

    /// `(l = 1 label, l = lmax label, arrow tail, arrow head)` positions.
    fn annotation_layout(self) -> [(f64, f64); 4] {
        match self {
            CompensationRadius::FiveCentimetres => {
                [(65.0, -10.0), (100.0, 75.0), (90.0, 0.0), (107.0, 72.0)]
            }
            CompensationRadius::OneMetre => {
                [(65.0, -6.0), (100.0, -98.0), (90.0, -8.0), (105.0, -86.0)]
            }
        }
    }
}

/// ζ grid: 100 points from 0.1 to 10.
pub fn zeta_grid(params: &NearfieldParams) -> Result<Grid, NearfieldError> {
    Grid::logspace(-1.0, 1.0, params.num_zeta)
}

/// Frequency grid: 2·logspace(1, 4), i.e. 20 Hz to 20 kHz.
pub fn frequency_grid(params: &NearfieldParams) -> Result<Grid, NearfieldError> {
    Grid::logspace(1.0, 4.0, params.num_freq)?.scaled(2.0)
}

/// |F_l(ζ)| in dB for l = 1..=lmax.
pub fn nearfield_amplification(params: &NearfieldParams) -> Result<Figure, NearfieldError> {
    params.validate()?;
    let grid = zeta_grid(params)?;
    let lmax = params.max_order;

    let curves: Vec<Curve> = (1..=lmax)
        .map(|l| Curve::from_values(l, lmax, &grid, amplification_db_curve(l, &grid)))
        .collect();
    log_curves("nearfield_amplification", &curves);

    let x_ticks = [
        (0.1, "0.1"),
        (0.2, "0.2"),
        (0.5, "0.5"),
        (1.0, "1"),
        (2.0, "2"),
        (5.0, "5"),
        (10.0, "10"),
    ];
    let y_ticks = [
        (0.0, "0"),
        (20.0, "20"),
        (40.0, "40"),
        (60.0, "60"),
        (80.0, "80"),
        (100.0, "100"),
    ];

    Ok(Figure {
        file_stem: "nearfield_amplification".to_string(),
        title: "Near-field amplification".to_string(),
        size_inches: FIGURE_SIZE_INCHES,
        x_axis: axis(r"$\zeta$", AxisScale::Log, x_limits(&grid), &x_ticks),
        y_axis: axis(r"$|F_l(\zeta)|$ (dB)", AxisScale::Linear, (-10.0, 110.0), &y_ticks),
        curves,
        labels: order_labels(lmax, (0.14, 5.0), (0.34, 58.0)),
        arrow: Some(Arrow {
            tail: (0.17, 11.0),
            head: (0.34, 58.0),
            size_pt: ARROW_SIZE_PT,
        }),
    })
}

/// Compensation magnitude 20·log10(s·H_l(f)·|A_l(k, s)|) for l = 1..=lmax.
pub fn nearfield_compensation(
    params: &NearfieldParams,
    radius: CompensationRadius,
) -> Result<Figure, NearfieldError> {
    params.validate()?;
    let grid = frequency_grid(params)?;
    let lmax = params.max_order;
    let s = radius.metres();

    let curves: Vec<Curve> = (1..=lmax)
        .map(|l| {
            let y = compensation_db_curve(l, &grid, s, params.speed_of_sound);
            Curve::from_values(l, lmax, &grid, y)
        })
        .collect();
    log_curves(radius.file_stem(), &curves);

    // Ticks sit at Hz values but are labelled in kHz.
    let x_ticks = [
        (20.0, "0.02"),
        (50.0, "0.05"),
        (100.0, "0.1"),
        (200.0, "0.2"),
        (500.0, "0.5"),
        (1000.0, "1"),
        (2000.0, "2"),
        (5000.0, "5"),
        (10000.0, "10"),
        (20000.0, "20"),
    ];
    let y_ticks = [
        (-80.0, "$-80$"),
        (-60.0, "$-60$"),
        (-40.0, "$-40$"),
        (-20.0, "$-20$"),
        (0.0, "0"),
        (20.0, "20"),
        (40.0, "40"),
        (60.0, "60"),
        (80.0, "80"),
    ];

    let [first, last, tail, head] = radius.annotation_layout();
    Ok(Figure {
        file_stem: radius.file_stem().to_string(),
        title: format!("Near-field compensation, s = {} m", s),
        size_inches: FIGURE_SIZE_INCHES,
        x_axis: axis("Frequency $f$ (kHz)", AxisScale::Log, x_limits(&grid), &x_ticks),
        y_axis: axis("Magnitude (dB)", AxisScale::Linear, (-100.0, 100.0), &y_ticks),
        curves,
        labels: order_labels(lmax, first, last),
        arrow: Some(Arrow {
            tail,
            head,
            size_pt: ARROW_SIZE_PT,
        }),
    })
}

/// All three figures in publication order.
pub fn all(params: &NearfieldParams) -> Result<Vec<Figure>, NearfieldError> {
    Ok(vec![
        nearfield_amplification(params)?,
        nearfield_compensation(params, CompensationRadius::FiveCentimetres)?,
        nearfield_compensation(params, CompensationRadius::OneMetre)?,
    ])
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn axis(label: &str, scale: AxisScale, limits: (f64, f64), ticks: &[(f64, &str)]) -> Axis {
    Axis {
        label: label.to_string(),
        scale,
        limits,
        ticks: ticks.iter().map(|&(v, l)| Tick::new(v, l)).collect(),
        label_pt: AXIS_LABEL_PT,
        tick_pt: TICK_LABEL_PT,
    }
}

/// The visible x range starts at the second grid point and ends at the last.
fn x_limits(grid: &Grid) -> (f64, f64) {
    (grid.get(1).unwrap_or(grid.first()), grid.last())
}

fn order_labels(lmax: u32, first: (f64, f64), last: (f64, f64)) -> Vec<TextLabel> {
    vec![
        TextLabel {
            text: "$l = 1$".to_string(),
            at: first,
            font_pt: TEXT_LABEL_PT,
        },
        TextLabel {
            text: lmax.to_string(),
            at: last,
            font_pt: TEXT_LABEL_PT,
        },
    ]
}

fn log_curves(name: &str, curves: &[Curve]) {
    for curve in curves {
        match curve.finite_range() {
            Some((lo, hi)) => debug!(
                "{name}: l = {} spans {lo:.1} .. {hi:.1} dB ({} non-finite)",
                curve.order,
                curve.non_finite_count()
            ),
            None => debug!("{name}: l = {} has no finite samples", curve.order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_all_returns_three_named_figures() {
        let figures = all(&NearfieldParams::default()).unwrap();
        let stems: Vec<&str> = figures.iter().map(|f| f.file_stem.as_str()).collect();
        assert_eq!(
            stems,
            vec![
                "nearfield_amplification",
                "nearfield_compensation_5cm",
                "nearfield_compensation_100cm"
            ]
        );
        for fig in &figures {
            assert_eq!(fig.size_inches, (5.0, 3.3));
            assert_eq!(fig.curves.len(), 6);
            assert_eq!(fig.labels.len(), 2);
            assert_eq!(fig.labels[1].text, "6");
            assert!(fig.arrow.is_some());
        }
    }

    #[test]
    fn test_amplification_axes() {
        let fig = nearfield_amplification(&NearfieldParams::default()).unwrap();
        assert_eq!(fig.x_axis.scale, AxisScale::Log);
        assert_eq!(fig.y_axis.limits, (-10.0, 110.0));
        // Lower x limit is the second ζ sample, not 0.1.
        let zeta1 = 10f64.powf(-1.0 + 2.0 / 99.0);
        assert_relative_eq!(fig.x_axis.limits.0, zeta1, max_relative = 1e-12);
        assert_relative_eq!(fig.x_axis.limits.1, 10.0, max_relative = 1e-12);
        assert_eq!(fig.x_axis.tick_label(0.5), Some("0.5"));
        for curve in &fig.curves {
            assert_eq!(curve.non_finite_count(), 0);
        }
    }

    #[test]
    fn test_compensation_ticks_labelled_in_khz() {
        let fig = nearfield_compensation(&NearfieldParams::default(), CompensationRadius::OneMetre)
            .unwrap();
        assert_eq!(fig.x_axis.tick_label(20000.0), Some("20"));
        assert_eq!(fig.x_axis.tick_label(20.0), Some("0.02"));
        assert_eq!(fig.y_axis.tick_label(-80.0), Some("$-80$"));
        assert_eq!(fig.file_stem, "nearfield_compensation_100cm");
        assert_eq!(fig.labels[1].at, (100.0, -98.0));
    }

    #[test]
    fn test_compensation_curve_values_match_formula() {
        let params = NearfieldParams::default();
        let fig = nearfield_compensation(&params, CompensationRadius::FiveCentimetres).unwrap();
        let curve = &fig.curves[2];
        assert_eq!(curve.order, 3);
        for (f, db) in curve.points() {
            let expected = crate::formulas::compensation_db(3, f, 0.05, params.speed_of_sound);
            assert_eq!(db, expected);
        }
    }

    #[test]
    fn test_speed_of_sound_changes_compensation() {
        let default = nearfield_compensation(
            &NearfieldParams::default(),
            CompensationRadius::FiveCentimetres,
        )
        .unwrap();
        let warm = NearfieldParams {
            speed_of_sound: 350.0,
            ..NearfieldParams::default()
        };
        let shifted = nearfield_compensation(&warm, CompensationRadius::FiveCentimetres).unwrap();
        assert_ne!(default.curves[0].y, shifted.curves[0].y);
        assert_eq!(default.curves[0].x, shifted.curves[0].x);
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let params = NearfieldParams {
            max_order: 0,
            ..NearfieldParams::default()
        };
        assert_eq!(all(&params), Err(NearfieldError::InvalidOrder(0)));
    }
}
