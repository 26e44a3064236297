//! On-screen preview of the figures.
//!
//! Built only with the `preview` feature. Everything is shown in a single
//! blocking window with one tab per figure, since a process gets one
//! event loop.

use log::debug;

use nearfield_core::Figure;

use crate::error::RenderError;

/// Show `figures` and block until the window is closed. A no-op unless
/// `enabled` and the crate was built with the `preview` feature.
pub fn show(figures: &[Figure], enabled: bool) -> Result<(), RenderError> {
    if !enabled {
        debug!("preview disabled");
        return Ok(());
    }
    if figures.is_empty() {
        return Ok(());
    }
    open(figures)
}

#[cfg(not(feature = "preview"))]
fn open(figures: &[Figure]) -> Result<(), RenderError> {
    log::warn!(
        "preview of {} figures requested, but nearfield-render was built without \
         the `preview` feature",
        figures.len()
    );
    Ok(())
}

#[cfg(feature = "preview")]
fn open(figures: &[Figure]) -> Result<(), RenderError> {
    log::info!("opening preview window with {} figures", figures.len());
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Near-field figures")
            .with_inner_size([900.0, 640.0]),
        ..Default::default()
    };
    let app = window::PreviewApp::new(figures.to_vec());
    eframe::run_native(
        "nearfield-figures",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| RenderError::Preview(e.to_string()))?;
    log::info!("preview closed");
    Ok(())
}

#[cfg(feature = "preview")]
mod window {
    use egui_plot::{Arrows, Legend, Line, Plot, PlotPoint, Text};
    use nearfield_core::{AxisScale, Figure};

    use crate::figure::axis_coord;
    use crate::markup::to_plain;

    pub struct PreviewApp {
        figures: Vec<Figure>,
        selected: usize,
    }

    impl PreviewApp {
        pub fn new(figures: Vec<Figure>) -> Self {
            Self { figures, selected: 0 }
        }
    }

    impl eframe::App for PreviewApp {
        fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
            egui::TopBottomPanel::top("figure_tabs").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for (i, figure) in self.figures.iter().enumerate() {
                        ui.selectable_value(&mut self.selected, i, figure.title.as_str());
                    }
                });
            });
            if let Some(figure) = self.figures.get(self.selected) {
                egui::CentralPanel::default().show(ctx, |ui| draw_figure(ui, figure));
            }
        }
    }

    fn axis_title(label: &str, scale: AxisScale) -> String {
        match scale {
            AxisScale::Linear => to_plain(label),
            AxisScale::Log => format!("log10 {}", to_plain(label)),
        }
    }

    fn draw_figure(ui: &mut egui::Ui, figure: &Figure) {
        let point = |(x, y): (f64, f64)| {
            [axis_coord(&figure.x_axis, x), axis_coord(&figure.y_axis, y)]
        };
        let [x0, y0] = point((figure.x_axis.limits.0, figure.y_axis.limits.0));
        let [x1, y1] = point((figure.x_axis.limits.1, figure.y_axis.limits.1));

        Plot::new(figure.file_stem.as_str())
            .x_axis_label(axis_title(&figure.x_axis.label, figure.x_axis.scale))
            .y_axis_label(axis_title(&figure.y_axis.label, figure.y_axis.scale))
            .include_x(x0)
            .include_x(x1)
            .include_y(y0)
            .include_y(y1)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for curve in &figure.curves {
                    let points: Vec<[f64; 2]> = curve
                        .points()
                        .filter(|(_, y)| y.is_finite())
                        .map(point)
                        .collect();
                    let grey = (curve.shade * 255.0).round().clamp(0.0, 255.0) as u8;
                    plot_ui.line(
                        Line::new(points)
                            .color(egui::Color32::from_gray(grey))
                            .name(format!("l = {}", curve.order)),
                    );
                }
                for label in &figure.labels {
                    let [x, y] = point(label.at);
                    plot_ui.text(Text::new(PlotPoint::new(x, y), to_plain(&label.text)));
                }
                if let Some(arrow) = &figure.arrow {
                    plot_ui.arrows(Arrows::new(vec![point(arrow.tail)], vec![point(arrow.head)]));
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_preview_is_a_no_op() {
        let figures = nearfield_core::compute(&nearfield_core::NearfieldParams::default()).unwrap();
        assert!(show(&figures, false).is_ok());
    }

    #[cfg(not(feature = "preview"))]
    #[test]
    fn test_preview_without_feature_is_a_no_op() {
        assert!(show(&[], true).is_ok());
        let figures = nearfield_core::compute(&nearfield_core::NearfieldParams::default()).unwrap();
        assert!(show(&figures, true).is_ok());
    }
}
