use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot write figure to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("drawing failed: {0}")]
    Drawing(#[from] DrawingAreaErrorKind<std::io::Error>),

    #[error("page of {width_in} x {height_in} in at {dpi} dpi does not fit the device grid")]
    PageSize {
        width_in: f64,
        height_in: f64,
        dpi: f64,
    },

    #[error("preview window failed: {0}")]
    Preview(String),
}
