pub mod clip;
pub mod eps;
pub mod error;
pub mod figure;
pub mod markup;
pub mod preview;
pub mod style;

use std::path::{Path, PathBuf};

use log::info;
use plotters::prelude::IntoDrawingArea;

use nearfield_core::Figure;

pub use eps::EpsBackend;
pub use error::RenderError;
pub use preview::show;
pub use style::{configure, style, RenderStyle};

/// Write `figure` to `<dir>/<file_stem>.eps` using the configured
/// rendering context.
pub fn export(figure: &Figure, dir: &Path) -> Result<PathBuf, RenderError> {
    export_with_style(figure, dir, style())
}

/// [`export`] with an explicit style.
pub fn export_with_style(
    figure: &Figure,
    dir: &Path,
    style: &RenderStyle,
) -> Result<PathBuf, RenderError> {
    if !dir.is_dir() {
        return Err(RenderError::Io {
            path: dir.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "output directory does not exist",
            ),
        });
    }
    let path = dir.join(format!("{}.eps", figure.file_stem));
    let root = EpsBackend::new(&path, figure.size_inches, style.dpi)?
        .with_title(figure.title.as_str())
        .into_drawing_area();
    figure::render(figure, &root, style)?;
    root.present().map_err(|e| match e {
        plotters::drawing::DrawingAreaErrorKind::BackendError(
            plotters_backend::DrawingErrorKind::DrawingError(source),
        ) => RenderError::Io {
            path: path.clone(),
            source,
        },
        other => RenderError::Drawing(other),
    })?;
    info!("wrote {}", path.display());
    Ok(path)
}

/// Export every figure in order, stopping at the first failure.
pub fn export_all(figures: &[Figure], dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
    figures.iter().map(|figure| export(figure, dir)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nearfield_core::{compute, NearfieldParams};

    #[test]
    fn test_export_all_writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let figures = compute(&NearfieldParams::default()).unwrap();
        let paths = export_all(&figures, dir.path()).unwrap();
        assert_eq!(paths.len(), 3);
        for (path, figure) in paths.iter().zip(&figures) {
            assert_eq!(path, &dir.path().join(format!("{}.eps", figure.file_stem)));
            let bytes = std::fs::read(path).unwrap();
            assert!(bytes.starts_with(b"%!PS-Adobe"));
        }
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let figures = compute(&NearfieldParams::default()).unwrap();
        let err = export_with_style(&figures[0], &missing, &RenderStyle::default()).unwrap_err();
        assert!(matches!(err, RenderError::Io { ref path, .. } if path == &missing));
        assert!(!missing.exists());
    }

    #[test]
    fn test_export_rejects_resolution_beyond_device_grid() {
        let dir = tempfile::tempdir().unwrap();
        let figures = compute(&NearfieldParams::default()).unwrap();
        let style = RenderStyle {
            dpi: 1e9,
            ..RenderStyle::default()
        };
        let err = export_with_style(&figures[0], dir.path(), &style).unwrap_err();
        assert!(matches!(err, RenderError::PageSize { dpi, .. } if dpi == 1e9));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let figures = compute(&NearfieldParams::default()).unwrap();
        let target = dir.path().join("nearfield_amplification.eps");
        std::fs::write(&target, "stale").unwrap();
        export_with_style(&figures[0], dir.path(), &RenderStyle::default()).unwrap();
        let doc = std::fs::read_to_string(&target).unwrap();
        assert!(doc.starts_with("%!PS-Adobe-3.0 EPSF-3.0"));
    }
}
