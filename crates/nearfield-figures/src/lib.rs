pub mod config;

use std::path::PathBuf;

use anyhow::{bail, Context};
use log::info;

pub use config::{ConfigError, Settings};

/// Compute the three figures, preview them if asked, and export them as
/// EPS into `settings.output_dir`. Returns the written paths in order.
pub fn run(settings: &Settings) -> anyhow::Result<Vec<PathBuf>> {
    settings
        .params
        .validate()
        .context("invalid physical parameters")?;
    if !settings.output_dir.is_dir() {
        bail!(
            "output directory {} does not exist",
            settings.output_dir.display()
        );
    }

    let style = settings.render_style();
    nearfield_render::configure(style.clone());

    let figures = nearfield_core::compute(&settings.params).context("failed to compute figures")?;
    nearfield_render::show(&figures, settings.show).context("preview failed")?;

    let mut written = Vec::with_capacity(figures.len());
    for figure in &figures {
        let path = nearfield_render::export_with_style(figure, &settings.output_dir, &style)
            .with_context(|| format!("failed to export {}", figure.file_stem))?;
        written.push(path);
    }
    info!(
        "exported {} figures to {}",
        written.len(),
        settings.output_dir.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_writes_three_eps_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            output_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        let paths = run(&settings).unwrap();
        assert_eq!(paths.len(), 3);

        let mut eps: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".eps"))
            .collect();
        eps.sort();
        assert_eq!(
            eps,
            vec![
                "nearfield_amplification.eps",
                "nearfield_compensation_100cm.eps",
                "nearfield_compensation_5cm.eps",
            ]
        );
        for path in &paths {
            let bytes = std::fs::read(path).unwrap();
            assert!(!bytes.is_empty());
            assert!(bytes.starts_with(b"%!PS-Adobe"), "{} is not PostScript", path.display());
        }
    }

    #[test]
    fn test_each_run_uses_its_own_font_and_dpi() {
        let times_dir = tempfile::tempdir().unwrap();
        run(&Settings {
            output_dir: times_dir.path().to_path_buf(),
            ..Settings::default()
        })
        .unwrap();

        let helvetica_dir = tempfile::tempdir().unwrap();
        let paths = run(&Settings {
            output_dir: helvetica_dir.path().to_path_buf(),
            font_family: "Helvetica".to_string(),
            dpi: 600.0,
            ..Settings::default()
        })
        .unwrap();

        let doc = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(doc.contains("/Helvetica findfont"), "second run ignored its font");
        assert!(!doc.contains("/Times-Roman findfont"));
        assert!(doc.contains("0.120000 0.120000 scale"), "second run ignored its dpi");
        assert!(doc.contains("%%BoundingBox: 0 0 360 238"));
    }

    #[test]
    fn test_run_fails_fast_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            output_dir: dir.path().join("missing"),
            ..Settings::default()
        };
        let err = run(&settings).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_run_rejects_invalid_params() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings {
            output_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        settings.params.max_order = 0;
        assert!(run(&settings).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
