//! Run settings: published defaults, overridable through `NEARFIELD_*`
//! environment variables.

use std::path::PathBuf;

use nearfield_core::NearfieldParams;
use nearfield_render::style::MAX_DPI;
use nearfield_render::RenderStyle;
use thiserror::Error;

pub const ENV_OUTPUT_DIR: &str = "NEARFIELD_OUTPUT_DIR";
pub const ENV_SPEED_OF_SOUND: &str = "NEARFIELD_SPEED_OF_SOUND";
pub const ENV_FONT: &str = "NEARFIELD_FONT";
pub const ENV_DPI: &str = "NEARFIELD_DPI";
pub const ENV_SHOW: &str = "NEARFIELD_SHOW";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },

    #[error("{name} must be positive and finite, got {value}")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be at most {max}, got {value}")]
    TooLarge {
        name: &'static str,
        value: f64,
        max: f64,
    },

    #[error("{name} must be a boolean (1/0, true/false, yes/no), got {value:?}")]
    NotABool { name: &'static str, value: String },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub params: NearfieldParams,
    pub output_dir: PathBuf,
    pub font_family: String,
    pub dpi: f64,
    /// Open the preview window before exporting.
    pub show: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let style = RenderStyle::default();
        Self {
            params: NearfieldParams::default(),
            output_dir: default_output_dir(),
            font_family: style.font_family,
            dpi: style.dpi,
            show: false,
        }
    }
}

/// Figures land next to this crate's sources.
pub fn default_output_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source; unset keys keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string());

        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            if dir.is_empty() {
                return Err(ConfigError::Empty { name: ENV_OUTPUT_DIR });
            }
            settings.output_dir = PathBuf::from(dir);
        }
        if let Some(value) = get(ENV_SPEED_OF_SOUND) {
            settings.params.speed_of_sound = parse_positive(ENV_SPEED_OF_SOUND, &value)?;
        }
        if let Some(font) = get(ENV_FONT) {
            if font.is_empty() {
                return Err(ConfigError::Empty { name: ENV_FONT });
            }
            settings.font_family = font;
        }
        if let Some(value) = get(ENV_DPI) {
            let dpi = parse_positive(ENV_DPI, &value)?;
            if dpi > MAX_DPI {
                return Err(ConfigError::TooLarge {
                    name: ENV_DPI,
                    value: dpi,
                    max: MAX_DPI,
                });
            }
            settings.dpi = dpi;
        }
        if let Some(value) = get(ENV_SHOW) {
            settings.show = parse_bool(ENV_SHOW, &value)?;
        }
        Ok(settings)
    }

    /// Rendering context for these settings.
    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            font_family: self.font_family.clone(),
            dpi: self.dpi,
            ..RenderStyle::default()
        }
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<f64, ConfigError> {
    let parsed: f64 = value.parse().map_err(|_| ConfigError::NotANumber {
        name,
        value: value.to_string(),
    })?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(ConfigError::OutOfRange { name, value: parsed });
    }
    Ok(parsed)
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::NotABool {
            name,
            value: value.to_string(),
        }),
    }
}
