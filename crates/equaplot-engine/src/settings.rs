//! Persistent render settings
//!
//! Only the global knobs are stored. The definition list is session state.

use anyhow::{Context, Result};
use equaplot_core::config::{IndexWidth, RenderConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub render: RenderConfig,
    /// Index format of the presentation backend
    pub index_width: IndexWidth,
}

impl Settings {
    /// `{config_dir}/equaplot/settings.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("equaplot").join("settings.json"))
    }

    /// Load from `path`, or defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))?;

        Ok(settings.sanitized())
    }

    /// Load from an explicit path, else the default location, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Write to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings: {}", path.display()))?;

        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    fn sanitized(self) -> Self {
        Self {
            render: self.render.sanitized(),
            ..self
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join("equaplot_settings_tests")
            .join(name)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(&temp_path("does_not_exist.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("save_and_load.json");
        let settings = Settings {
            render: RenderConfig::default().with_resolution(64).with_range(4.0),
            index_width: IndexWidth::U16,
        };

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_defaults_and_clamps() {
        let path = temp_path("partial.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "render": { "resolution": 4, "animate": true } }"#).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.render.resolution, 10);
        assert!(loaded.render.animate);
        assert_eq!(loaded.index_width, IndexWidth::U32);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_path("malformed.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(Settings::load(&path).is_err());

        let _ = std::fs::remove_file(&path);
    }
}
