//! TOML settings file.
//!
//! ```toml
//! [layout]
//! title = "Annual Health Check"
//! contact_lines = ["clinic@example.org"]
//!
//! [batch]
//! collision = "suffix"
//! workers = 4
//! render_timeout_secs = 30
//!
//! [assets]
//! logo = "assets/logo.png"
//! ```
//!
//! Every table and key is optional. Command-line flags win over the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use hcard_layout::LayoutOptions;
use hcard_model::Canvas;

use crate::pipeline::{BatchConfig, CollisionPolicy, DEFAULT_PROGRESS_EVERY};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutOptions,
    pub batch: BatchSettings,
    pub canvas: Canvas,
    pub assets: AssetSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub collision: CollisionPolicy,
    pub workers: usize,
    pub render_timeout_secs: Option<u64>,
    pub progress_every: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            collision: CollisionPolicy::default(),
            workers: 1,
            render_timeout_secs: None,
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Image drawn in the header logo slot.
    pub logo: Option<PathBuf>,
}

impl Settings {
    /// Reads settings from `path`.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Reads `path` when given, otherwise returns the defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, SettingsError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn render_timeout(&self) -> Option<Duration> {
        self.batch
            .render_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Batch configuration writing into `output_dir`.
    pub fn batch_config(&self, output_dir: impl Into<PathBuf>) -> BatchConfig {
        let mut config = BatchConfig::new(output_dir)
            .with_collision(self.batch.collision)
            .with_workers(self.batch.workers)
            .with_render_timeout(self.render_timeout())
            .with_canvas(self.canvas)
            .with_layout(self.layout.clone());
        config.progress_every = self.batch.progress_every;
        config
    }
}
