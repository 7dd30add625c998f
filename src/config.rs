// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! User configuration loaded from `terra-asset.toml`.
//!
//! Every field is optional; anything left out falls back to the defaults in
//! `settings`. A config file named on the command line must exist, while
//! the default file in the working directory is only read when present.

use crate::settings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default log filter when neither the config nor `RUST_LOG` sets one
pub const DEFAULT_LOG_FILTER: &str = "terra_asset=info";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub snap: SnapConfig,
    pub camera: CameraConfig,
    pub store: StoreConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapConfig {
    pub enabled: bool,
    pub threshold_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub fly_duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// JSON document holding layers and features
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directives
    pub filter: String,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: settings::snap::ENABLED_BY_DEFAULT,
            threshold_meters: settings::snap::THRESHOLD_METERS,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fly_duration_seconds: settings::camera::FLY_DURATION_SECONDS,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(settings::storage::DEFAULT_STORE_PATH),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Failed to load config {}", path.display()))
    }

    /// Load `explicit` if given, else the default file when it exists
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = Path::new(settings::storage::DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.snap.threshold_meters.is_finite() && self.snap.threshold_meters > 0.0) {
            anyhow::bail!("snap.threshold_meters must be a positive number");
        }
        if !(self.camera.fly_duration_seconds.is_finite() && self.camera.fly_duration_seconds >= 0.0) {
            anyhow::bail!("camera.fly_duration_seconds must not be negative");
        }
        Ok(())
    }
}
