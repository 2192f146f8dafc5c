use std::path::Path;

use anyhow::Context;
use client_core::ControllerConfig;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5173";
const ENV_PREFIX: &str = "PRESENTER";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PresenterSettings {
    pub server_url: String,
    /// How often pending transitions are driven forward.
    pub tick_interval_ms: u64,
    pub controller: ControllerConfig,
}

impl Default for PresenterSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            tick_interval_ms: 50,
            controller: ControllerConfig::default(),
        }
    }
}

/// Loads `path` (optional) and `PRESENTER__*` environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<PresenterSettings> {
    load_settings_with(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

pub(crate) fn load_settings_with(
    path: &Path,
    env: Environment,
) -> anyhow::Result<PresenterSettings> {
    Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .add_source(env)
        .build()
        .with_context(|| format!("failed to read presenter settings from '{}'", path.display()))?
        .try_deserialize()
        .context("invalid presenter settings")
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
