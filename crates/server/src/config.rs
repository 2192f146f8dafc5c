use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    /// Directory served for every path without a dedicated route.
    pub site_root: PathBuf,
    /// Deck fragment returned by the content routes.
    pub content_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5173".into(),
            site_root: PathBuf::from("."),
            content_path: PathBuf::from("content/content.html"),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new("server.toml"), |key| std::env::var(key).ok())
}

/// Defaults, then the optional TOML file, then environment overrides.
pub(crate) fn load_settings_from(
    file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("site_root") {
                settings.site_root = PathBuf::from(v);
            }
            if let Some(v) = file_cfg.get("content_path") {
                settings.content_path = PathBuf::from(v);
            }
        }
    }

    if let Some(port) = env("PORT") {
        if port.parse::<u16>().is_ok() {
            settings.server_bind = with_port(&settings.server_bind, &port);
        }
    }
    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__SITE_ROOT") {
        settings.site_root = PathBuf::from(v);
    }
    if let Some(v) = env("APP__CONTENT_PATH") {
        settings.content_path = PathBuf::from(v);
    }

    settings
}

fn with_port(bind: &str, port: &str) -> String {
    let host = bind.rsplit_once(':').map_or(bind, |(host, _)| host);
    format!("{host}:{port}")
}

/// Resolves the content path against the site root unless it is absolute.
pub fn resolve_content_path(settings: &Settings) -> PathBuf {
    if settings.content_path.is_absolute() {
        settings.content_path.clone()
    } else {
        settings.site_root.join(&settings.content_path)
    }
}

pub fn ensure_site_root(settings: &Settings) -> anyhow::Result<PathBuf> {
    let root = settings.site_root.canonicalize().with_context(|| {
        format!(
            "site root '{}' does not exist or is not accessible",
            settings.site_root.display()
        )
    })?;
    if !root.is_dir() {
        anyhow::bail!("site root '{}' is not a directory", root.display());
    }
    Ok(root)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
