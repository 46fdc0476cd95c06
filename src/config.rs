// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! TOML configuration.
//!
//! Search order:
//! 1. Explicit path (`--config`)
//! 2. `flowlink.toml` in the working directory
//! 3. Platform config directory (`<config dir>/flowlink/config.toml`)
//! 4. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::render::{PanelOptions, RenderOptions};
use crate::sync::SyncConfig;

pub const LOCAL_CONFIG_FILE: &str = "flowlink.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// How long a step stays highlighted after a click.
    highlight_duration_ms: u64,
    /// Structural prefixes the diagram puts in front of step ids.
    node_id_prefixes: Vec<String>,
    scroll_context_rows: usize,
    /// Emit per-step markers in the panel. Without them the panel is located by text offset.
    panel_markers: bool,
    /// Soft-wrap long panel lines instead of clipping them.
    panel_wrap: bool,
    trace_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            highlight_duration_ms: 1500,
            node_id_prefixes: vec!["node_".to_owned()],
            scroll_context_rows: 2,
            panel_markers: true,
            panel_wrap: false,
            trace_capacity: 200,
        }
    }
}

impl AppConfig {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self
            .node_id_prefixes
            .iter()
            .any(|prefix| prefix.is_empty() || prefix.chars().any(char::is_whitespace))
        {
            return Err(ConfigError::Validation(
                "node_id_prefixes must be non-empty and free of whitespace".to_owned(),
            ));
        }
        if self.trace_capacity == 0 {
            return Err(ConfigError::Validation(
                "trace_capacity must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_duration_ms)
    }

    pub fn node_id_prefixes(&self) -> &[String] {
        &self.node_id_prefixes
    }

    pub fn scroll_context_rows(&self) -> usize {
        self.scroll_context_rows
    }

    pub fn panel_markers(&self) -> bool {
        self.panel_markers
    }

    pub fn panel_wrap(&self) -> bool {
        self.panel_wrap
    }

    pub fn trace_capacity(&self) -> usize {
        self.trace_capacity
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            node_id_prefixes: self.node_id_prefixes.clone(),
            highlight_duration: self.highlight_duration(),
            scroll_context_rows: self.scroll_context_rows,
            trace_capacity: self.trace_capacity,
        }
    }

    pub fn panel_options(&self) -> PanelOptions {
        PanelOptions {
            markers: self.panel_markers,
        }
    }

    /// The diagram labels its step nodes with the first configured prefix.
    pub fn render_options(&self) -> RenderOptions {
        let mut options = RenderOptions::default();
        if let Some(prefix) = self.node_id_prefixes.first() {
            options.node_id_prefix = prefix.clone();
        }
        options
    }
}

/// Finds and loads the configuration. An explicit path that does not exist is an error; a
/// missing implicit file falls through to the next location.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path:% = path.display(); "loading configuration from explicit path");
        return load_config_file(path);
    }

    let local = Path::new(LOCAL_CONFIG_FILE);
    if local.exists() {
        info!(path:% = local.display(); "loading configuration from working directory");
        return load_config_file(local);
    }

    if let Some(dirs) = ProjectDirs::from("dev", "flowlink", "flowlink") {
        let system = dirs.config_dir().join("config.toml");
        if system.exists() {
            info!(path:% = system.display(); "loading configuration from config directory");
            return load_config_file(&system);
        }
        debug!(path:% = system.display(); "no configuration in config directory");
    } else {
        debug!("could not determine platform config directory");
    }

    debug!("no configuration file found, using defaults");
    Ok(AppConfig::default())
}

pub fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }
    let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    AppConfig::from_toml(&source)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use rstest::rstest;

    use super::{load_config, load_config_file, AppConfig, ConfigError};

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.highlight_duration(), Duration::from_millis(1500));
        assert_eq!(config.node_id_prefixes(), ["node_".to_owned()]);
        assert!(config.panel_markers());
    }

    #[test]
    fn overrides_apply_and_map_into_sync_config() {
        let config = AppConfig::from_toml(
            r#"
highlight_duration_ms = 250
node_id_prefixes = ["n-", "node_"]
scroll_context_rows = 0
panel_markers = false
"#,
        )
        .unwrap();

        let sync = config.sync_config();
        assert_eq!(sync.highlight_duration, Duration::from_millis(250));
        assert_eq!(sync.node_id_prefixes, vec!["n-", "node_"]);
        assert_eq!(sync.scroll_context_rows, 0);
        assert!(!config.panel_options().markers);
        assert_eq!(config.render_options().node_id_prefix, "n-");
        assert_eq!(config.trace_capacity(), 200);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppConfig::from_toml("highlight_ms = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[rstest]
    #[case(r#"node_id_prefixes = [""]"#)]
    #[case(r#"node_id_prefixes = ["node_", " "]"#)]
    #[case(r#"node_id_prefixes = ["start "]"#)]
    fn blank_or_spaced_prefix_is_rejected(#[case] source: &str) {
        let err = AppConfig::from_toml(source).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "panel_wrap = true\ntrace_capacity = 8\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert!(config.panel_wrap());
        assert_eq!(config.trace_capacity(), 8);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }
}
