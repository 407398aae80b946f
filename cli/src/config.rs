// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf, str::FromStr};

use tokio::fs;
use ttcal_core::ParseOptions;

const APP_NAME: &str = "ttcal";
const TTCAL_CONFIG_ENV: &str = "TTCAL_CONFIG";

/// Load the configuration.
///
/// The file is looked up in order: the `--config` flag, the `TTCAL_CONFIG`
/// environment variable, then `ttcal/config.toml` in the user config
/// directory. A missing default file means built-in defaults; a missing
/// file that was asked for explicitly is an error.
#[tracing::instrument]
pub async fn parse_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = if let Some(path) = path {
        path
    } else if let Ok(env_path) = std::env::var(TTCAL_CONFIG_ENV) {
        PathBuf::from(env_path)
    } else {
        let Some(config_dir) = get_config_dir() else {
            tracing::warn!("user-specific config directory not found, using defaults");
            return Ok(Config::default());
        };

        let config = config_dir.join(APP_NAME).join("config.toml");
        if !config.exists() {
            tracing::debug!(path = %config.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        config
    };

    fs::read_to_string(&path)
        .await
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse()
        .map_err(|e| format!("Failed to parse config file at {}: {}", path.display(), e).into())
}

/// Configuration of the ttcal command-line tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults for reading timetables.
    pub core: ParseOptions,

    /// Defaults for generated calendars.
    pub output: OutputConfig,
}

/// Output section of the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Fold long iCalendar lines at 75 octets.
    pub fold: bool,
}

impl FromStr for Config {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

fn get_config_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(not(unix))]
    let config_dir = dirs::config_dir();
    config_dir
}
