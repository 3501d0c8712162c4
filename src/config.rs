// pihole-stats - CLI for Pi-hole statistics and enable/disable control
// Copyright (C) 2024 pihole-stats contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const CONFIG_DIR_ENV: &str = "PIHOLE_STATS_CONFIG_DIR";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub url: Option<String>,
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Local,
    User,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate a writable config directory for the current user")]
    MissingConfigDir,
    #[error(
        "Pi-hole URL is required; pass --url, set PIHOLE_URL, or run `pihole-stats configure --set-url <url>`"
    )]
    MissingUrl,
}

/// Connection settings handed to the API client.
#[derive(Debug)]
pub struct EffectiveConfig {
    pub url: String,
    pub api_token: String,
}

pub fn config_path(scope: Scope, cwd: &Path) -> Result<PathBuf> {
    match scope {
        Scope::Local => Ok(cwd.join(".pihole-stats.yaml")),
        Scope::User => {
            if let Ok(custom) = env::var(CONFIG_DIR_ENV) {
                return Ok(PathBuf::from(custom).join("config.yaml"));
            }
            let base = config_dir().ok_or(ConfigError::MissingConfigDir)?;
            Ok(base.join("pihole-stats").join("config.yaml"))
        }
    }
}

pub fn load(cwd: &Path) -> Result<Config> {
    let user = read_if_exists(&config_path(Scope::User, cwd)?)?.unwrap_or_default();
    let local = read_if_exists(&config_path(Scope::Local, cwd)?)?.unwrap_or_default();
    Ok(merge(user, local))
}

pub fn load_scope(scope: Scope, cwd: &Path) -> Result<Config> {
    Ok(read_if_exists(&config_path(scope, cwd)?)?.unwrap_or_default())
}

pub fn save(scope: Scope, config: &Config, cwd: &Path) -> Result<PathBuf> {
    let path = config_path(scope, cwd)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let serialized = serde_yaml::to_string(config).context("serializing config")?;
    fs::write(&path, serialized).with_context(|| format!("writing {:?}", path))?;
    log::debug!("Saved config to {}", path.display());
    Ok(path)
}

/// Merges user and project files, then applies per-invocation overrides
/// (flags or `PIHOLE_URL`/`PIHOLE_AUTH`).
pub fn resolve(
    cwd: &Path,
    url_override: Option<String>,
    token_override: Option<String>,
) -> Result<EffectiveConfig> {
    let mut merged = load(cwd)?;

    if let Some(url) = url_override {
        merged.url = Some(url);
    }
    if let Some(token) = token_override {
        merged.api_token = Some(token);
    }

    let url = merged
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or(ConfigError::MissingUrl)?;

    let api_token = match merged.api_token {
        Some(token) => token.trim().to_string(),
        None => {
            log::warn!("no API token configured; enable/disable will be rejected by Pi-hole");
            String::new()
        }
    };

    Ok(EffectiveConfig { url, api_token })
}

fn read_if_exists(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        log::trace!("{} does not exist", path.display());
        return Ok(None);
    }

    let contents = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let config = serde_yaml::from_str(&contents).with_context(|| format!("parsing {:?}", path))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

fn merge(user: Config, local: Config) -> Config {
    Config {
        url: local.url.or(user.url),
        api_token: local.api_token.or(user.api_token),
    }
}
