// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::RouteStyle;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Finsync", "finsync"));

pub const BASE_URL_ENV: &str = "FINSYNC_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub timeout_secs: u64,
    pub transaction_routes: RouteStyle,
    /// Income category id the server reserves for borrowed money.
    pub debt_income_category_id: i64,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 15,
            transaction_routes: RouteStyle::Classic,
            debt_income_category_id: 1,
            log_filter: "finsync=info".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    Ok(proj.config_dir().join("config.json"))
}

impl Config {
    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw =
            fs::read_to_string(path).with_context(|| format!("Read config {}", path.display()))?;
        let cfg: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Parse config {}", path.display()))?;
        cfg.check()?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.check()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config dir")?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Write config {}", path.display()))?;
        Ok(())
    }

    /// File, then environment, then the command-line override.
    pub fn resolve(cli_base_url: Option<&str>) -> Result<Self> {
        let mut cfg = Self::load_from(&config_path()?)?;
        cfg.apply_env(|k| std::env::var(k).ok());
        if let Some(url) = cli_base_url {
            cfg.base_url = url.to_string();
        }
        cfg.check()?;
        Ok(cfg)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(url = %url, "base url taken from environment");
            self.base_url = url;
        }
    }

    pub fn check(&self) -> Result<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("Base URL '{}' must start with http:// or https://", url);
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }
}
