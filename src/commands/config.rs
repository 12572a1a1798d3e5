// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::utils::required;
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// `config show` prints `effective`; `config set-url` edits the file at `path`.
pub fn handle(
    effective: &Config,
    path: &Path,
    m: &clap::ArgMatches,
    out: &mut dyn Write,
) -> Result<()> {
    match m.subcommand() {
        Some(("set-url", sub)) => {
            let url = required::<String>(sub, "url")?;
            set_url(path, url)?;
            writeln!(out, "Base URL set to {} in {}", url, path.display())?;
        }
        _ => {
            writeln!(out, "# {}", path.display())?;
            writeln!(out, "{}", serde_json::to_string_pretty(effective)?)?;
        }
    }
    Ok(())
}

pub fn set_url(path: &Path, url: &str) -> Result<Config> {
    let mut cfg = Config::load_from(path)?;
    cfg.base_url = url.trim().to_string();
    cfg.save_to(path)?;
    Ok(cfg)
}
