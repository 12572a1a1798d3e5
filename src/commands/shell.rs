// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Interactive session on one view. Lines are parsed with the regular
//! command tree, so `search --from 2024-01-01` inside `shell expense` runs
//! `finsync expense search --from 2024-01-01`, and the loaded rows stay
//! in place for the next line.

use super::{Session, dispatch};
use crate::api::FinanceApi;
use crate::cli::build_cli;
use crate::error::SyncError;
use crate::utils::split_args;
use anyhow::Result;
use std::io::{BufRead, Write};

const TOP_LEVEL: [&str; 8] = [
    "expense", "income", "category", "budget", "debt", "credit", "dashboard", "export",
];

/// Full argv for one shell line typed in `view`.
pub fn argv_for(view: &str, words: Vec<String>) -> Vec<String> {
    let mut argv = vec!["finsync".to_string()];
    let top_level = words
        .first()
        .is_some_and(|w| TOP_LEVEL.contains(&w.as_str()) || w == "doctor");
    if !top_level {
        argv.push(view.to_string());
    }
    argv.extend(words);
    argv
}

pub fn run<A, R, W>(s: &mut Session<A>, view: &str, input: R, mut out: W) -> Result<()>
where
    A: FinanceApi,
    R: BufRead,
    W: Write,
{
    writeln!(out, "finsync shell on '{}'. Type 'help' or 'exit'.", view)?;
    let mut lines = input.lines();
    loop {
        write!(out, "finsync:{}> ", view)?;
        out.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let words = match split_args(&line) {
            Ok(w) => w,
            Err(e) => {
                writeln!(out, "Error: {}", e)?;
                continue;
            }
        };
        match words.first().map(String::as_str) {
            None => continue,
            Some("exit") | Some("quit") => break,
            Some("help") => {
                let mut cmd = build_cli();
                let help = match cmd.find_subcommand_mut(view) {
                    Some(sub) => sub.render_help(),
                    None => cmd.render_help(),
                };
                writeln!(out, "{}", help)?;
                continue;
            }
            Some(_) => {}
        }

        let matches = match build_cli().try_get_matches_from(argv_for(view, words)) {
            Ok(m) => m,
            Err(e) => {
                writeln!(out, "{}", e.render())?;
                continue;
            }
        };
        if let Err(e) = dispatch(s, &matches, &mut out) {
            let local = e
                .downcast_ref::<SyncError>()
                .is_some_and(SyncError::is_local);
            tracing::debug!(error = ?e, local, "shell command failed");
            writeln!(out, "Error: {:#}", e)?;
        }
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_is_implied() {
        let words = vec!["search".to_string(), "--from".to_string(), "2024-01-01".to_string()];
        assert_eq!(
            argv_for("expense", words),
            vec!["finsync", "expense", "search", "--from", "2024-01-01"]
        );
        let words = vec!["dashboard".to_string()];
        assert_eq!(argv_for("budget", words), vec!["finsync", "dashboard"]);
    }
}
