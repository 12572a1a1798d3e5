// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Session;
use crate::api::FinanceApi;
use crate::utils::pretty_table;
use anyhow::Result;
use std::io::Write;

/// Problems found, as (issue, detail) pairs.
pub fn diagnose<A: FinanceApi>(s: &Session<A>) -> Vec<(String, String)> {
    let mut rows = Vec::new();

    // 1) Configuration
    if let Err(e) = s.config.check() {
        rows.push(("bad_config".to_string(), e.to_string()));
    }
    if s.config.debt_income_category_id <= 0 {
        rows.push((
            "bad_config".to_string(),
            format!(
                "debt_income_category_id {} is not a valid id",
                s.config.debt_income_category_id
            ),
        ));
    }

    // 2) Server reachable and answering JSON
    if let Err(e) = s.expenses.api().chart_data() {
        rows.push(("server_unreachable".to_string(), format!("{} ({})", e, s.config.base_url)));
    }
    rows
}

pub fn handle<A: FinanceApi>(s: &Session<A>, out: &mut dyn Write) -> Result<()> {
    let rows = diagnose(s);
    if rows.is_empty() {
        writeln!(out, "✅ doctor: no issues found ({})", s.config.base_url)?;
    } else {
        let body = rows.into_iter().map(|(a, b)| vec![a, b]).collect();
        writeln!(out, "{}", pretty_table(&["Issue", "Detail"], body))?;
    }
    Ok(())
}
