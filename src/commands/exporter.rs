// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Session;
use crate::api::FinanceApi;
use crate::models::{Ledger, TransactionKind};
use crate::sync::BudgetQuery;
use crate::utils::{parse_month, required};
use anyhow::{Context, Result, bail};
use chrono::Datelike;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub fn handle<A: FinanceApi>(
    s: &mut Session<A>,
    m: &clap::ArgMatches,
    out: &mut dyn Write,
) -> Result<()> {
    let view = required::<String>(m, "view")?.as_str();
    let fmt = required::<String>(m, "format")?.to_lowercase();
    let dest = Path::new(required::<String>(m, "out")?);

    let count = match view {
        "expense" | "income" => {
            let kind = if view == "expense" {
                TransactionKind::Expense
            } else {
                TransactionKind::Income
            };
            let query = super::transactions::range_query(s, m);
            let ctl = s.transactions(kind);
            ctl.search(&query)?;
            write_rows(ctl.rows(), &fmt, dest)?
        }
        "budget" => {
            let (year, month) = match m.get_one::<String>("month") {
                Some(ym) => parse_month(ym)?,
                None => (s.today().year(), s.today().month()),
            };
            let found = s
                .budget_lines
                .search(&BudgetQuery::ByMonth { year, month })?;
            s.current_budget = found.budget_id;
            write_rows(s.budget_lines.rows(), &fmt, dest)?
        }
        "debt" => write_rows(s.ledger(Ledger::Debt).rows(), &fmt, dest)?,
        "credit" => write_rows(s.ledger(Ledger::Credit).rows(), &fmt, dest)?,
        other => bail!("Unknown view '{}'", other),
    };
    writeln!(out, "Exported {} {} row(s) to {}", count, view, dest.display())?;
    Ok(())
}

/// Write `rows` as CSV (header from the field names) or a JSON array.
pub fn write_rows<T: Serialize>(rows: &[T], fmt: &str, out: &Path) -> Result<usize> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(rows)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(rows.len())
}
