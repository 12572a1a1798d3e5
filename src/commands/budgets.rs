// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Session;
use crate::api::{BudgetSearch, FinanceApi};
use crate::models::{BudgetExpense, RowId};
use crate::projector::BudgetSummary;
use crate::sync::BudgetQuery;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table, required};
use crate::validate::{BudgetExpenseEditForm, BudgetExpenseForm};
use anyhow::Result;
use chrono::Datelike;
use comfy_table::Table;
use std::io::Write;

pub fn handle<A: FinanceApi>(
    s: &mut Session<A>,
    m: &clap::ArgMatches,
    out: &mut dyn Write,
) -> Result<()> {
    match m.subcommand() {
        Some(("create", _)) => {
            let id = create(s)?;
            if let Some(b) = s.budgets.get(id) {
                writeln!(out, "Budget {} for {}", b.id, b.period())?;
            }
        }
        Some(("show", sub)) => {
            let found = show(s, sub)?;
            let rows = s.budget_lines.rows();
            if !maybe_print_json(out, sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                print_header(out, &found)?;
                print_lines(out, rows)?;
            }
        }
        Some(("add", sub)) => {
            add(s, sub)?;
            print_lines(out, s.budget_lines.rows())?;
        }
        Some(("edit", sub)) => {
            edit(s, sub)?;
            print_lines(out, s.budget_lines.rows())?;
        }
        Some(("rm", sub)) => {
            remove(s, sub)?;
        }
        _ => {}
    }
    Ok(())
}

pub fn create<A: FinanceApi>(s: &mut Session<A>) -> Result<RowId> {
    Ok(s.budgets.create(&())?)
}

/// Query from `--budget` or `--month`, defaulting to the current month.
fn query<A: FinanceApi>(s: &Session<A>, m: &clap::ArgMatches) -> Result<BudgetQuery> {
    if let Some(id) = m.get_one::<i64>("budget") {
        return Ok(BudgetQuery::ById(*id));
    }
    let (year, month) = match m.get_one::<String>("month") {
        Some(ym) => parse_month(ym)?,
        None => {
            let today = s.today();
            (today.year(), today.month())
        }
    };
    Ok(BudgetQuery::ByMonth { year, month })
}

pub fn show<A: FinanceApi>(s: &mut Session<A>, m: &clap::ArgMatches) -> Result<BudgetSearch> {
    let q = query(s, m)?;
    load(s, &q)
}

fn load<A: FinanceApi>(s: &mut Session<A>, q: &BudgetQuery) -> Result<BudgetSearch> {
    let found = s.budget_lines.search(q)?;
    s.current_budget = found.budget_id;
    Ok(found)
}

fn print_header(out: &mut dyn Write, found: &BudgetSearch) -> Result<()> {
    let month = found.month.as_ref().and_then(|m| m.number());
    if let (Some(year), Some(month)) = (found.year, month) {
        writeln!(
            out,
            "Budget {} for {:04}-{:02}: {} line(s)",
            found.budget_id.map(|i| i.to_string()).unwrap_or_default(),
            year,
            month,
            found.expense_count
        )?;
    }
    Ok(())
}

/// Make sure the lines of `--budget` (or the loaded budget) are in view.
fn ensure_budget<A: FinanceApi>(
    s: &mut Session<A>,
    m: &clap::ArgMatches,
) -> Result<Option<RowId>> {
    let wanted = m.get_one::<i64>("budget").copied().or(s.current_budget);
    if let Some(id) = wanted {
        if s.current_budget != Some(id) {
            load(s, &BudgetQuery::ById(id))?;
        }
    }
    Ok(wanted)
}

pub fn add<A: FinanceApi>(s: &mut Session<A>, m: &clap::ArgMatches) -> Result<RowId> {
    let budget_id = ensure_budget(s, m)?;
    let form = BudgetExpenseForm {
        budget_id,
        expense_id: m.get_one::<String>("expense").cloned().unwrap_or_default(),
        expected_amount: m.get_one::<String>("expected").cloned().unwrap_or_default(),
    };
    Ok(s.budget_lines.create(&form)?)
}

pub fn edit<A: FinanceApi>(s: &mut Session<A>, m: &clap::ArgMatches) -> Result<RowId> {
    let id = *required::<i64>(m, "id")?;
    ensure_budget(s, m)?;
    let form = BudgetExpenseEditForm {
        expected_amount: m.get_one::<String>("expected").cloned().unwrap_or_default(),
    };
    Ok(s.budget_lines.edit(id, &form)?)
}

pub fn remove<A: FinanceApi>(s: &mut Session<A>, m: &clap::ArgMatches) -> Result<RowId> {
    let id = *required::<i64>(m, "id")?;
    ensure_budget(s, m)?;
    Ok(s.budget_lines.delete(id)?)
}

pub fn lines_table(rows: &[BudgetExpense]) -> Table {
    let body = rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.expense_name.clone(),
                fmt_money(&r.expected_amount),
                fmt_money(&r.spent_amount),
                format!("{}%", r.utilisation()),
            ]
        })
        .collect();
    pretty_table(&["ID", "Expense", "Expected", "Spent", "Used"], body)
}

fn print_lines(out: &mut dyn Write, rows: &[BudgetExpense]) -> Result<()> {
    let summary = BudgetSummary::from_rows(rows);
    writeln!(out, "{}", lines_table(rows))?;
    writeln!(
        out,
        "Expected {}  Spent {}  ({}%)",
        fmt_money(&summary.total_expected),
        fmt_money(&summary.total_spent),
        summary.percent
    )?;
    Ok(())
}
