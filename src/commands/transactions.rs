// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Session;
use crate::api::FinanceApi;
use crate::models::{RowId, Transaction, TransactionKind};
use crate::projector::Projection;
use crate::sync::TransactionQuery;
use crate::utils::{fmt_money, maybe_print_json, month_start, pretty_table, required};
use crate::validate::{DateRangeForm, TransactionEditForm, TransactionForm};
use anyhow::Result;
use comfy_table::Table;
use std::io::Write;

pub fn handle<A: FinanceApi>(
    s: &mut Session<A>,
    kind: TransactionKind,
    m: &clap::ArgMatches,
    out: &mut dyn Write,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let id = add(s, kind, sub)?;
            print_row(out, s.transactions(kind).get(id))?;
        }
        Some(("edit", sub)) => {
            let id = edit(s, kind, sub)?;
            print_row(out, s.transactions(kind).get(id))?;
        }
        Some(("rm", sub)) => {
            remove(s, kind, sub)?;
        }
        Some(("search", sub)) => {
            search(s, kind, sub)?;
            print_listing(out, s, kind, sub)?;
        }
        Some(("list", sub)) => print_listing(out, s, kind, sub)?,
        _ => {}
    }
    Ok(())
}

fn text(m: &clap::ArgMatches, name: &str) -> String {
    m.get_one::<String>(name).cloned().unwrap_or_default()
}

/// Date range from `--from/--to`, defaulting to the current month so far.
pub fn range_query<A: FinanceApi>(s: &Session<A>, m: &clap::ArgMatches) -> TransactionQuery {
    let today = s.today();
    let from = m
        .get_one::<String>("from")
        .cloned()
        .unwrap_or_else(|| month_start(today).to_string());
    let to = m
        .get_one::<String>("to")
        .cloned()
        .unwrap_or_else(|| today.to_string());
    TransactionQuery::Range(DateRangeForm { from, to })
}

/// Load the view around `id` unless it is already there.
fn ensure_loaded<A: FinanceApi>(
    s: &mut Session<A>,
    kind: TransactionKind,
    id: RowId,
    m: &clap::ArgMatches,
) -> Result<()> {
    if !s.transactions(kind).table().contains(id) {
        let query = range_query(s, m);
        s.transactions(kind).search(&query)?;
    }
    Ok(())
}

pub fn add<A: FinanceApi>(
    s: &mut Session<A>,
    kind: TransactionKind,
    m: &clap::ArgMatches,
) -> Result<RowId> {
    let form = TransactionForm {
        category_id: text(m, "category"),
        amount: text(m, "amount"),
        date: text(m, "date"),
        description: text(m, "description"),
        debtor: text(m, "debtor"),
    };
    Ok(s.transactions(kind).create(&form)?)
}

pub fn edit<A: FinanceApi>(
    s: &mut Session<A>,
    kind: TransactionKind,
    m: &clap::ArgMatches,
) -> Result<RowId> {
    let id = *required::<i64>(m, "id")?;
    ensure_loaded(s, kind, id, m)?;
    let ctl = s.transactions(kind);

    // Unset flags keep the row's current values.
    let current = ctl.get(id).cloned();
    let keep = |name: &str, f: &dyn Fn(&Transaction) -> String| {
        m.get_one::<String>(name)
            .cloned()
            .or_else(|| current.as_ref().map(f))
            .unwrap_or_default()
    };
    let form = TransactionEditForm {
        category_id: keep("category", &|r| {
            r.category_id.map(|c| c.to_string()).unwrap_or_default()
        }),
        amount: keep("amount", &|r| r.amount.to_string()),
        date: keep("date", &|r| r.date.to_string()),
        description: keep("description", &|r| r.description.clone()),
    };
    Ok(ctl.edit(id, &form)?)
}

pub fn remove<A: FinanceApi>(
    s: &mut Session<A>,
    kind: TransactionKind,
    m: &clap::ArgMatches,
) -> Result<RowId> {
    let id = *required::<i64>(m, "id")?;
    ensure_loaded(s, kind, id, m)?;
    Ok(s.transactions(kind).delete(id)?)
}

fn search<A: FinanceApi>(
    s: &mut Session<A>,
    kind: TransactionKind,
    m: &clap::ArgMatches,
) -> Result<()> {
    let query = match m.get_one::<String>("category") {
        Some(name) => TransactionQuery::Category(name.clone()),
        None => range_query(s, m),
    };
    s.transactions(kind).search(&query)?;
    Ok(())
}

pub fn rows_table(rows: &[Transaction]) -> Table {
    let body = rows
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.category_name.clone(),
                t.description.clone(),
                t.date.to_string(),
                fmt_money(&t.amount),
            ]
        })
        .collect();
    pretty_table(&["ID", "Category", "Description", "Date", "Amount"], body)
}

pub fn summary_table(p: &Projection) -> Table {
    let mut body: Vec<Vec<String>> = p
        .by_category
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                fmt_money(&c.amount),
                format!("{}%", c.percentage),
            ]
        })
        .collect();
    body.push(vec!["Total".into(), fmt_money(&p.total), String::new()]);
    pretty_table(&["Category", "Amount", "Share"], body)
}

fn print_row(out: &mut dyn Write, row: Option<&Transaction>) -> Result<()> {
    if let Some(row) = row {
        writeln!(out, "{}", rows_table(std::slice::from_ref(row)))?;
    }
    Ok(())
}

fn print_listing<A: FinanceApi>(
    out: &mut dyn Write,
    s: &mut Session<A>,
    kind: TransactionKind,
    m: &clap::ArgMatches,
) -> Result<()> {
    let ctl = s.transactions(kind);
    if maybe_print_json(out, m.get_flag("json"), m.get_flag("jsonl"), &ctl.rows())? {
        return Ok(());
    }
    if !ctl.rows().is_empty() {
        writeln!(out, "{}", rows_table(ctl.rows()))?;
        writeln!(out, "{}", summary_table(ctl.projection()))?;
    }
    Ok(())
}
