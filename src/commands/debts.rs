// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Session;
use crate::api::FinanceApi;
use crate::models::{Ledger, LedgerEntry, RowId};
use crate::projector::LedgerSummary;
use crate::utils::{fmt_money, maybe_print_json, pretty_table, required};
use crate::validate::{LedgerForm, PaymentForm};
use anyhow::Result;
use comfy_table::Table;
use std::io::Write;

pub fn handle<A: FinanceApi>(
    s: &mut Session<A>,
    ledger: Ledger,
    m: &clap::ArgMatches,
    out: &mut dyn Write,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let id = add(s, ledger, sub)?;
            print_row(out, s.ledger(ledger).get(id))?;
        }
        Some(("settle", sub)) => {
            let id = settle(s, ledger, sub)?;
            print_row(out, s.ledger(ledger).get(id))?;
        }
        Some(("list", sub)) => {
            let ctl = s.ledger(ledger);
            let rows = ctl.rows();
            if !maybe_print_json(out, sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                print_ledger(out, rows)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn text(m: &clap::ArgMatches, name: &str) -> String {
    m.get_one::<String>(name).cloned().unwrap_or_default()
}

pub fn add<A: FinanceApi>(
    s: &mut Session<A>,
    ledger: Ledger,
    m: &clap::ArgMatches,
) -> Result<RowId> {
    let form = LedgerForm {
        debtor: text(m, "debtor"),
        amount: text(m, "amount"),
        date_taken: text(m, "date-taken"),
        date_due: text(m, "date-due"),
        description: text(m, "description"),
    };
    Ok(s.ledger(ledger).create(&form)?)
}

/// Only loans recorded in this session can be settled: the tracker has no
/// endpoint that lists them.
pub fn settle<A: FinanceApi>(
    s: &mut Session<A>,
    ledger: Ledger,
    m: &clap::ArgMatches,
) -> Result<RowId> {
    let id = *required::<i64>(m, "id")?;
    let form = PaymentForm {
        amount: text(m, "amount"),
        date_paid: text(m, "date"),
    };
    Ok(s.ledger(ledger).edit(id, &form)?)
}

pub fn ledger_table(rows: &[LedgerEntry]) -> Table {
    let body = rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.debtor.clone(),
                fmt_money(&r.amount),
                fmt_money(&r.amount_paid),
                r.date_taken.to_string(),
                r.date_due.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                format!("{}%", r.progress),
                r.description.clone(),
            ]
        })
        .collect();
    pretty_table(
        &["ID", "Name", "Amount", "Paid", "Taken", "Due", "Progress", "Description"],
        body,
    )
}

fn print_row(out: &mut dyn Write, row: Option<&LedgerEntry>) -> Result<()> {
    if let Some(row) = row {
        writeln!(out, "{}", ledger_table(std::slice::from_ref(row)))?;
    }
    Ok(())
}

fn print_ledger(out: &mut dyn Write, rows: &[LedgerEntry]) -> Result<()> {
    if rows.is_empty() {
        writeln!(out, "Nothing recorded in this session yet.")?;
        return Ok(());
    }
    let summary = LedgerSummary::from_rows(rows);
    writeln!(out, "{}", ledger_table(rows))?;
    writeln!(
        out,
        "Total {}  Paid {}  Outstanding {}",
        fmt_money(&summary.total_amount),
        fmt_money(&summary.total_paid),
        fmt_money(&summary.outstanding)
    )?;
    Ok(())
}
