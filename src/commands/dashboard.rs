// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Session;
use crate::api::FinanceApi;
use crate::models::TransactionKind;
use crate::projector::{ChartSeries, PIE_TOP_N, pie_chart, weekly_cash_out};
use crate::sync::TransactionQuery;
use crate::utils::{fmt_money, maybe_print_json, month_start, pretty_table};
use crate::validate::DateRangeForm;
use anyhow::{Context, Result};
use comfy_table::Table;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub expenses: ChartSeries,
    pub income: ChartSeries,
    pub cash_out: ChartSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalCharts>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalCharts {
    pub expenses: ChartSeries,
    pub weekly_cash_out: ChartSeries,
}

pub fn handle<A: FinanceApi>(
    s: &mut Session<A>,
    m: &clap::ArgMatches,
    out: &mut dyn Write,
) -> Result<()> {
    let board = build(s, m.get_flag("local"))?;
    if maybe_print_json(out, m.get_flag("json"), m.get_flag("jsonl"), &board)? {
        return Ok(());
    }
    writeln!(out, "Expenses\n{}", chart_table(&board.expenses))?;
    writeln!(out, "Income\n{}", chart_table(&board.income))?;
    writeln!(out, "Cash out\n{}", chart_table(&board.cash_out))?;
    if let Some(local) = &board.local {
        writeln!(out, "Expenses this month (local)\n{}", chart_table(&local.expenses))?;
        writeln!(out, "Weekly cash out (local)\n{}", chart_table(&local.weekly_cash_out))?;
    }
    Ok(())
}

pub fn build<A: FinanceApi>(s: &mut Session<A>, local: bool) -> Result<Dashboard> {
    let data = s
        .expenses
        .api()
        .chart_data()
        .context("Fetch chart data")?;
    let local = if local { Some(local_charts(s)?) } else { None };
    Ok(Dashboard {
        expenses: data.expense_chart_data,
        income: data.income_chart_data,
        cash_out: data.cash_out_chart_data,
        local,
    })
}

/// Charts derived from this month's expenses as loaded into the view.
pub fn local_charts<A: FinanceApi>(s: &mut Session<A>) -> Result<LocalCharts> {
    let today = s.today();
    let start = month_start(today);
    let query = TransactionQuery::Range(DateRangeForm {
        from: start.to_string(),
        to: today.to_string(),
    });
    let ctl = s.transactions(TransactionKind::Expense);
    ctl.search(&query)?;
    Ok(LocalCharts {
        expenses: pie_chart(ctl.projection(), PIE_TOP_N),
        weekly_cash_out: weekly_cash_out(ctl.rows(), start),
    })
}

pub fn chart_table(series: &ChartSeries) -> Table {
    let body = series
        .points()
        .enumerate()
        .map(|(i, (label, value))| {
            vec![
                label.to_string(),
                fmt_money(&value),
                series.colors.get(i).cloned().unwrap_or_default(),
            ]
        })
        .collect();
    pretty_table(&["Label", "Value", "Colour"], body)
}
