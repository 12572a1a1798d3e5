// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod categories;
pub mod config;
pub mod dashboard;
pub mod debts;
pub mod doctor;
pub mod exporter;
pub mod shell;
pub mod transactions;

use crate::api::FinanceApi;
use crate::config::Config;
use crate::models::{Ledger, RowId, TransactionKind};
use crate::notify::{Banner, Level};
use crate::sync::{
    BudgetExpenseView, BudgetView, CategoryView, LedgerView, SyncController, TransactionView,
};
use crate::validate::{Clock, SystemClock};
use anyhow::Result;
use chrono::NaiveDate;
use std::io::{self, Write};
use std::time::Instant;

/// Every view a user can open, each behind its own controller.
pub struct Session<A: FinanceApi> {
    pub expenses: SyncController<TransactionView, A>,
    pub incomes: SyncController<TransactionView, A>,
    pub expense_categories: SyncController<CategoryView, A>,
    pub income_categories: SyncController<CategoryView, A>,
    pub budgets: SyncController<BudgetView, A>,
    pub budget_lines: SyncController<BudgetExpenseView, A>,
    pub debts: SyncController<LedgerView, A>,
    pub credits: SyncController<LedgerView, A>,
    /// Budget whose lines are loaded in `budget_lines`.
    pub current_budget: Option<RowId>,
    pub config: Config,
    clock: Box<dyn Clock>,
}

impl<A: FinanceApi + Clone> Session<A> {
    pub fn new(api: A, config: Config) -> Self {
        Self::with_clock(api, config, SystemClock)
    }

    pub fn with_clock<C>(api: A, config: Config, clock: C) -> Self
    where
        C: Clock + Clone + 'static,
    {
        let debt_cat = config.debt_income_category_id;
        let routes = config.transaction_routes;
        let ctl = |c: &C| -> Box<dyn Clock> { Box::new(c.clone()) };
        Self {
            expenses: SyncController::new(
                TransactionView::new(TransactionKind::Expense, debt_cat).with_routes(routes),
                api.clone(),
            )
            .with_clock(ctl(&clock)),
            incomes: SyncController::new(
                TransactionView::new(TransactionKind::Income, debt_cat).with_routes(routes),
                api.clone(),
            )
            .with_clock(ctl(&clock)),
            expense_categories: SyncController::new(
                CategoryView {
                    kind: TransactionKind::Expense,
                },
                api.clone(),
            )
            .with_clock(ctl(&clock)),
            income_categories: SyncController::new(
                CategoryView {
                    kind: TransactionKind::Income,
                },
                api.clone(),
            )
            .with_clock(ctl(&clock)),
            budgets: SyncController::new(BudgetView, api.clone()).with_clock(ctl(&clock)),
            budget_lines: SyncController::new(BudgetExpenseView, api.clone())
                .with_clock(ctl(&clock)),
            debts: SyncController::new(
                LedgerView {
                    ledger: Ledger::Debt,
                },
                api.clone(),
            )
            .with_clock(ctl(&clock)),
            credits: SyncController::new(
                LedgerView {
                    ledger: Ledger::Credit,
                },
                api,
            )
            .with_clock(ctl(&clock)),
            current_budget: None,
            config,
            clock: Box::new(clock),
        }
    }
}

impl<A: FinanceApi> Session<A> {
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn transactions(
        &mut self,
        kind: TransactionKind,
    ) -> &mut SyncController<TransactionView, A> {
        match kind {
            TransactionKind::Expense => &mut self.expenses,
            TransactionKind::Income => &mut self.incomes,
        }
    }

    pub fn categories(&mut self, kind: TransactionKind) -> &mut SyncController<CategoryView, A> {
        match kind {
            TransactionKind::Expense => &mut self.expense_categories,
            TransactionKind::Income => &mut self.income_categories,
        }
    }

    pub fn ledger(&mut self, ledger: Ledger) -> &mut SyncController<LedgerView, A> {
        match ledger {
            Ledger::Debt => &mut self.debts,
            Ledger::Credit => &mut self.credits,
        }
    }

    /// Collect the banners raised by every view since the last call,
    /// dropping any that had already faded out by `now`.
    pub fn take_notices(&mut self, now: Instant) -> Vec<Banner> {
        let mut out = Vec::new();
        out.extend(self.expenses.notices().take_visible(now));
        out.extend(self.incomes.notices().take_visible(now));
        out.extend(self.expense_categories.notices().take_visible(now));
        out.extend(self.income_categories.notices().take_visible(now));
        out.extend(self.budgets.notices().take_visible(now));
        out.extend(self.budget_lines.notices().take_visible(now));
        out.extend(self.debts.notices().take_visible(now));
        out.extend(self.credits.notices().take_visible(now));
        out.sort_by_key(|b| b.raised_at);
        out
    }
}

/// Print success and info banners once, when the command finishes. A
/// terminal has no fade, so a banner is either printed or skipped. Failures
/// reach the user through the returned error instead.
pub fn print_notices(out: &mut dyn Write, banners: &[Banner]) -> io::Result<()> {
    for b in banners {
        match b.level {
            Level::Success => writeln!(out, "✅ {}", b.message)?,
            Level::Info => writeln!(out, "ℹ️  {}", b.message)?,
            Level::Error => {}
        }
    }
    Ok(())
}

/// Route one parsed command line to its view, writing its output to `out`.
pub fn dispatch<A: FinanceApi>(
    session: &mut Session<A>,
    m: &clap::ArgMatches,
    out: &mut dyn Write,
) -> Result<()> {
    let result = match m.subcommand() {
        Some(("expense", sub)) => transactions::handle(session, TransactionKind::Expense, sub, out),
        Some(("income", sub)) => transactions::handle(session, TransactionKind::Income, sub, out),
        Some(("category", sub)) => categories::handle(session, sub, out),
        Some(("budget", sub)) => budgets::handle(session, sub, out),
        Some(("debt", sub)) => debts::handle(session, Ledger::Debt, sub, out),
        Some(("credit", sub)) => debts::handle(session, Ledger::Credit, sub, out),
        Some(("dashboard", sub)) => dashboard::handle(session, sub, out),
        Some(("export", sub)) => exporter::handle(session, sub, out),
        Some(("doctor", _)) => doctor::handle(session, out),
        _ => Ok(()),
    };
    print_notices(out, &session.take_notices(Instant::now()))?;
    result
}
