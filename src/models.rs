// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier of any row.
pub type RowId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Path segment the server uses for this kind (`expense`, `income`).
    pub fn slug(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    /// Longest category name the server accepts for this kind.
    pub fn category_name_limit(self) -> usize {
        match self {
            TransactionKind::Income => 50,
            TransactionKind::Expense => 100,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RowId,
    pub kind: TransactionKind,
    pub category_id: Option<i64>, // search results only carry the name
    pub category_name: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: RowId,
    pub name: String,
    pub kind: TransactionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: RowId,
    pub year: i32,
    pub month: u32,
    pub expected_amount: Decimal,
    pub spent_amount: Decimal,
}

impl Budget {
    /// `YYYY-MM`
    pub fn period(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// A budget line. `spent_amount` is owned by the server; the client only
/// ever edits `expected_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetExpense {
    pub id: RowId,
    pub budget_id: RowId,
    pub expense_id: i64,
    pub expense_name: String,
    pub expected_amount: Decimal,
    pub spent_amount: Decimal,
}

impl BudgetExpense {
    /// Spent as a percentage of expected, 0 when nothing is expected.
    pub fn utilisation(&self) -> Decimal {
        crate::projector::percentage(self.spent_amount, self.expected_amount)
    }
}

/// Which side of a loan the ledger tracks: money owed by the user (`Debt`)
/// or money lent out (`Credit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ledger {
    Debt,
    Credit,
}

impl Ledger {
    pub fn slug(self) -> &'static str {
        match self {
            Ledger::Debt => "debt",
            Ledger::Credit => "credit",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Ledger::Debt => "Debt",
            Ledger::Credit => "Credit",
        }
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: RowId,
    pub ledger: Ledger,
    pub debtor: String,
    pub amount: Decimal,
    pub amount_paid: Decimal,
    pub date_taken: NaiveDate,
    pub date_due: Option<NaiveDate>,
    pub description: String,
    pub progress: Decimal,
}

impl LedgerEntry {
    pub fn outstanding(&self) -> Decimal {
        (self.amount - self.amount_paid).max(Decimal::ZERO)
    }

    pub fn is_settled(&self) -> bool {
        self.amount_paid >= self.amount
    }
}
