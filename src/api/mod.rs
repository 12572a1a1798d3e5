// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The finance tracker's HTTP contract, as seen from the client.
//!
//! [`FinanceApi`] has one method per endpoint the sync layer talks to. The
//! request types below serialise to exactly the bodies the server expects;
//! responses live in [`wire`].

pub mod http;
pub mod wire;

use crate::models::{BudgetExpense, Ledger, RowId, TransactionKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use wire::{
    BudgetSearch, CategoryTransactions, ChartData, CreatedBudget, CreatedBudgetExpense,
    CreatedCategory, CreatedTransaction, EditedBudgetExpense, LedgerRecord, SettlementResult,
    TransactionEdit, TransactionSearch,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    /// 2xx response whose body carries an `error` field.
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// Message suitable for an error banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Rejected(m) => m.clone(),
            other => other.to_string(),
        }
    }
}

/// Which family of routes edits and deletes transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStyle {
    /// `POST /edit_{kind}_transaction`, `POST /delete_{kind}_transaction`
    #[default]
    Classic,
    /// `PUT|DELETE /manage_{kind}_transaction/{id}?action=edit|delete`
    Manage,
}

impl fmt::Display for RouteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteStyle::Classic => f.write_str("classic"),
            RouteStyle::Manage => f.write_str("manage"),
        }
    }
}

impl FromStr for RouteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(RouteStyle::Classic),
            "manage" => Ok(RouteStyle::Manage),
            other => Err(format!("Unknown route style '{}'", other)),
        }
    }
}

/// Amounts go out as JSON numbers: integers when whole, floats otherwise.
pub fn json_amount<S: Serializer>(d: &Decimal, s: S) -> Result<S::Ok, S::Error> {
    if d.fract().is_zero() {
        if let Some(i) = d.to_i64() {
            return s.serialize_i64(i);
        }
    }
    match d.to_f64() {
        Some(f) => s.serialize_f64(f),
        None => s.serialize_str(&d.to_string()),
    }
}

fn empty_if_none<S: Serializer>(d: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
        None => s.serialize_str(""),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub category_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    /// Present for income only.
    pub debtor: Option<String>,
}

impl NewTransaction {
    /// Multipart form fields for `POST /create_{kind}_transaction`.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let category_key = match self.kind {
            TransactionKind::Expense => "expenseCategory",
            TransactionKind::Income => "incomeCategory",
        };
        let mut fields = vec![
            (category_key, self.category_id.to_string()),
            ("amount", self.amount.to_string()),
            ("date", self.date.format("%Y-%m-%d").to_string()),
        ];
        if let Some(debtor) = &self.debtor {
            fields.push(("debtor", debtor.clone()));
        }
        fields.push(("description", self.description.clone()));
        fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPatch {
    /// Always set for classic routes. Manage routes cannot change the category.
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
}

/// Body of `POST /edit_{kind}_transaction`.
#[derive(Debug, Clone, Serialize)]
pub struct EditTransactionBody<'a> {
    pub transaction_id: RowId,
    pub new_date: NaiveDate,
    #[serde(serialize_with = "json_amount")]
    pub new_amount: Decimal,
    pub new_description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_category_id: Option<i64>,
}

/// Body of `PUT /manage_{kind}_transaction/{id}?action=edit`.
#[derive(Debug, Clone, Serialize)]
pub struct ManageTransactionBody<'a> {
    pub description: &'a str,
    #[serde(serialize_with = "json_amount")]
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub kind: TransactionKind,
    pub name: String,
    /// Income categories belong to an income type.
    pub income_type: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetMonth {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBudgetExpense {
    #[serde(rename = "budgetId")]
    pub budget_id: RowId,
    pub expense_id: i64,
    #[serde(serialize_with = "json_amount")]
    pub expected_amount: Decimal,
}

/// Body of `POST /edit_budget_expense`.
#[derive(Debug, Clone, Serialize)]
pub struct EditBudgetExpenseBody {
    pub budget_expense_id: RowId,
    pub budget_id: RowId,
    #[serde(rename = "expenseId")]
    pub expense_id: i64,
    #[serde(serialize_with = "json_amount")]
    pub edited_expected_amount: Decimal,
}

impl EditBudgetExpenseBody {
    pub fn new(row: &BudgetExpense, expected: Decimal) -> Self {
        Self {
            budget_expense_id: row.id,
            budget_id: row.budget_id,
            expense_id: row.expense_id,
            edited_expected_amount: expected,
        }
    }
}

/// Body of `POST /debt` and `POST /credit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLedgerEntry {
    pub debtor: String,
    #[serde(serialize_with = "json_amount")]
    pub amount: Decimal,
    #[serde(rename = "dateTaken")]
    pub date_taken: NaiveDate,
    #[serde(rename = "dateDue", serialize_with = "empty_if_none")]
    pub date_due: Option<NaiveDate>,
    pub description: String,
}

/// Body of `POST /{ledger}/settle`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    #[serde(rename = "debtorPayment")]
    pub debtor: String,
    #[serde(rename = "amountToPay", serialize_with = "json_amount")]
    pub amount: Decimal,
    #[serde(rename = "datePaid")]
    pub date_paid: NaiveDate,
    #[serde(rename = "creditId")]
    pub entry_id: RowId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

pub trait FinanceApi {
    fn create_transaction(&self, req: &NewTransaction) -> Result<CreatedTransaction, ApiError>;
    fn edit_transaction(
        &self,
        kind: TransactionKind,
        id: RowId,
        patch: &TransactionPatch,
    ) -> Result<TransactionEdit, ApiError>;
    fn delete_transaction(&self, kind: TransactionKind, id: RowId) -> Result<(), ApiError>;
    fn search_transactions(
        &self,
        kind: TransactionKind,
        range: &DateRange,
    ) -> Result<TransactionSearch, ApiError>;
    fn transactions_by_category(
        &self,
        kind: TransactionKind,
        category_name: &str,
    ) -> Result<CategoryTransactions, ApiError>;

    fn create_category(&self, req: &NewCategory) -> Result<CreatedCategory, ApiError>;

    fn create_budget(&self) -> Result<CreatedBudget, ApiError>;
    fn search_budget(&self, month: &BudgetMonth) -> Result<BudgetSearch, ApiError>;
    fn budget_expenses(&self, budget_id: RowId) -> Result<BudgetSearch, ApiError>;
    fn create_budget_expense(
        &self,
        req: &NewBudgetExpense,
    ) -> Result<CreatedBudgetExpense, ApiError>;
    fn edit_budget_expense(
        &self,
        body: &EditBudgetExpenseBody,
    ) -> Result<EditedBudgetExpense, ApiError>;
    fn delete_budget_expense(&self, id: RowId) -> Result<(), ApiError>;

    fn create_ledger_entry(
        &self,
        ledger: Ledger,
        req: &NewLedgerEntry,
    ) -> Result<LedgerRecord, ApiError>;
    fn settle(&self, ledger: Ledger, req: &Settlement) -> Result<SettlementResult, ApiError>;

    fn chart_data(&self) -> Result<ChartData, ApiError>;
}
