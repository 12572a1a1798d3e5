// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Response bodies and the tolerant decoders they need.
//!
//! The tracker formats most numbers for display before sending them
//! (`"1,234.50/="`, `"12.5%"`), sends others as plain JSON numbers, and
//! encodes `date` columns either as `YYYY-MM-DD` or in RFC 2822 form.

use super::ApiError;
use crate::models::RowId;
use crate::projector::ChartSeries;
use crate::utils::parse_display_amount;
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(serde_json::Number),
    Str(String),
}

impl NumOrStr {
    fn into_decimal(self) -> Option<Decimal> {
        match self {
            NumOrStr::Num(n) => n
                .to_string()
                .parse::<Decimal>()
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
            NumOrStr::Str(s) => parse_display_amount(&s),
        }
    }
}

pub fn decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
    let raw = NumOrStr::deserialize(d)?;
    raw.into_decimal()
        .ok_or_else(|| D::Error::custom("expected a number or a display-formatted amount"))
}

/// Like [`decimal`], with `null` or absent read as zero.
pub fn decimal_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
    match Option::<NumOrStr>::deserialize(d)? {
        None => Ok(Decimal::ZERO),
        Some(raw) => raw
            .into_decimal()
            .ok_or_else(|| D::Error::custom("expected a number or a display-formatted amount")),
    }
}

pub fn opt_decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
    match Option::<NumOrStr>::deserialize(d)? {
        None => Ok(None),
        Some(raw) => raw
            .into_decimal()
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a number or a display-formatted amount")),
    }
}

pub fn decimals<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Decimal>, D::Error> {
    let raw = Vec::<Option<NumOrStr>>::deserialize(d)?;
    raw.into_iter()
        .map(|v| match v {
            None => Ok(Decimal::ZERO),
            Some(v) => v
                .into_decimal()
                .ok_or_else(|| D::Error::custom("expected a list of amounts")),
        })
        .collect()
}

/// Accepts `YYYY-MM-DD`, an ISO timestamp, or Flask's RFC 2822 encoding.
pub fn parse_wire_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    s.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let s = String::deserialize(d)?;
    parse_wire_date(&s).ok_or_else(|| D::Error::custom(format!("unrecognised date '{}'", s)))
}

pub fn opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(d)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_wire_date(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unrecognised date '{}'", s))),
    }
}

fn string_or_null<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Text of an `error` (or failing `message`) field, if the body has one.
pub fn error_message(body: &Value) -> Option<String> {
    let obj = body.as_object()?;
    match obj.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => match obj.get("message") {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        },
        Some(other) => Some(other.to_string()),
    }
}

/// Decode a 2xx body. An `error` field turns the response into a failure.
pub fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    check_ack(&body)?;
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// For endpoints whose success carries no payload worth reading.
pub fn check_ack(body: &Value) -> Result<(), ApiError> {
    match body.get("error") {
        None | Some(Value::Null) => Ok(()),
        Some(_) => Err(ApiError::Rejected(
            error_message(body).unwrap_or_else(|| "request rejected".to_string()),
        )),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTransaction {
    #[serde(default)]
    pub message: String,
    pub transaction_id: RowId,
    #[serde(
        default,
        alias = "expense_category_name",
        alias = "income_category_name"
    )]
    pub category_name: String,
    #[serde(deserialize_with = "decimal")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
    #[serde(deserialize_with = "date")]
    pub date: NaiveDate,
}

/// Fields echoed back by an edit. Classic routes prefix them with `new_`,
/// manage routes send them bare under `data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditedFields {
    #[serde(default, alias = "transaction_id")]
    pub id: Option<RowId>,
    #[serde(default, alias = "new_date", deserialize_with = "opt_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, alias = "new_amount", deserialize_with = "opt_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default, alias = "new_description")]
    pub description: Option<String>,
    #[serde(default, alias = "new_category_id", deserialize_with = "opt_id")]
    pub category_id: Option<i64>,
    #[serde(default, alias = "new_category_name")]
    pub category_name: Option<String>,
}

fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    match Option::<NumOrStr>::deserialize(d)? {
        None => Ok(None),
        Some(NumOrStr::Num(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected an integer id")),
        Some(NumOrStr::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an integer id, got '{}'", s))),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionEdit {
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "data")]
    pub edited_transaction: EditedFields,
}

/// One category's `(amount, percentage)` as computed by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerShare(
    #[serde(deserialize_with = "decimal")] pub Decimal,
    #[serde(deserialize_with = "decimal")] pub Decimal,
);

#[derive(Debug, Clone, Deserialize)]
pub struct FoundTransaction {
    pub id: RowId,
    #[serde(alias = "category", alias = "category_name", default)]
    pub name: String,
    #[serde(deserialize_with = "decimal")]
    pub amount: Decimal,
    #[serde(deserialize_with = "date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionSearch {
    #[serde(
        default,
        alias = "total_expense",
        alias = "total_income",
        deserialize_with = "decimal_or_zero"
    )]
    pub total: Decimal,
    #[serde(default, alias = "individual_expenses", alias = "individual_incomes")]
    pub rows: Vec<FoundTransaction>,
    #[serde(default, alias = "expense_totals", alias = "income_totals")]
    pub totals: BTreeMap<String, ServerShare>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryTransactions {
    #[serde(default)]
    pub transactions: Vec<FoundTransaction>,
    #[serde(
        default,
        alias = "total_expenses",
        alias = "total_incomes",
        alias = "total_income",
        deserialize_with = "decimal_or_zero"
    )]
    pub total: Decimal,
}

fn yes() -> bool {
    true
}

/// Expense categories answer `{success, id, name}`, income categories
/// `{message, category_id, category_name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedCategory {
    #[serde(default = "yes")]
    pub success: bool,
    #[serde(default, alias = "category_id")]
    pub id: Option<RowId>,
    #[serde(default, alias = "category_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedBudget {
    pub id: RowId,
    #[serde(deserialize_with = "int_or_string")]
    pub year: i32,
    pub month: MonthLabel,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub expected_amount: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub spent_amount: Decimal,
}

fn int_or_string<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    match NumOrStr::deserialize(d)? {
        NumOrStr::Num(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| D::Error::custom("expected a year")),
        NumOrStr::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected a year, got '{}'", s))),
    }
}

fn opt_year<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    #[derive(Deserialize)]
    struct Wrap(#[serde(deserialize_with = "int_or_string")] i32);
    Ok(Option::<Wrap>::deserialize(d)?.map(|w| w.0))
}

/// A month sent either as its number or its English name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MonthLabel {
    Number(u32),
    Name(String),
}

impl MonthLabel {
    pub fn number(&self) -> Option<u32> {
        match self {
            MonthLabel::Number(n) if (1..=12).contains(n) => Some(*n),
            MonthLabel::Number(_) => None,
            MonthLabel::Name(s) => {
                if let Ok(n) = s.trim().parse::<u32>() {
                    return MonthLabel::Number(n).number();
                }
                s.trim()
                    .parse::<chrono::Month>()
                    .ok()
                    .map(|m| m.number_from_month())
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoundBudgetExpense {
    pub id: RowId,
    pub budget_id: RowId,
    pub expense_id: i64,
    #[serde(default)]
    pub expense_name: String,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub expected_amount: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub spent_amount: Decimal,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub percentage: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetSearch {
    #[serde(default)]
    pub budget_id: Option<RowId>,
    #[serde(default, deserialize_with = "opt_year")]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<MonthLabel>,
    #[serde(default)]
    pub budget_expenses: Vec<FoundBudgetExpense>,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_expected_amount: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_spent_amount: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub percent: Decimal,
    #[serde(default)]
    pub expense_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedBudgetExpense {
    #[serde(default)]
    pub message: String,
    pub budget_expense_id: RowId,
    #[serde(default)]
    pub expense_name: String,
    #[serde(deserialize_with = "decimal")]
    pub expected_amount: Decimal,
    #[serde(
        default,
        alias = "spent_amount",
        deserialize_with = "decimal_or_zero"
    )]
    pub actual_amount: Decimal,
    pub expense_id: i64,
    pub budget_id: RowId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditedBudgetExpense {
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub updated_expected_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerRecord {
    pub id: RowId,
    pub debtor: String,
    #[serde(deserialize_with = "decimal")]
    pub amount: Decimal,
    #[serde(deserialize_with = "date")]
    pub date_taken: NaiveDate,
    #[serde(default, deserialize_with = "opt_date")]
    pub date_due: Option<NaiveDate>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub amount_paid: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettlementResult {
    #[serde(rename = "amountPaid", deserialize_with = "decimal")]
    pub amount_paid: Decimal,
    #[serde(deserialize_with = "decimal")]
    pub progress: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub expense_chart_data: ChartSeries,
    #[serde(default)]
    pub income_chart_data: ChartSeries,
    #[serde(default)]
    pub cash_out_chart_data: ChartSeries,
}
