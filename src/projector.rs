// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Summary figures derived from a table snapshot. Nothing here is stored or
//! mutated on its own; every change to the table recomputes the projection.

use crate::models::{BudgetExpense, LedgerEntry, Transaction};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Slice colours used by the tracker's charts.
pub const PALETTE: [&str; 7] = [
    "#ffb65d", "#465bca", "#9d3171", "#3eeed0", "#ff5497", "#309a6a", "#141c33",
];

/// Number of named slices before the rest is folded into "Others".
pub const PIE_TOP_N: usize = 6;

pub trait Projectable {
    /// Category (or equivalent grouping) the row contributes to.
    fn bucket(&self) -> &str;
    fn amount(&self) -> Decimal;
    fn date(&self) -> Option<NaiveDate> {
        None
    }
}

impl Projectable for Transaction {
    fn bucket(&self) -> &str {
        &self.category_name
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

impl Projectable for BudgetExpense {
    fn bucket(&self) -> &str {
        &self.expense_name
    }
    fn amount(&self) -> Decimal {
        self.spent_amount
    }
}

impl Projectable for LedgerEntry {
    fn bucket(&self) -> &str {
        &self.debtor
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn date(&self) -> Option<NaiveDate> {
        Some(self.date_taken)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub name: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Projection {
    pub total: Decimal,
    /// Largest first, ties by name.
    pub by_category: Vec<CategoryShare>,
    /// Daily totals in date order.
    pub series: Vec<SeriesPoint>,
}

impl Projection {
    pub fn share(&self, name: &str) -> Option<&CategoryShare> {
        self.by_category.iter().find(|s| s.name == name)
    }
}

/// `part / whole * 100` to two places; 0 when `whole` is 0 or the result
/// does not fit in a `Decimal`.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .map(|p| p.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

pub fn project<R: Projectable>(rows: &[R]) -> Projection {
    let mut total = Decimal::ZERO;
    let mut buckets: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

    for row in rows {
        let amount = row.amount();
        total += amount;
        *buckets.entry(row.bucket()).or_insert(Decimal::ZERO) += amount;
        if let Some(d) = row.date() {
            *days.entry(d).or_insert(Decimal::ZERO) += amount;
        }
    }

    let mut by_category: Vec<CategoryShare> = buckets
        .into_iter()
        .map(|(name, amount)| CategoryShare {
            name: name.to_string(),
            amount,
            percentage: percentage(amount, total),
        })
        .collect();
    by_category.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));

    let series = days
        .into_iter()
        .map(|(date, amount)| SeriesPoint { date, amount })
        .collect();

    Projection {
        total,
        by_category,
        series,
    }
}

/// Data for one chart, in the shape the dashboard endpoint also uses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "crate::api::wire::decimals")]
    pub values: Vec<Decimal>,
    #[serde(default)]
    pub colors: Vec<String>,
}

impl ChartSeries {
    pub fn points(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Pie chart of category percentages: the `top_n` largest categories, then
/// one "Others" slice for the remainder.
pub fn pie_chart(projection: &Projection, top_n: usize) -> ChartSeries {
    let mut labels = Vec::new();
    let mut values = Vec::new();
    for share in projection.by_category.iter().take(top_n) {
        labels.push(share.name.clone());
        values.push(share.percentage);
    }
    if projection.by_category.len() > top_n {
        let rest: Decimal = projection.by_category[top_n..]
            .iter()
            .map(|s| s.percentage)
            .sum();
        labels.push("Others".to_string());
        values.push(rest);
    }
    let colors = (0..labels.len())
        .map(|i| PALETTE[i % PALETTE.len()].to_string())
        .collect();
    ChartSeries {
        labels,
        values,
        colors,
    }
}

/// Four weekly totals for the month containing `month_start`. Days after the
/// 28th count towards week 4.
pub fn weekly_cash_out<R: Projectable>(rows: &[R], month_start: NaiveDate) -> ChartSeries {
    let mut weeks = [Decimal::ZERO; 4];
    for row in rows {
        let Some(date) = row.date() else { continue };
        if date.year() != month_start.year() || date.month() != month_start.month() {
            continue;
        }
        let week = ((date.day0() / 7) as usize).min(3);
        weeks[week] += row.amount();
    }
    ChartSeries {
        labels: (1..=4).map(|w| format!("Week {}", w)).collect(),
        values: weeks.to_vec(),
        colors: Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BudgetSummary {
    pub total_expected: Decimal,
    pub total_spent: Decimal,
    pub percent: Decimal,
    pub count: usize,
}

impl BudgetSummary {
    pub fn from_rows(rows: &[BudgetExpense]) -> Self {
        let total_expected: Decimal = rows.iter().map(|r| r.expected_amount).sum();
        let total_spent: Decimal = rows.iter().map(|r| r.spent_amount).sum();
        Self {
            total_expected,
            total_spent,
            percent: percentage(total_spent, total_expected),
            count: rows.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LedgerSummary {
    pub total_amount: Decimal,
    pub total_paid: Decimal,
    pub outstanding: Decimal,
    pub count: usize,
}

impl LedgerSummary {
    pub fn from_rows(rows: &[LedgerEntry]) -> Self {
        let total_amount: Decimal = rows.iter().map(|r| r.amount).sum();
        let total_paid: Decimal = rows.iter().map(|r| r.amount_paid).sum();
        Self {
            total_amount,
            total_paid,
            outstanding: rows.iter().map(LedgerEntry::outstanding).sum(),
            count: rows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use rust_decimal_macros::dec;

    fn tx(id: i64, cat: &str, amount: Decimal, day: u32) -> Transaction {
        Transaction {
            id,
            kind: TransactionKind::Expense,
            category_id: None,
            category_name: cat.to_string(),
            description: String::new(),
            amount,
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        }
    }

    #[test]
    fn percentage_out_of_range_is_zero() {
        assert_eq!(percentage(dec!(1), dec!(0)), dec!(0));
        assert_eq!(percentage(Decimal::MAX, dec!(0.0001)), dec!(0));
        assert_eq!(percentage(Decimal::MAX, dec!(1)), dec!(0));
        assert_eq!(percentage(dec!(60), dec!(100)), dec!(60));
    }

    #[test]
    fn shares_sum_to_one_hundred() {
        let rows = vec![
            tx(1, "Rent", dec!(100), 1),
            tx(2, "Food", dec!(100), 2),
            tx(3, "Fuel", dec!(100), 2),
        ];
        let p = project(&rows);
        assert_eq!(p.total, dec!(300));
        let sum: Decimal = p.by_category.iter().map(|s| s.percentage).sum();
        assert!((sum - dec!(100)).abs() <= dec!(0.03));
        assert_eq!(p.share("Food").unwrap().percentage, dec!(33.33));
        assert_eq!(p.series.len(), 2);
        assert_eq!(p.series[1].amount, dec!(200));
    }

    #[test]
    fn zero_total_gives_zero_percentages() {
        let rows = vec![tx(1, "Rent", dec!(0), 1), tx(2, "Food", dec!(0), 1)];
        let p = project(&rows);
        assert!(p.by_category.iter().all(|s| s.percentage.is_zero()));
    }

    #[test]
    fn categories_ordered_largest_first() {
        let rows = vec![
            tx(1, "Small", dec!(5), 1),
            tx(2, "Big", dec!(50), 1),
            tx(3, "Small", dec!(5), 3),
        ];
        let names: Vec<_> = project(&rows)
            .by_category
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Big", "Small"]);
    }

    #[test]
    fn pie_folds_tail_into_others() {
        let rows: Vec<_> = (1..=8)
            .map(|i| tx(i, &format!("c{}", i), Decimal::from(i), 1))
            .collect();
        let pie = pie_chart(&project(&rows), PIE_TOP_N);
        assert_eq!(pie.labels.len(), 7);
        assert_eq!(pie.labels.last().map(String::as_str), Some("Others"));
        assert_eq!(pie.colors[6], "#141c33");
    }

    #[test]
    fn weekly_buckets_fold_month_tail() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let rows = vec![
            tx(1, "a", dec!(1), 1),
            tx(2, "a", dec!(2), 8),
            tx(3, "a", dec!(4), 15),
            tx(4, "a", dec!(8), 22),
            tx(5, "a", dec!(16), 31),
        ];
        let weeks = weekly_cash_out(&rows, start);
        assert_eq!(weeks.values, vec![dec!(1), dec!(2), dec!(4), dec!(24)]);
    }

    #[test]
    fn budget_summary_guards_zero_expected() {
        let s = BudgetSummary::from_rows(&[]);
        assert_eq!(s.percent, Decimal::ZERO);
        assert_eq!(s.count, 0);
    }
}
