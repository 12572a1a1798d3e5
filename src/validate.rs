// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local form validation. Every rule runs before any request is built, and a
//! form that passes is turned into the typed request the API client sends.

use crate::api::{
    BudgetMonth, DateRange, NewBudgetExpense, NewCategory, NewLedgerEntry, NewTransaction,
    RouteStyle, Settlement, TransactionPatch,
};
use crate::models::{LedgerEntry, RowId, TransactionKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

pub const DESCRIPTION_LIMIT: usize = 100;
pub const DEBTOR_NAME_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} are required fields.")]
    MissingFields(String),
    #[error("Invalid amount '{0}'.")]
    InvalidAmount(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("Invalid identifier '{0}'.")]
    InvalidId(String),
    #[error("Amount should be a non-negative number.")]
    NegativeAmount,
    #[error("Amount should be a positive number.")]
    NonPositiveAmount,
    #[error("Please select a date that is not in the future.")]
    FutureDate,
    #[error("Please select a date taken.")]
    DateTakenRequired,
    #[error("Date taken cannot be in the future.")]
    FutureDateTaken,
    #[error("Due date cannot be before the date taken.")]
    DueBeforeTaken,
    #[error("Due date cannot be in the past.")]
    DueDateInPast,
    #[error("Please select a date for the payment.")]
    DatePaidRequired,
    #[error("Payment exceeds the outstanding amount of {0}.")]
    Overpayment(Decimal),
    #[error("Description should not exceed 100 characters.")]
    DescriptionTooLong,
    #[error("Debtor name should not be empty and should not exceed 20 characters.")]
    InvalidDebtorName,
    #[error(
        "Debtor is required for \"Debt\" transactions. \
         Debtors will be created in the Credit tab when you lend out money"
    )]
    DebtorRequired,
    #[error("Category name cannot be empty.")]
    EmptyCategoryName,
    #[error("Category name cannot exceed {0} characters.")]
    CategoryNameTooLong(usize),
    #[error("Select a budget first.")]
    NoBudgetSelected,
    #[error("Please select both \"From\" and \"To\" dates.")]
    MissingRange,
    #[error("\"From\" date should not be greater than \"To\" date.")]
    InvertedRange,
    #[error("Selected dates should not be in the future.")]
    FutureRange,
    #[error("Invalid month {0}, expected 1-12.")]
    InvalidMonth(u32),
}

/// Source of "today" for the date rules.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The client's local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionForm {
    pub category_id: String,
    pub amount: String,
    pub date: String,
    pub description: String,
    /// Income only.
    pub debtor: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionEditForm {
    pub category_id: String,
    pub amount: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryForm {
    pub name: String,
    /// Income only.
    pub income_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct BudgetExpenseForm {
    pub budget_id: Option<RowId>,
    pub expense_id: String,
    pub expected_amount: String,
}

#[derive(Debug, Clone, Default)]
pub struct BudgetExpenseEditForm {
    pub expected_amount: String,
}

#[derive(Debug, Clone, Default)]
pub struct LedgerForm {
    pub debtor: String,
    pub amount: String,
    pub date_taken: String,
    pub date_due: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    pub amount: String,
    pub date_paid: String,
}

#[derive(Debug, Clone, Default)]
pub struct DateRangeForm {
    pub from: String,
    pub to: String,
}

fn amount(raw: &str) -> Result<Decimal, ValidationError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidAmount(raw.trim().to_string()))
}

fn non_negative(raw: &str) -> Result<Decimal, ValidationError> {
    let v = amount(raw)?;
    if v.is_sign_negative() && !v.is_zero() {
        return Err(ValidationError::NegativeAmount);
    }
    Ok(v)
}

fn date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.trim().to_string()))
}

fn id(raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidId(raw.trim().to_string()))
}

fn description(raw: &str) -> Result<String, ValidationError> {
    let d = raw.trim();
    if d.chars().count() > DESCRIPTION_LIMIT {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(d.to_string())
}

fn not_future(d: NaiveDate, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if d > today {
        return Err(ValidationError::FutureDate);
    }
    Ok(d)
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn transaction(
    form: &TransactionForm,
    kind: TransactionKind,
    debt_category_id: i64,
    today: NaiveDate,
) -> Result<NewTransaction, ValidationError> {
    if blank(&form.category_id) || blank(&form.amount) || blank(&form.date) {
        return Err(ValidationError::MissingFields(format!(
            "{} Category, Amount, and Date",
            kind.title()
        )));
    }
    let category_id = id(&form.category_id)?;
    let amount = non_negative(&form.amount)?;
    let date = not_future(date(&form.date)?, today)?;

    let debtor = form.debtor.trim().to_string();
    if kind == TransactionKind::Income && category_id == debt_category_id && debtor.is_empty() {
        return Err(ValidationError::DebtorRequired);
    }

    Ok(NewTransaction {
        kind,
        category_id,
        amount,
        date,
        description: description(&form.description)?,
        debtor: (kind == TransactionKind::Income).then_some(debtor),
    })
}

/// Manage routes never send a category, so it is optional there.
pub fn transaction_edit(
    form: &TransactionEditForm,
    routes: RouteStyle,
    today: NaiveDate,
) -> Result<TransactionPatch, ValidationError> {
    let (category_missing, fields) = match routes {
        RouteStyle::Classic => (blank(&form.category_id), "Category, Amount, and Date"),
        RouteStyle::Manage => (false, "Amount and Date"),
    };
    if category_missing || blank(&form.amount) || blank(&form.date) {
        return Err(ValidationError::MissingFields(fields.to_string()));
    }
    let category_id = if blank(&form.category_id) {
        None
    } else {
        Some(id(&form.category_id)?)
    };
    Ok(TransactionPatch {
        category_id,
        amount: non_negative(&form.amount)?,
        date: not_future(date(&form.date)?, today)?,
        description: description(&form.description)?,
    })
}

pub fn category(
    form: &CategoryForm,
    kind: TransactionKind,
) -> Result<NewCategory, ValidationError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyCategoryName);
    }
    let limit = kind.category_name_limit();
    if name.chars().count() > limit {
        return Err(ValidationError::CategoryNameTooLong(limit));
    }
    let income_type = match kind {
        TransactionKind::Expense => None,
        TransactionKind::Income => {
            if blank(&form.income_type) {
                return Err(ValidationError::MissingFields(
                    "Category name and Income type".to_string(),
                ));
            }
            Some(id(&form.income_type)?)
        }
    };
    Ok(NewCategory {
        kind,
        name: name.to_string(),
        income_type,
    })
}

pub fn budget_expense(form: &BudgetExpenseForm) -> Result<NewBudgetExpense, ValidationError> {
    let budget_id = form.budget_id.ok_or(ValidationError::NoBudgetSelected)?;
    if blank(&form.expense_id) || blank(&form.expected_amount) {
        return Err(ValidationError::MissingFields(
            "Expense and Expected amount".to_string(),
        ));
    }
    Ok(NewBudgetExpense {
        budget_id,
        expense_id: id(&form.expense_id)?,
        expected_amount: non_negative(&form.expected_amount)?,
    })
}

pub fn budget_expense_edit(form: &BudgetExpenseEditForm) -> Result<Decimal, ValidationError> {
    if blank(&form.expected_amount) {
        return Err(ValidationError::MissingFields("Expected amount".to_string()));
    }
    non_negative(&form.expected_amount)
}

pub fn ledger_entry(
    form: &LedgerForm,
    today: NaiveDate,
) -> Result<NewLedgerEntry, ValidationError> {
    let debtor = form.debtor.trim();
    if debtor.is_empty() || debtor.chars().count() > DEBTOR_NAME_LIMIT {
        return Err(ValidationError::InvalidDebtorName);
    }
    let amount = non_negative(&form.amount)?;

    if blank(&form.date_taken) {
        return Err(ValidationError::DateTakenRequired);
    }
    let date_taken = date(&form.date_taken)?;
    if date_taken > today {
        return Err(ValidationError::FutureDateTaken);
    }

    let date_due = if blank(&form.date_due) {
        None
    } else {
        let due = date(&form.date_due)?;
        if due < date_taken {
            return Err(ValidationError::DueBeforeTaken);
        }
        if due < today {
            return Err(ValidationError::DueDateInPast);
        }
        Some(due)
    };

    Ok(NewLedgerEntry {
        debtor: debtor.to_string(),
        amount,
        date_taken,
        date_due,
        description: description(&form.description)?,
    })
}

pub fn payment(
    form: &PaymentForm,
    entry: &LedgerEntry,
    today: NaiveDate,
) -> Result<Settlement, ValidationError> {
    let amount = amount(&form.amount)?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    if blank(&form.date_paid) {
        return Err(ValidationError::DatePaidRequired);
    }
    let date_paid = not_future(date(&form.date_paid)?, today)?;
    let outstanding = entry.outstanding();
    if amount > outstanding {
        return Err(ValidationError::Overpayment(outstanding));
    }
    Ok(Settlement {
        debtor: entry.debtor.clone(),
        amount,
        date_paid,
        entry_id: entry.id,
    })
}

pub fn date_range(form: &DateRangeForm, today: NaiveDate) -> Result<DateRange, ValidationError> {
    if blank(&form.from) || blank(&form.to) {
        return Err(ValidationError::MissingRange);
    }
    let from = date(&form.from)?;
    let to = date(&form.to)?;
    if from > to {
        return Err(ValidationError::InvertedRange);
    }
    if from > today || to > today {
        return Err(ValidationError::FutureRange);
    }
    Ok(DateRange { from, to })
}

pub fn budget_month(year: i32, month: u32) -> Result<BudgetMonth, ValidationError> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::InvalidMonth(month));
    }
    Ok(BudgetMonth { year, month })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ledger;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn debt_form() -> LedgerForm {
        LedgerForm {
            debtor: "Alice".into(),
            amount: "100".into(),
            date_taken: "2023-01-01".into(),
            ..Default::default()
        }
    }

    #[test]
    fn debt_form_accepts_minimal_input() {
        let req = ledger_entry(&debt_form(), today()).unwrap();
        assert_eq!(req.debtor, "Alice");
        assert_eq!(req.amount, dec!(100));
        assert_eq!(req.date_due, None);
        assert_eq!(req.description, "");
    }

    #[test]
    fn debt_form_rejections() {
        let cases: Vec<(LedgerForm, ValidationError)> = vec![
            (
                LedgerForm {
                    debtor: "  ".into(),
                    ..debt_form()
                },
                ValidationError::InvalidDebtorName,
            ),
            (
                LedgerForm {
                    debtor: "a".repeat(21),
                    ..debt_form()
                },
                ValidationError::InvalidDebtorName,
            ),
            (
                LedgerForm {
                    amount: "-1".into(),
                    ..debt_form()
                },
                ValidationError::NegativeAmount,
            ),
            (
                LedgerForm {
                    date_taken: "2024-06-16".into(),
                    ..debt_form()
                },
                ValidationError::FutureDateTaken,
            ),
            (
                LedgerForm {
                    date_due: "2022-12-31".into(),
                    ..debt_form()
                },
                ValidationError::DueBeforeTaken,
            ),
            (
                LedgerForm {
                    date_due: "2024-01-01".into(),
                    ..debt_form()
                },
                ValidationError::DueDateInPast,
            ),
            (
                LedgerForm {
                    description: "x".repeat(101),
                    ..debt_form()
                },
                ValidationError::DescriptionTooLong,
            ),
        ];
        for (form, expected) in cases {
            assert_eq!(ledger_entry(&form, today()).unwrap_err(), expected);
        }
    }

    #[test]
    fn twenty_character_debtor_is_fine() {
        let form = LedgerForm {
            debtor: "b".repeat(20),
            ..debt_form()
        };
        assert!(ledger_entry(&form, today()).is_ok());
    }

    #[test]
    fn transaction_requires_fields() {
        let form = TransactionForm {
            amount: "10".into(),
            date: "2024-06-01".into(),
            ..Default::default()
        };
        let err = transaction(&form, TransactionKind::Expense, 1, today()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expense Category, Amount, and Date are required fields."
        );
    }

    #[test]
    fn transaction_rejects_future_and_negative() {
        let base = TransactionForm {
            category_id: "3".into(),
            amount: "10".into(),
            date: "2024-06-15".into(),
            ..Default::default()
        };
        assert!(transaction(&base, TransactionKind::Expense, 1, today()).is_ok());
        let future = TransactionForm {
            date: "2024-06-16".into(),
            ..base.clone()
        };
        assert_eq!(
            transaction(&future, TransactionKind::Expense, 1, today()).unwrap_err(),
            ValidationError::FutureDate
        );
        let negative = TransactionForm {
            amount: "-0.01".into(),
            ..base
        };
        assert_eq!(
            transaction(&negative, TransactionKind::Expense, 1, today()).unwrap_err(),
            ValidationError::NegativeAmount
        );
    }

    #[test]
    fn income_debt_category_needs_debtor() {
        let form = TransactionForm {
            category_id: "1".into(),
            amount: "10".into(),
            date: "2024-06-01".into(),
            ..Default::default()
        };
        assert_eq!(
            transaction(&form, TransactionKind::Income, 1, today()).unwrap_err(),
            ValidationError::DebtorRequired
        );
        let req = transaction(
            &TransactionForm {
                debtor: "Bob".into(),
                ..form
            },
            TransactionKind::Income,
            1,
            today(),
        )
        .unwrap();
        assert_eq!(req.debtor.as_deref(), Some("Bob"));
    }

    #[test]
    fn edit_needs_category_only_on_classic_routes() {
        let form = TransactionEditForm {
            amount: "60".into(),
            date: "2024-06-10".into(),
            ..Default::default()
        };
        assert_eq!(
            transaction_edit(&form, RouteStyle::Classic, today()).unwrap_err(),
            ValidationError::MissingFields("Category, Amount, and Date".into())
        );
        let patch = transaction_edit(&form, RouteStyle::Manage, today()).unwrap();
        assert_eq!(patch.category_id, None);
        assert_eq!(patch.amount, dec!(60));

        let with_category = TransactionEditForm {
            category_id: "5".into(),
            ..form.clone()
        };
        let patch = transaction_edit(&with_category, RouteStyle::Classic, today()).unwrap();
        assert_eq!(patch.category_id, Some(5));

        let no_amount = TransactionEditForm {
            amount: String::new(),
            ..form
        };
        assert_eq!(
            transaction_edit(&no_amount, RouteStyle::Manage, today()).unwrap_err(),
            ValidationError::MissingFields("Amount and Date".into())
        );
    }

    #[test]
    fn category_limits_depend_on_kind() {
        let form = CategoryForm {
            name: "n".repeat(51),
            income_type: "2".into(),
        };
        assert!(category(&form, TransactionKind::Expense).is_ok());
        assert_eq!(
            category(&form, TransactionKind::Income).unwrap_err(),
            ValidationError::CategoryNameTooLong(50)
        );
        let long = CategoryForm {
            name: "n".repeat(101),
            ..Default::default()
        };
        assert_eq!(
            category(&long, TransactionKind::Expense).unwrap_err(),
            ValidationError::CategoryNameTooLong(100)
        );
    }

    #[test]
    fn payment_must_be_positive_and_fit() {
        let entry = LedgerEntry {
            id: 4,
            ledger: Ledger::Debt,
            debtor: "Alice".into(),
            amount: dec!(100),
            amount_paid: dec!(60),
            date_taken: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            date_due: None,
            description: String::new(),
            progress: dec!(60),
        };
        let zero = PaymentForm {
            amount: "0".into(),
            date_paid: "2024-06-01".into(),
        };
        assert_eq!(
            payment(&zero, &entry, today()).unwrap_err(),
            ValidationError::NonPositiveAmount
        );
        let too_much = PaymentForm {
            amount: "41".into(),
            date_paid: "2024-06-01".into(),
        };
        assert_eq!(
            payment(&too_much, &entry, today()).unwrap_err(),
            ValidationError::Overpayment(dec!(40))
        );
        let ok = payment(
            &PaymentForm {
                amount: "40".into(),
                date_paid: "2024-06-01".into(),
            },
            &entry,
            today(),
        )
        .unwrap();
        assert_eq!(ok.entry_id, 4);
    }

    #[test]
    fn date_range_rules() {
        let form = |from: &str, to: &str| DateRangeForm {
            from: from.into(),
            to: to.into(),
        };
        assert_eq!(
            date_range(&form("", "2024-01-01"), today()).unwrap_err(),
            ValidationError::MissingRange
        );
        assert_eq!(
            date_range(&form("2024-02-01", "2024-01-01"), today()).unwrap_err(),
            ValidationError::InvertedRange
        );
        assert_eq!(
            date_range(&form("2024-06-01", "2024-07-01"), today()).unwrap_err(),
            ValidationError::FutureRange
        );
        assert!(date_range(&form("2024-06-01", "2024-06-15"), today()).is_ok());
    }
}
