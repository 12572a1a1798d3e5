// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{FakeApi, session};
use finsync::cli;
use finsync::commands;
use finsync::error::SyncError;
use finsync::models::TransactionKind;
use finsync::notify::Level;
use finsync::validate::{CategoryForm, TransactionForm, ValidationError};
use serde_json::json;

fn form(name: &str) -> CategoryForm {
    CategoryForm {
        name: name.into(),
        ..Default::default()
    }
}

#[test]
fn duplicate_expense_category_is_reported_as_such() {
    let api = FakeApi::new();
    api.reply("/create_expense_category", json!({"success": true, "id": 5, "name": "Fuel"}));
    api.reply("/create_expense_category", json!({"success": false}));
    let mut s = session(&api);

    s.expense_categories.create(&form("Fuel")).unwrap();
    let err = s.expense_categories.create(&form("Fuel")).unwrap_err();

    assert!(matches!(err, SyncError::Rejected(_)));
    assert_eq!(err.to_string(), "Category names must be unique");
    assert_eq!(s.expense_categories.rows().len(), 1);
    let banner = s.expense_categories.notices().last().cloned().unwrap();
    assert_eq!(banner.level, Level::Error);
    assert_eq!(banner.message, "Category names must be unique");
}

#[test]
fn duplicate_income_category_from_server_error() {
    let api = FakeApi::new();
    api.fail("/create_income_category", 400, "UNIQUE constraint failed");
    let mut s = session(&api);

    let err = s
        .income_categories
        .create(&CategoryForm {
            name: "Salary".into(),
            income_type: "1".into(),
        })
        .unwrap_err();

    assert_eq!(err.to_string(), "Category names must be unique");
    assert!(s.income_categories.rows().is_empty());
}

#[test]
fn income_category_sends_income_type() {
    let api = FakeApi::new();
    api.reply(
        "/create_income_category",
        json!({
            "message": "Category created successfully",
            "category_name": "Salary", "category_id": 9
        }),
    );
    let mut s = session(&api);
    let m = cli::build_cli().get_matches_from([
        "finsync", "category", "add", "--kind", "income", "--name", "Salary", "--income-type", "2",
    ]);

    let mut out = Vec::new();
    commands::dispatch(&mut s, &m, &mut out).unwrap();

    assert_eq!(
        api.bodies("/create_income_category"),
        vec![json!({"categoryName": "Salary", "incomeType": "2"})]
    );
    let c = s.income_categories.get(9).unwrap();
    assert_eq!(c.name, "Salary");
    assert_eq!(c.kind, TransactionKind::Income);
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("category 'Salary' has id 9"));
}

#[test]
fn category_names_are_bounded_per_kind() {
    let api = FakeApi::new();
    let mut s = session(&api);

    let err = s.expense_categories.create(&form(&"e".repeat(101))).unwrap_err();
    assert!(matches!(
        err,
        SyncError::Validation(ValidationError::CategoryNameTooLong(100))
    ));
    let err = s
        .income_categories
        .create(&CategoryForm {
            name: "i".repeat(51),
            income_type: "1".into(),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::Validation(ValidationError::CategoryNameTooLong(50))
    ));
    let err = s.expense_categories.create(&form("   ")).unwrap_err();
    assert_eq!(err.to_string(), "Category name cannot be empty.");
    assert_eq!(api.call_count(), 0);
}

#[test]
fn borrowed_income_needs_a_debtor() {
    let api = FakeApi::new();
    let mut s = session(&api);
    let debt_category = s.config.debt_income_category_id;

    let err = s
        .incomes
        .create(&TransactionForm {
            category_id: debt_category.to_string(),
            amount: "500".into(),
            date: "2024-06-01".into(),
            ..Default::default()
        })
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::Validation(ValidationError::DebtorRequired)
    ));
    assert_eq!(api.call_count(), 0);
}

#[test]
fn income_multipart_carries_debtor_field() {
    let api = FakeApi::new();
    api.reply(
        "/create_income_transaction",
        json!({
            "message": "Transaction created successfully",
            "transaction_id": 31, "income_category_name": "Loan",
            "amount": "500.00/=", "description": "from Ann", "date": "2024-06-01"
        }),
    );
    let mut s = session(&api);
    let debt_category = s.config.debt_income_category_id;

    s.incomes
        .create(&TransactionForm {
            category_id: debt_category.to_string(),
            amount: "500".into(),
            date: "2024-06-01".into(),
            description: "from Ann".into(),
            debtor: "Ann".into(),
        })
        .unwrap();

    assert_eq!(
        api.bodies("/create_income_transaction"),
        vec![json!({
            "incomeCategory": debt_category.to_string(),
            "amount": "500", "date": "2024-06-01",
            "debtor": "Ann", "description": "from Ann"
        })]
    );
    assert_eq!(s.incomes.get(31).unwrap().category_name, "Loan");
}
