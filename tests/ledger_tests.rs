// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{FakeApi, session};
use finsync::cli;
use finsync::commands::debts;
use finsync::error::SyncError;
use finsync::models::Ledger;
use finsync::validate::{LedgerForm, PaymentForm, ValidationError};
use rust_decimal_macros::dec;
use serde_json::{Value, json};

fn debt_record(id: i64, debtor: &str, amount: &str, paid: &str) -> Value {
    json!({
        "id": id, "user_id": 1, "debtor": debtor,
        "amount": amount, "date_taken": "2023-01-01",
        "date_due": null, "description": null,
        "is_paid": false, "amount_paid": paid
    })
}

fn alice() -> LedgerForm {
    LedgerForm {
        debtor: "Alice".into(),
        amount: "100".into(),
        date_taken: "2023-01-01".into(),
        ..Default::default()
    }
}

#[test]
fn debt_is_posted_in_server_shape() {
    let api = FakeApi::new();
    api.reply("/debt", debt_record(3, "Alice", "100.00/=", "0.00/="));
    let mut s = session(&api);

    let m = cli::build_cli().get_matches_from([
        "finsync", "debt", "add", "--debtor", "Alice", "--amount", "100", "--date-taken",
        "2023-01-01",
    ]);
    let (_, debt) = m.subcommand().unwrap();
    let (_, add) = debt.subcommand().unwrap();
    let id = debts::add(&mut s, Ledger::Debt, add).unwrap();

    assert_eq!(id, 3);
    assert_eq!(
        api.bodies("/debt"),
        vec![json!({
            "debtor": "Alice", "amount": 100,
            "dateTaken": "2023-01-01", "dateDue": "", "description": ""
        })]
    );
    let row = s.debts.get(3).unwrap();
    assert_eq!(row.amount, dec!(100));
    assert_eq!(row.outstanding(), dec!(100));
    assert_eq!(s.debts.projection().total, dec!(100));
    assert!(s.credits.rows().is_empty());
}

#[test]
fn credit_goes_to_its_own_route() {
    let api = FakeApi::new();
    api.reply("/credit", debt_record(11, "Bob", "40", "0"));
    let mut s = session(&api);

    let form = LedgerForm {
        debtor: "Bob".into(),
        amount: "40".into(),
        ..alice()
    };
    s.credits.create(&form).unwrap();

    assert_eq!(api.bodies("/credit").len(), 1);
    assert!(api.bodies("/debt").is_empty());
    assert_eq!(s.credits.get(11).unwrap().ledger, Ledger::Credit);
}

#[test]
fn bad_loans_never_leave_the_client() {
    let api = FakeApi::new();
    let mut s = session(&api);
    let cases = vec![
        (
            LedgerForm {
                date_taken: "2024-06-10".into(),
                date_due: "2024-06-01".into(),
                ..alice()
            },
            ValidationError::DueBeforeTaken,
        ),
        (
            LedgerForm {
                date_taken: "2024-07-01".into(),
                ..alice()
            },
            ValidationError::FutureDateTaken,
        ),
        (
            LedgerForm {
                date_due: "2024-06-01".into(),
                ..alice()
            },
            ValidationError::DueDateInPast,
        ),
        (
            LedgerForm {
                debtor: "x".repeat(21),
                ..alice()
            },
            ValidationError::InvalidDebtorName,
        ),
        (
            LedgerForm {
                description: "d".repeat(101),
                ..alice()
            },
            ValidationError::DescriptionTooLong,
        ),
        (
            LedgerForm {
                date_taken: String::new(),
                ..alice()
            },
            ValidationError::DateTakenRequired,
        ),
    ];

    for (form, expected) in cases {
        match s.debts.create(&form) {
            Err(SyncError::Validation(e)) => assert_eq!(e, expected),
            other => panic!("expected {:?}, got {:?}", expected, other),
        }
    }
    assert_eq!(api.call_count(), 0);
    assert!(s.debts.rows().is_empty());
}

#[test]
fn settling_updates_paid_amount_and_progress() {
    let api = FakeApi::new();
    api.reply("/debt", debt_record(3, "Alice", "100", "0"));
    api.reply("/debt/settle", json!({"amountPaid": "60.00/=", "progress": "60.0%"}));
    let mut s = session(&api);
    s.debts.create(&alice()).unwrap();

    let payment = PaymentForm {
        amount: "60".into(),
        date_paid: "2024-06-14".into(),
    };
    s.debts.edit(3, &payment).unwrap();

    assert_eq!(
        api.bodies("/debt/settle"),
        vec![json!({
            "debtorPayment": "Alice", "amountToPay": 60,
            "datePaid": "2024-06-14", "creditId": 3
        })]
    );
    let row = s.debts.get(3).unwrap();
    assert_eq!(row.amount_paid, dec!(60));
    assert_eq!(row.progress, dec!(60));
    assert_eq!(row.outstanding(), dec!(40));
    assert_eq!(
        s.debts.notices().last().map(|b| b.message.clone()),
        Some("Payment recorded, 60% settled".to_string())
    );
}

#[test]
fn overpayment_is_refused_locally() {
    let api = FakeApi::new();
    api.reply("/debt", debt_record(3, "Alice", "100", "70"));
    let mut s = session(&api);
    s.debts.create(&alice()).unwrap();
    let calls = api.call_count();

    let err = s
        .debts
        .edit(
            3,
            &PaymentForm {
                amount: "31".into(),
                date_paid: "2024-06-14".into(),
            },
        )
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::Validation(ValidationError::Overpayment(o)) if o == dec!(30)
    ));
    assert_eq!(api.call_count(), calls);
    assert_eq!(s.debts.get(3).unwrap().amount_paid, dec!(70));
}

#[test]
fn settle_of_unknown_loan_is_not_in_view() {
    let api = FakeApi::new();
    let mut s = session(&api);
    let m = cli::build_cli().get_matches_from([
        "finsync", "credit", "settle", "9", "--amount", "5", "--date", "2024-06-14",
    ]);
    let (_, credit) = m.subcommand().unwrap();
    let (_, settle) = credit.subcommand().unwrap();

    let err = debts::settle(&mut s, Ledger::Credit, settle).unwrap_err();

    assert!(err.to_string().contains("not in the current view"));
    assert_eq!(api.call_count(), 0);
}
