// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{FakeApi, session};
use finsync::commands::shell;
use rust_decimal_macros::dec;
use serde_json::json;
use std::io::Cursor;

fn run(s: &mut finsync::commands::Session<FakeApi>, view: &str, script: &str) -> String {
    let mut out = Vec::new();
    shell::run(s, view, Cursor::new(script.as_bytes()), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn debts_recorded_in_shell_can_be_settled() {
    let api = FakeApi::new();
    api.reply(
        "/debt",
        json!({
            "id": 3, "debtor": "Alice", "amount": "100", "date_taken": "2023-01-01",
            "date_due": null, "description": "rent", "amount_paid": "0"
        }),
    );
    api.reply("/debt/settle", json!({"amountPaid": 100, "progress": 100}));
    let mut s = session(&api);

    let script = "\
add --debtor Alice --amount 100 --date-taken 2023-01-01 --description \"rent\"
settle 3 --amount 100 --date 2024-06-14
exit
";
    let out = run(&mut s, "debt", script);

    assert!(out.contains("finsync shell on 'debt'"));
    assert!(!out.contains("Error:"));
    assert!(out.contains("Alice"));
    assert!(out.contains("rent"));
    let row = s.debts.get(3).unwrap();
    assert!(row.is_settled());
    assert_eq!(row.outstanding(), dec!(0));
}

#[test]
fn errors_are_printed_and_the_loop_continues() {
    let api = FakeApi::new();
    api.reply(
        "/debt",
        json!({
            "id": 4, "debtor": "Bob", "amount": "10", "date_taken": "2024-06-01", "amount_paid": "0"
        }),
    );
    let mut s = session(&api);

    let script = "\
settle 99 --amount 5 --date 2024-06-14
bogus
add --debtor Bob --amount 10 --date-taken 2024-06-01
";
    let out = run(&mut s, "debt", script);

    assert!(out.contains("Error: debt 99 is not in the current view"));
    assert!(out.contains("unrecognized subcommand"));
    assert!(s.debts.get(4).is_some());
    assert_eq!(api.bodies("/debt").len(), 1);
}

#[test]
fn help_and_blank_lines_do_not_dispatch() {
    let api = FakeApi::new();
    let mut s = session(&api);

    let out = run(&mut s, "budget", "\n   \nhelp\nquit\nadd --expense 1 --expected 5\n");

    assert!(out.contains("Monthly budgets"));
    assert_eq!(api.call_count(), 0);
}
