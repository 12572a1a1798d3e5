// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn range_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("from")
            .long("from")
            .help("Start date YYYY-MM-DD (default: first day of this month)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .help("End date YYYY-MM-DD (default: today)"),
    )
}

fn output_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn row_id() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Row id")
}

fn transaction_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(Arg::new("category").long("category").help("Category id"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD"))
                .arg(
                    Arg::new("description")
                        .long("description")
                        .default_value(""),
                )
                .arg(
                    Arg::new("debtor")
                        .long("debtor")
                        .default_value("")
                        .help("Lender's name, for income from a loan"),
                ),
        )
        .subcommand(range_args(
            Command::new("edit")
                .about("Change a transaction in the current view")
                .arg(row_id())
                .arg(Arg::new("category").long("category").help("Category id"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("description").long("description")),
        ))
        .subcommand(range_args(
            Command::new("rm")
                .about("Delete a transaction in the current view")
                .arg(row_id()),
        ))
        .subcommand(output_args(range_args(
            Command::new("search")
                .about("Load transactions by date range or category")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .conflicts_with_all(["from", "to"])
                        .help("Category name"),
                ),
        )))
        .subcommand(output_args(
            Command::new("list").about("Show the current view"),
        ))
}

fn ledger_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand(
            Command::new("add")
                .about("Record a loan")
                .arg(Arg::new("debtor").long("debtor"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("date-taken").long("date-taken"))
                .arg(Arg::new("date-due").long("date-due").default_value(""))
                .arg(
                    Arg::new("description")
                        .long("description")
                        .default_value(""),
                ),
        )
        .subcommand(
            Command::new("settle")
                .about("Record a payment against a loan in the current view")
                .arg(row_id())
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("date").long("date").help("Payment date YYYY-MM-DD")),
        )
        .subcommand(output_args(
            Command::new("list").about("Show the loans recorded in this session"),
        ))
}

pub fn build_cli() -> Command {
    Command::new("finsync")
        .version(clap::crate_version!())
        .about("Keep a local view of your finance tracker in sync with its server")
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Tracker server URL (overrides config and FINSYNC_BASE_URL)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(transaction_cmd("expense", "Expense transactions"))
        .subcommand(transaction_cmd("income", "Income transactions"))
        .subcommand(
            Command::new("category").about("Categories").subcommand(
                Command::new("add")
                    .about("Create a category")
                    .arg(
                        Arg::new("kind")
                            .long("kind")
                            .value_parser(["expense", "income"])
                            .default_value("expense"),
                    )
                    .arg(Arg::new("name").long("name").default_value(""))
                    .arg(
                        Arg::new("income-type")
                            .long("income-type")
                            .default_value("")
                            .help("Income type id (income categories)"),
                    ),
            ),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly budgets")
                .subcommand(Command::new("create").about("Create this month's budget"))
                .subcommand(output_args(
                    Command::new("show")
                        .about("Load a budget's lines")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .help("YYYY-MM (default: this month)"),
                        )
                        .arg(
                            Arg::new("budget")
                                .long("budget")
                                .value_parser(value_parser!(i64))
                                .conflicts_with("month")
                                .help("Budget id"),
                        ),
                ))
                .subcommand(
                    Command::new("add")
                        .about("Add an expense line to a budget")
                        .arg(Arg::new("expense").long("expense").help("Expense category id"))
                        .arg(Arg::new("expected").long("expected"))
                        .arg(
                            Arg::new("budget")
                                .long("budget")
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change a line's expected amount")
                        .arg(row_id())
                        .arg(Arg::new("expected").long("expected"))
                        .arg(
                            Arg::new("budget")
                                .long("budget")
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a line from a budget")
                        .arg(row_id())
                        .arg(
                            Arg::new("budget")
                                .long("budget")
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(ledger_cmd("debt", "Money you owe"))
        .subcommand(ledger_cmd("credit", "Money you lent"))
        .subcommand(output_args(
            Command::new("dashboard")
                .about("Chart data from the server")
                .arg(
                    Arg::new("local")
                        .long("local")
                        .action(ArgAction::SetTrue)
                        .help("Also chart this month's expenses from the local view"),
                ),
        ))
        .subcommand(range_args(
            Command::new("export")
                .about("Export a view")
                .arg(
                    Arg::new("view")
                        .required(true)
                        .value_parser(["expense", "income", "budget", "debt", "credit"]),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                )
                .arg(Arg::new("out").long("out").required(true))
                .arg(Arg::new("month").long("month").help("Budget month YYYY-MM")),
        ))
        .subcommand(Command::new("doctor").about("Check configuration and server"))
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-url")
                        .arg(Arg::new("url").required(true)),
                ),
        )
        .subcommand(
            Command::new("shell")
                .about("Interactive session on one view")
                .arg(
                    Arg::new("view")
                        .required(true)
                        .value_parser(["expense", "income", "budget", "debt", "credit"]),
                ),
        )
}
