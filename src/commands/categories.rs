// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Session;
use crate::api::FinanceApi;
use crate::models::{RowId, TransactionKind};
use crate::validate::CategoryForm;
use anyhow::Result;
use std::io::Write;

pub fn handle<A: FinanceApi>(
    s: &mut Session<A>,
    m: &clap::ArgMatches,
    out: &mut dyn Write,
) -> Result<()> {
    if let Some(("add", sub)) = m.subcommand() {
        let kind = kind_of(sub);
        let id = add(s, sub)?;
        if let Some(c) = s.categories(kind).get(id) {
            writeln!(out, "{} category '{}' has id {}", kind.title(), c.name, c.id)?;
        }
    }
    Ok(())
}

fn kind_of(m: &clap::ArgMatches) -> TransactionKind {
    match m.get_one::<String>("kind").map(String::as_str) {
        Some("income") => TransactionKind::Income,
        _ => TransactionKind::Expense,
    }
}

pub fn add<A: FinanceApi>(s: &mut Session<A>, m: &clap::ArgMatches) -> Result<RowId> {
    let kind = kind_of(m);
    let form = CategoryForm {
        name: m.get_one::<String>("name").cloned().unwrap_or_default(),
        income_type: m.get_one::<String>("income-type").cloned().unwrap_or_default(),
    };
    Ok(s.categories(kind).create(&form)?)
}
