// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::io::Write;

const UA: &str = concat!(
    "finsync/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/finsync)"
);

pub fn http_client(timeout_secs: u64) -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

/// `YYYY-MM` into (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok((d.year(), d.month()))
}

pub fn month_start(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

static DISPLAY_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(-?)\s*([0-9][0-9,]*(?:\.[0-9]+)?|\.[0-9]+)\s*(?:/=|%)?\s*$")
        .expect("display amount pattern")
});

/// Read an amount the way the tracker displays it: `"1,234.50/="`,
/// `"12.5%"`, or just `"42"`.
pub fn parse_display_amount(s: &str) -> Option<Decimal> {
    let caps = DISPLAY_AMOUNT.captures(s)?;
    let digits: String = caps[2].chars().filter(|c| *c != ',').collect();
    let v = digits.parse::<Decimal>().ok()?;
    Some(if &caps[1] == "-" { -v } else { v })
}

/// Two decimals with thousands separators.
pub fn fmt_money(d: &Decimal) -> String {
    let s = format!("{:.2}", d.round_dp(2).abs());
    let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if d.is_sign_negative() && !d.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    out: &mut dyn Write,
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        writeln!(out, "{}", serde_json::to_string_pretty(v)?)?;
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                writeln!(out, "{}", serde_json::to_string(item)?)?;
            }
        } else {
            writeln!(out, "{}", serde_json::to_string(&val)?)?;
        }
        return Ok(true);
    }
    Ok(false)
}

/// Fetch an argument clap guarantees is present.
pub fn required<'a, T>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    m.get_one::<T>(name)
        .with_context(|| format!("Missing required argument '{}'", name))
}

/// Split a shell line into words. Single and double quotes group words;
/// a backslash escapes the next character outside single quotes.
pub fn split_args(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut cur = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('\''), _) => cur.push(c),
            (_, '\\') => match chars.next() {
                Some(n) => {
                    cur.push(n);
                    in_word = true;
                }
                None => bail!("Trailing backslash"),
            },
            (Some(_), _) => cur.push(c),
            (None, '\'') | (None, '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut cur));
                    in_word = false;
                }
            }
            (None, _) => {
                cur.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        bail!("Unterminated quote");
    }
    if in_word {
        words.push(cur);
    }
    Ok(words)
}
