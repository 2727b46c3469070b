// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Color, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::money::Money;
use crate::stats::{Period, StatCard};
use crate::status::StatusStyle;

const UA: &str = concat!("guardian-erp/", env!("CARGO_PKG_VERSION"));

pub fn http_client(timeout_secs: u64) -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(UA)
        .build()
}

/// A required string argument. clap enforces presence, this keeps the lookup fallible.
pub fn arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing argument '{}'", name))
}

pub fn opt_arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    m.get_one::<String>(name).map(String::as_str)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// `2025` or `2025-03`.
pub fn parse_period(s: &str) -> Result<Period> {
    let s = s.trim();
    if let Some((y, m)) = s.split_once('-') {
        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
        Ok(Period::month(y.parse()?, m.parse()?))
    } else {
        let y: i32 = s
            .parse()
            .with_context(|| format!("Invalid year '{}', expected YYYY", s))?;
        Ok(Period::year(y))
    }
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_money(s: &str) -> Result<Money> {
    Money::from_str(s).with_context(|| format!("Invalid amount '{}'", s))
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

pub fn status_cell(status: &str, style: StatusStyle) -> Cell {
    Cell::new(crate::status::label(status)).fg(style.tone.term_color())
}

pub fn cards_table(cards: &[StatCard]) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(["Metric", "Value", "Trend", "Detail"].map(Cell::new));
    for c in cards {
        t.add_row(vec![
            Cell::new(&c.title),
            Cell::new(c.value.display()).fg(c.tone.term_color()),
            Cell::new(c.trend.map(|tr| tr.arrow()).unwrap_or("")).fg(Color::Grey),
            Cell::new(&c.subtitle),
        ]);
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
