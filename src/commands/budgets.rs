// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use comfy_table::Cell;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::{fetch, json_flags};
use crate::api::{ListParams, Resource, ResourceApi};
use crate::models::Budget;
use crate::money::{format_currency, format_percent};
use crate::stats::{budget_cards, budget_progress, budget_summary};
use crate::status::{EntityKind, style_for};
use crate::utils::{cards_table, maybe_print_json, pretty_table, status_cell};

const BAR_CELLS: usize = 20;

pub fn handle(api: &dyn ResourceApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, sub)?,
        Some(("report", sub)) => report(api, sub)?,
        _ => {}
    }
    Ok(())
}

fn load(api: &dyn ResourceApi, year: Option<i32>) -> Vec<Budget> {
    let mut params = ListParams::default();
    if let Some(y) = year {
        params = params.filter("year", y);
    }
    fetch(api, Resource::Budgets, params)
}

/// `bar_width` is already clamped to `[0, 100]`.
fn bar(width: Decimal) -> String {
    let filled = (width * Decimal::from(BAR_CELLS) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(BAR_CELLS);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

fn list(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let year = sub.get_one::<i32>("year").copied();
    let budgets = load(api, year);
    if maybe_print_json(json_flag, jsonl_flag, &budgets)? {
        return Ok(());
    }
    let mut t = pretty_table(
        &["Budget", "Year", "Allocated", "Spent", "Remaining", "Used", "", "Health", "Status"],
        vec![],
    );
    for b in &budgets {
        let p = budget_progress(b);
        t.add_row(vec![
            Cell::new(&p.name),
            Cell::new(b.year.map(|y| y.to_string()).unwrap_or_default()),
            Cell::new(format_currency(p.allocated)),
            Cell::new(format_currency(p.spent)),
            Cell::new(format_currency(p.remaining)),
            Cell::new(format_percent(p.percentage)),
            Cell::new(bar(p.bar_width)).fg(p.health.tone().term_color()),
            Cell::new(p.health.label()).fg(p.health.tone().term_color()),
            status_cell(&b.status, style_for(EntityKind::Budget, &b.status)),
        ]);
    }
    println!("{}", t);
    Ok(())
}

fn report(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let year = sub.get_one::<i32>("year").copied();
    let budgets = load(api, year);
    if maybe_print_json(json_flag, jsonl_flag, &budget_summary(&budgets, year))? {
        return Ok(());
    }
    println!("{}", cards_table(&budget_cards(&budgets, year)));
    Ok(())
}
