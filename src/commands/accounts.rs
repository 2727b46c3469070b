// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use comfy_table::Cell;

use super::{fetch, json_flags};
use crate::api::{ListParams, Resource, ResourceApi};
use crate::models::Account;
use crate::money::format_currency;
use crate::stats::{cash_cards, cash_position};
use crate::status::{EntityKind, style_for};
use crate::utils::{cards_table, maybe_print_json, opt_arg, pretty_table, status_cell};

pub fn handle(api: &dyn ResourceApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, sub)?,
        Some(("summary", sub)) => summary(api, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let mut params = ListParams::default();
    if let Some(t) = opt_arg(sub, "type") {
        params = params.filter("type", t);
    }
    let accounts: Vec<Account> = fetch(api, Resource::Accounts, params);
    if maybe_print_json(json_flag, jsonl_flag, &accounts)? {
        return Ok(());
    }
    let mut t = pretty_table(&["Name", "Type", "Balance", "Reconciled", "Last Reconciled", "Status"], vec![]);
    for a in &accounts {
        t.add_row(vec![
            Cell::new(&a.name),
            Cell::new(a.r#type.as_str()),
            Cell::new(format_currency(a.current_balance)),
            Cell::new(if a.is_reconciled { "yes" } else { "no" }),
            Cell::new(a.last_reconciled_date.map(|d| d.to_string()).unwrap_or_default()),
            status_cell(&a.status, style_for(EntityKind::Account, &a.status)),
        ]);
    }
    println!("{}", t);
    Ok(())
}

fn summary(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let accounts: Vec<Account> = fetch(api, Resource::Accounts, ListParams::default());
    if maybe_print_json(json_flag, jsonl_flag, &cash_position(&accounts))? {
        return Ok(());
    }
    println!("{}", cards_table(&cash_cards(&accounts)));
    Ok(())
}
