// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Month;
use comfy_table::{Cell, Color};
use serde::Serialize;

use super::{fetch, json_flags, year_or_current};
use crate::api::{ListParams, Resource, ResourceApi};
use crate::models::{Account, AuditEntry, Customer, Expense, TaxRecord, Transaction, Vendor};
use crate::money::{format_currency, format_percent};
use crate::stats::{self, StatCard};
use crate::status::{EntityKind, style_for};
use crate::utils::{cards_table, maybe_print_json, opt_arg, parse_period, pretty_table};

pub fn handle(api: &dyn ResourceApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("revenue", sub)) => revenue(api, sub)?,
        Some(("cashflow", sub)) => cashflow(api, sub)?,
        Some(("payables", sub)) => {
            let vendors: Vec<Vendor> = fetch(api, Resource::Vendors, ListParams::default());
            print_summary(sub, &stats::party_summary(&vendors), &stats::payables_cards(&vendors))?
        }
        Some(("receivables", sub)) => {
            let customers: Vec<Customer> = fetch(api, Resource::Customers, ListParams::default());
            print_summary(
                sub,
                &stats::party_summary(&customers),
                &stats::receivables_cards(&customers),
            )?
        }
        Some(("cash", sub)) => {
            let accounts: Vec<Account> = fetch(api, Resource::Accounts, ListParams::default());
            print_summary(sub, &stats::cash_position(&accounts), &stats::cash_cards(&accounts))?
        }
        Some(("tax", sub)) => {
            let year = year_or_current(sub);
            let records: Vec<TaxRecord> =
                fetch(api, Resource::TaxRecords, ListParams::default().filter("year", year));
            print_summary(sub, &stats::tax_summary(&records, year), &stats::tax_cards(&records, year))?
        }
        Some(("expenses", sub)) => expenses(api, sub)?,
        Some(("audit", sub)) => audit(api, sub)?,
        _ => {}
    }
    Ok(())
}

fn print_summary<T: Serialize>(sub: &clap::ArgMatches, summary: &T, cards: &[StatCard]) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    if !maybe_print_json(json_flag, jsonl_flag, summary)? {
        println!("{}", cards_table(cards));
    }
    Ok(())
}

fn revenue(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let period = opt_arg(sub, "period").map(parse_period).transpose()?;
    let txs: Vec<Transaction> = fetch(api, Resource::Transactions, ListParams::default());
    print_summary(
        sub,
        &stats::revenue_summary(&txs, period),
        &stats::revenue_cards(&txs, period),
    )
}

fn cashflow(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let year = year_or_current(sub);
    let txs: Vec<Transaction> = fetch(api, Resource::Transactions, ListParams::default());
    let months = stats::monthly_cash_flow(&txs, year);
    if maybe_print_json(json_flag, jsonl_flag, &months)? {
        return Ok(());
    }
    println!("{}", cards_table(&stats::cash_flow_cards(&txs, year)));
    let mut t = pretty_table(&["Month", "Inflow", "Outflow", "Net"], vec![]);
    for m in &months {
        let name = u8::try_from(m.month)
            .ok()
            .and_then(|n| Month::try_from(n).ok())
            .map(|mo| mo.name().to_string())
            .unwrap_or_else(|| m.month.to_string());
        t.add_row(vec![
            Cell::new(name),
            Cell::new(format_currency(m.inflow)).fg(Color::Green),
            Cell::new(format_currency(m.outflow)).fg(Color::Red),
            Cell::new(format_currency(m.net)),
        ]);
    }
    println!("{}", t);
    Ok(())
}

fn expenses(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let expenses: Vec<Expense> = fetch(api, Resource::Expenses, ListParams::default());
    let summary = stats::expense_summary(&expenses);
    if maybe_print_json(json_flag, jsonl_flag, &summary)? {
        return Ok(());
    }
    println!("{}", cards_table(&stats::expense_cards(&expenses)));
    let mut t = pretty_table(&["Category", "Claims", "Approved", "Approval Rate", "Amount", "Health"], vec![]);
    for c in &summary.categories {
        t.add_row(vec![
            Cell::new(&c.category),
            Cell::new(c.count),
            Cell::new(c.approved_count),
            Cell::new(format_percent(c.approval_rate)),
            Cell::new(format_currency(c.amount)),
            Cell::new(c.health.label()).fg(c.health.tone().term_color()),
        ]);
    }
    println!("{}", t);
    Ok(())
}

fn audit(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(50);
    let mut params = ListParams::with_limit(limit);
    if let Some(a) = opt_arg(sub, "action") {
        params = params.filter("action", a);
    }
    if let Some(u) = opt_arg(sub, "user") {
        params = params.filter("user", u);
    }
    let mut entries: Vec<AuditEntry> = fetch(api, Resource::AuditLogs, params);
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries.truncate(limit);
    if maybe_print_json(json_flag, jsonl_flag, &entries)? {
        return Ok(());
    }
    let mut t = pretty_table(&["When", "User", "Action", "Entity", "Details"], vec![]);
    for e in &entries {
        let style = style_for(EntityKind::AuditAction, e.action.as_str());
        let entity = match e.entity_id {
            Some(ref id) => format!("{} #{}", e.entity, id),
            None => e.entity.clone(),
        };
        t.add_row(vec![
            Cell::new(e.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(&e.user),
            Cell::new(e.action.as_str()).fg(style.tone.term_color()),
            Cell::new(entity),
            Cell::new(e.details.clone().unwrap_or_default()),
        ]);
    }
    println!("{}", t);
    Ok(())
}
