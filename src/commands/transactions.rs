// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use comfy_table::Cell;
use regex::Regex;
use serde_json::{Map, Value, json};

use super::{fetch, json_flags};
use crate::api::{ListParams, Resource, ResourceApi};
use crate::collection::{Collection, ScopeHandle};
use crate::models::{RecordId, Transaction, TransactionType};
use crate::money::format_currency;
use crate::status::{EntityKind, NEUTRAL, style_for};
use crate::utils::{arg, maybe_print_json, opt_arg, parse_date, parse_money, parse_period, pretty_table, status_cell};

pub fn handle(api: &dyn ResourceApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, sub)?,
        Some(("add", sub)) => add(api, sub)?,
        Some(("update", sub)) => update(api, sub)?,
        Some(("rm", sub)) => rm(api, sub)?,
        Some(("bulk-rm", sub)) => bulk_rm(api, sub)?,
        _ => {}
    }
    Ok(())
}

/// Mutations go through a collection so the list is refetched afterwards.
fn collection() -> Collection<Transaction> {
    Collection::new(Resource::Transactions, ListParams::default(), ScopeHandle::default())
}

fn add(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let ty_raw = arg(sub, "type")?;
    let ty = TransactionType::parse(ty_raw)
        .with_context(|| format!("Unknown transaction type '{}' (income|expense|transfer|adjustment)", ty_raw))?;
    let amount = parse_money(arg(sub, "amount")?)?;
    let date = match opt_arg(sub, "date") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };
    let body = json!({
        "type": ty.as_str(),
        "amount": amount,
        "transactionDate": date.to_string(),
        "description": opt_arg(sub, "description"),
        "accountId": opt_arg(sub, "account"),
        "status": arg(sub, "status")?,
    });
    let mut txs = collection();
    let created = txs
        .create(api, &body)
        .context("Failed to create transaction")?;
    let id: RecordId = created
        .get("id")
        .cloned()
        .map(serde_json::from_value)
        .transpose()?
        .unwrap_or_default();
    println!("Recorded {} {} on {} (id {})", ty.as_str(), format_currency(amount), date, id);
    println!("{} transactions on record", txs.items().len());
    Ok(())
}

fn update(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let id = RecordId::from(arg(sub, "id")?);
    let mut body = Map::new();
    if let Some(a) = opt_arg(sub, "amount") {
        body.insert("amount".into(), json!(parse_money(a)?));
    }
    if let Some(d) = opt_arg(sub, "description") {
        body.insert("description".into(), json!(d));
    }
    if let Some(s) = opt_arg(sub, "status") {
        if style_for(EntityKind::Transaction, s) == NEUTRAL {
            bail!("Unknown transaction status '{}'", s);
        }
        body.insert("status".into(), json!(s.trim().to_ascii_lowercase()));
    }
    if body.is_empty() {
        bail!("Nothing to update for transaction {} (use --amount, --description or --status)", id);
    }
    let mut txs = collection();
    txs.update(api, &id, &Value::Object(body))
        .with_context(|| format!("Failed to update transaction {}", id))?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let id = RecordId::from(arg(sub, "id")?);
    if !sub.get_flag("yes") {
        bail!("Refusing to delete transaction {} without --yes", id);
    }
    let mut txs = collection();
    txs.delete(api, &id)
        .with_context(|| format!("Failed to delete transaction {}", id))?;
    println!("Removed transaction {} ({} remaining)", id, txs.items().len());
    Ok(())
}

fn bulk_rm(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let ids: Vec<RecordId> = sub
        .get_many::<String>("ids")
        .into_iter()
        .flatten()
        .map(|s| RecordId::from(s.as_str()))
        .collect();
    if !sub.get_flag("yes") {
        bail!("Refusing to delete {} transactions without --yes", ids.len());
    }
    let (json_flag, jsonl_flag) = json_flags(sub);
    let mut txs = collection();
    let outcome = txs.bulk_delete(api, &ids);
    if !maybe_print_json(json_flag, jsonl_flag, &outcome)? {
        let mut rows: Vec<Vec<String>> = outcome
            .succeeded
            .iter()
            .map(|id| vec![id.to_string(), "deleted".into(), String::new()])
            .collect();
        rows.extend(
            outcome
                .failed
                .iter()
                .map(|f| vec![f.id.to_string(), "failed".into(), f.error.clone()]),
        );
        println!("{}", pretty_table(&["Id", "Result", "Error"], rows));
    }
    if !outcome.is_complete() {
        bail!(
            "{} of {} deletions failed",
            outcome.failed.len(),
            outcome.attempted()
        );
    }
    Ok(())
}

fn list(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let data = query_rows(api, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    let mut t = pretty_table(&["Id", "Date", "Type", "Amount", "Description", "Status"], vec![]);
    for tx in &data {
        t.add_row(vec![
            Cell::new(&tx.id),
            Cell::new(tx.transaction_date.map(|d| d.to_string()).unwrap_or_default()),
            Cell::new(tx.r#type.as_str()),
            Cell::new(format_currency(tx.amount)),
            Cell::new(tx.description.clone().unwrap_or_default()),
            status_cell(&tx.status, style_for(EntityKind::Transaction, &tx.status)),
        ]);
    }
    println!("{}", t);
    Ok(())
}

/// Fetch transactions and apply the local filters (period, regex) that the
/// backend does not understand. Type and status go to the server as query params.
pub fn query_rows(api: &dyn ResourceApi, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let mut params = ListParams::default();
    if let Some(t) = opt_arg(sub, "type") {
        params = params.filter("type", t);
    }
    if let Some(s) = opt_arg(sub, "status") {
        params = params.filter("status", s);
    }
    let period = opt_arg(sub, "period").map(parse_period).transpose()?;
    let pattern = opt_arg(sub, "match")
        .map(|p| Regex::new(p).with_context(|| format!("Invalid regex '{}'", p)))
        .transpose()?;

    let mut data: Vec<Transaction> = fetch(api, Resource::Transactions, params);
    data.retain(|tx| {
        period.is_none_or(|p| p.contains(tx.transaction_date))
            && pattern
                .as_ref()
                .is_none_or(|re| re.is_match(tx.description.as_deref().unwrap_or("")))
    });
    data.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}
