// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use comfy_table::Cell;
use rusqlite::Connection;

use super::json_flags;
use crate::db;
use crate::models::{InventoryItem, InventoryTransaction, MovementType};
use crate::money::{Money, format_currency};
use crate::records::{STOCK_MOVE_PREFIX, generate_number};
use crate::status::{EntityKind, style_for};
use crate::utils::{arg, maybe_print_json, opt_arg, parse_date, parse_decimal, parse_money, pretty_table, status_cell};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("move", sub)) => record_move(conn, sub)?,
        Some(("history", sub)) => history(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut item = InventoryItem {
        id: None,
        sku: arg(sub, "sku")?.trim().to_uppercase(),
        name: arg(sub, "name")?.to_string(),
        category: opt_arg(sub, "category").map(str::to_string),
        current_stock: parse_decimal(arg(sub, "stock")?)?,
        unit_cost: parse_money(arg(sub, "cost")?)?,
        total_value: Money::ZERO,
        reorder_level: opt_arg(sub, "reorder").map(parse_decimal).transpose()?,
        status: "active".to_string(),
    };
    db::insert_item(conn, &mut item).with_context(|| format!("Failed to add item {}", item.sku))?;
    println!(
        "Added {} ({}): {} on hand, valued at {}",
        item.sku,
        item.name,
        item.current_stock,
        format_currency(item.total_value)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let items = db::list_items(conn)?;
    if maybe_print_json(json_flag, jsonl_flag, &items)? {
        return Ok(());
    }
    let mut t = pretty_table(
        &["SKU", "Name", "Category", "Stock", "Reorder At", "Unit Cost", "Value", "Status"],
        vec![],
    );
    for i in &items {
        t.add_row(vec![
            Cell::new(&i.sku),
            Cell::new(&i.name),
            Cell::new(i.category.clone().unwrap_or_default()),
            Cell::new(i.current_stock),
            Cell::new(i.reorder_level.map(|r| r.to_string()).unwrap_or_default()),
            Cell::new(format_currency(i.unit_cost)),
            Cell::new(format_currency(i.total_value)),
            status_cell(&i.status, style_for(EntityKind::InventoryItem, &i.status)),
        ]);
    }
    let total: Money = items.iter().map(|i| i.total_value).sum();
    println!("{}", t);
    println!("Total inventory value: {}", format_currency(total));
    Ok(())
}

fn record_move(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let sku = arg(sub, "sku")?.trim().to_uppercase();
    let kind_raw = arg(sub, "type")?;
    let kind = MovementType::parse(kind_raw)
        .with_context(|| format!("Unknown movement type '{}' (in|out|adjustment)", kind_raw))?;
    let date = match opt_arg(sub, "date") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };
    let reference = opt_arg(sub, "reference")
        .map(str::to_string)
        .unwrap_or_else(|| generate_number(STOCK_MOVE_PREFIX, date, &mut rand::thread_rng()));
    let mut mv = InventoryTransaction {
        id: None,
        item_id: 0,
        r#type: kind,
        quantity: parse_decimal(arg(sub, "qty")?)?,
        unit_cost: opt_arg(sub, "cost").map(parse_money).transpose()?.unwrap_or_default(),
        total_cost: Money::ZERO,
        date,
        reference: Some(reference),
    };
    let item = db::record_movement(conn, &sku, &mut mv)
        .with_context(|| format!("Failed to record {} movement for {}", kind.as_str(), sku))?;
    println!(
        "{} {} x{} @ {}: stock now {} ({})",
        mv.reference.as_deref().unwrap_or_default(),
        kind.as_str(),
        mv.quantity,
        format_currency(mv.unit_cost),
        item.current_stock,
        crate::status::label(&item.status)
    );
    Ok(())
}

fn history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let sku = arg(sub, "sku")?.trim().to_uppercase();
    let moves = db::list_movements(conn, &sku)?;
    if maybe_print_json(json_flag, jsonl_flag, &moves)? {
        return Ok(());
    }
    let rows = moves
        .iter()
        .map(|mv| {
            vec![
                mv.date.to_string(),
                mv.reference.clone().unwrap_or_default(),
                mv.r#type.as_str().to_string(),
                mv.quantity.to_string(),
                format_currency(mv.unit_cost),
                format_currency(mv.total_cost),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Reference", "Type", "Qty", "Unit Cost", "Total Cost"], rows)
    );
    Ok(())
}
