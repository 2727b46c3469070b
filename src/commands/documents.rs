// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! `bill` and `invoice` subcommands over the local store.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Color};
use rusqlite::Connection;
use serde::Serialize;

use super::json_flags;
use crate::db;
use crate::models::{Bill, Invoice};
use crate::money::{Money, format_currency};
use crate::records::is_past_due;
use crate::status::{EntityKind, style_for};
use crate::utils::{arg, maybe_print_json, opt_arg, parse_date, parse_money, pretty_table, status_cell};

/// Common view over bills and invoices for listing.
struct DocView<'a> {
    number: &'a str,
    party: &'a str,
    issued: NaiveDate,
    due: Option<NaiveDate>,
    total: Money,
    paid: Money,
    remaining: Money,
    status: &'a str,
}

impl<'a> From<&'a Bill> for DocView<'a> {
    fn from(b: &'a Bill) -> Self {
        DocView {
            number: &b.bill_number,
            party: &b.vendor,
            issued: b.bill_date,
            due: b.due_date,
            total: b.total_amount,
            paid: b.paid_amount,
            remaining: b.remaining_amount,
            status: &b.status,
        }
    }
}

impl<'a> From<&'a Invoice> for DocView<'a> {
    fn from(i: &'a Invoice) -> Self {
        DocView {
            number: &i.invoice_number,
            party: &i.customer,
            issued: i.invoice_date,
            due: i.due_date,
            total: i.total_amount,
            paid: i.paid_amount,
            remaining: i.remaining_amount,
            status: &i.status,
        }
    }
}

struct NewDoc {
    number: String,
    party: String,
    issued: NaiveDate,
    due: Option<NaiveDate>,
    total: Money,
    status: String,
}

fn parse_new(sub: &clap::ArgMatches, party_arg: &str) -> Result<NewDoc> {
    let issued = match opt_arg(sub, "date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    Ok(NewDoc {
        number: opt_arg(sub, "number").unwrap_or_default().to_string(),
        party: arg(sub, party_arg)?.to_string(),
        issued,
        due: opt_arg(sub, "due").map(parse_date).transpose()?,
        total: parse_money(arg(sub, "total")?)?,
        status: arg(sub, "status")?.to_string(),
    })
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn handle_bills(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let d = parse_new(sub, "vendor")?;
            let mut bill = Bill {
                id: None,
                bill_number: d.number,
                vendor: d.party,
                bill_date: d.issued,
                due_date: d.due,
                total_amount: d.total,
                paid_amount: Money::ZERO,
                remaining_amount: Money::ZERO,
                status: d.status,
            };
            db::insert_bill(conn, &mut bill).context("Failed to record bill")?;
            println!(
                "Recorded bill {} from {} for {}",
                bill.bill_number,
                bill.vendor,
                format_currency(bill.total_amount)
            );
        }
        Some(("list", sub)) => {
            let bills = db::list_bills(conn, opt_arg(sub, "status"))?;
            print_list(sub, EntityKind::Bill, &bills)?;
        }
        Some(("pay", sub)) => {
            let number = arg(sub, "number")?;
            let amount = parse_money(arg(sub, "amount")?)?;
            let bill = db::pay_bill(conn, number, amount)
                .with_context(|| format!("Failed to pay bill {}", number))?;
            print_payment(&DocView::from(&bill), amount);
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_invoices(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let d = parse_new(sub, "customer")?;
            let mut inv = Invoice {
                id: None,
                invoice_number: d.number,
                customer: d.party,
                invoice_date: d.issued,
                due_date: d.due,
                total_amount: d.total,
                paid_amount: Money::ZERO,
                remaining_amount: Money::ZERO,
                status: d.status,
            };
            db::insert_invoice(conn, &mut inv).context("Failed to record invoice")?;
            println!(
                "Recorded invoice {} to {} for {}",
                inv.invoice_number,
                inv.customer,
                format_currency(inv.total_amount)
            );
        }
        Some(("list", sub)) => {
            let invoices = db::list_invoices(conn, opt_arg(sub, "status"))?;
            print_list(sub, EntityKind::Invoice, &invoices)?;
        }
        Some(("pay", sub)) => {
            let number = arg(sub, "number")?;
            let amount = parse_money(arg(sub, "amount")?)?;
            let inv = db::pay_invoice(conn, number, amount)
                .with_context(|| format!("Failed to record payment on invoice {}", number))?;
            print_payment(&DocView::from(&inv), amount);
        }
        _ => {}
    }
    Ok(())
}

fn print_payment(d: &DocView, amount: Money) {
    println!(
        "Applied {} to {}: {} remaining ({})",
        format_currency(amount),
        d.number,
        format_currency(d.remaining),
        crate::status::label(d.status)
    );
}

fn print_list<T>(sub: &clap::ArgMatches, kind: EntityKind, docs: &[T]) -> Result<()>
where
    T: Serialize,
    for<'a> DocView<'a>: From<&'a T>,
{
    let (json_flag, jsonl_flag) = json_flags(sub);
    let today = today();
    let docs: Vec<&T> = docs
        .iter()
        .filter(|d| {
            let v = DocView::from(*d);
            !sub.get_flag("overdue") || is_past_due(v.due, today, v.remaining)
        })
        .collect();
    if maybe_print_json(json_flag, jsonl_flag, &docs)? {
        return Ok(());
    }
    let mut t = pretty_table(
        &["Number", "Party", "Issued", "Due", "Total", "Paid", "Remaining", "Status"],
        vec![],
    );
    for d in docs {
        let v = DocView::from(d);
        let due = Cell::new(v.due.map(|x| x.to_string()).unwrap_or_default());
        t.add_row(vec![
            Cell::new(v.number),
            Cell::new(v.party),
            Cell::new(v.issued),
            if is_past_due(v.due, today, v.remaining) { due.fg(Color::Red) } else { due },
            Cell::new(format_currency(v.total)),
            Cell::new(format_currency(v.paid)),
            Cell::new(format_currency(v.remaining)),
            status_cell(v.status, style_for(kind, v.status)),
        ]);
    }
    println!("{}", t);
    Ok(())
}
