// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use super::fetch;
use crate::api::{ListParams, Resource, ResourceApi};
use crate::db;
use crate::models::Budget;
use crate::money::Money;
use crate::records::{compute_remaining_amount, compute_total_value, is_valid_number};
use crate::stats::budget_remaining;
use crate::utils::pretty_table;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub issue: &'static str,
    pub detail: String,
}

fn finding(issue: &'static str, detail: String) -> Finding {
    Finding { issue, detail }
}

pub fn budget_findings(budgets: &[Budget]) -> Vec<Finding> {
    budgets
        .iter()
        .filter(|b| b.remaining_amount != budget_remaining(b))
        .map(|b| {
            finding(
                "budget_remaining_mismatch",
                format!(
                    "{} ({}): stored {}, expected {}",
                    b.name,
                    b.id,
                    b.remaining_amount,
                    budget_remaining(b)
                ),
            )
        })
        .collect()
}

fn document_findings(
    out: &mut Vec<Finding>,
    number: &str,
    total: Money,
    paid: Money,
    remaining: Money,
) {
    let expected = compute_remaining_amount(total, paid);
    if remaining != expected {
        out.push(finding(
            "document_remaining_mismatch",
            format!("{}: stored {}, expected {}", number, remaining, expected),
        ));
    }
    if !is_valid_number(number) {
        out.push(finding("document_number_format", number.to_string()));
    }
}

/// Invariants of the local store: remaining amounts, document numbers and
/// inventory valuation.
pub fn local_findings(conn: &Connection) -> Result<Vec<Finding>> {
    let mut out = Vec::new();
    for b in db::list_bills(conn, None)? {
        document_findings(&mut out, &b.bill_number, b.total_amount, b.paid_amount, b.remaining_amount);
    }
    for i in db::list_invoices(conn, None)? {
        document_findings(&mut out, &i.invoice_number, i.total_amount, i.paid_amount, i.remaining_amount);
    }
    for item in db::list_items(conn)? {
        let expected = compute_total_value(&item);
        if item.total_value != expected {
            out.push(finding(
                "inventory_value_mismatch",
                format!("{}: stored {}, expected {}", item.sku, item.total_value, expected),
            ));
        }
        if item.current_stock.is_sign_negative() && !item.current_stock.is_zero() {
            out.push(finding(
                "inventory_negative_stock",
                format!("{}: {}", item.sku, item.current_stock),
            ));
        }
    }
    Ok(out)
}

pub fn handle(api: &dyn ResourceApi, conn: &Connection) -> Result<()> {
    let budgets: Vec<Budget> = fetch(api, Resource::Budgets, ListParams::default());
    let mut findings = budget_findings(&budgets);
    findings.extend(local_findings(conn)?);

    if findings.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = findings
            .into_iter()
            .map(|f| vec![f.issue.to_string(), f.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
