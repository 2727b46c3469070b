// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pre-save computations for bills, invoices and inventory.
//!
//! The repository in [`crate::db`] calls these explicitly before every insert and
//! update; nothing runs implicitly.

use chrono::NaiveDate;
use rand::Rng;
use regex::Regex;
use once_cell::sync::Lazy;

use crate::models::{Bill, InventoryItem, InventoryTransaction, Invoice, MovementType};
use crate::money::Money;
use crate::status;

pub const BILL_PREFIX: &str = "BILL";
pub const INVOICE_PREFIX: &str = "INV";
pub const STOCK_MOVE_PREFIX: &str = "STK";

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,5}-\d{6}-\d{4}$").expect("static regex"));

/// `PREFIX-YYYYMM-NNNN` with four random digits.
pub fn generate_number<R: Rng + ?Sized>(prefix: &str, date: NaiveDate, rng: &mut R) -> String {
    let n: u32 = rng.gen_range(0..10_000);
    format!("{}-{}-{:04}", prefix, date.format("%Y%m"), n)
}

pub fn is_valid_number(s: &str) -> bool {
    NUMBER_RE.is_match(s)
}

pub fn compute_remaining_amount(total: Money, paid: Money) -> Money {
    total - paid
}

/// Status implied by the paid amount. Drafts and cancellations are left alone.
pub fn settlement_status(current: &str, total: Money, paid: Money) -> String {
    if current.eq_ignore_ascii_case(status::DRAFT) || current.eq_ignore_ascii_case("cancelled") {
        return current.to_string();
    }
    let remaining = compute_remaining_amount(total, paid);
    if !remaining.is_positive() && total.is_positive() {
        status::PAID.to_string()
    } else if paid.is_positive() {
        status::PARTIALLY_PAID.to_string()
    } else {
        current.to_string()
    }
}

pub fn prepare_bill(bill: &mut Bill) {
    bill.remaining_amount = compute_remaining_amount(bill.total_amount, bill.paid_amount);
    bill.status = settlement_status(&bill.status, bill.total_amount, bill.paid_amount);
}

pub fn prepare_invoice(inv: &mut Invoice) {
    inv.remaining_amount = compute_remaining_amount(inv.total_amount, inv.paid_amount);
    inv.status = settlement_status(&inv.status, inv.total_amount, inv.paid_amount);
}

/// Real due-date check, used for locally stored bills and invoices only.
pub fn is_past_due(due_date: Option<NaiveDate>, today: NaiveDate, remaining: Money) -> bool {
    remaining.is_positive() && due_date.is_some_and(|d| d < today)
}

pub fn compute_total_value(item: &InventoryItem) -> Money {
    item.unit_cost * item.current_stock
}

/// Recomputes total value and derives the stock status from the reorder level.
pub fn prepare_item(item: &mut InventoryItem) {
    item.total_value = compute_total_value(item);
    if item.status == "discontinued" {
        return;
    }
    item.status = if item.current_stock <= rust_decimal::Decimal::ZERO {
        "out_of_stock"
    } else if item.reorder_level.is_some_and(|lvl| item.current_stock <= lvl) {
        "low_stock"
    } else {
        "active"
    }
    .to_string();
}

pub fn compute_total_cost(tx: &InventoryTransaction) -> Money {
    tx.unit_cost * tx.quantity.abs()
}

pub fn prepare_movement(tx: &mut InventoryTransaction) {
    tx.total_cost = compute_total_cost(tx);
}

/// Signed change to stock for a movement.
pub fn stock_delta(tx: &InventoryTransaction) -> rust_decimal::Decimal {
    match tx.r#type {
        MovementType::In => tx.quantity.abs(),
        MovementType::Out => -tx.quantity.abs(),
        MovementType::Adjustment => tx.quantity,
    }
}
