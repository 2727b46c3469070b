// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Status and priority styling.
//!
//! One static table per entity kind maps the server's status strings to a display
//! tone and icon. Lookups are case-insensitive and anything unknown falls back to
//! [`NEUTRAL`].

use serde::Serialize;

pub const COMPLETED: &str = "completed";
pub const PENDING: &str = "pending";
pub const ACTIVE: &str = "active";
pub const APPROVED: &str = "approved";
pub const SUBMITTED: &str = "submitted";
pub const PAID: &str = "paid";
pub const PARTIALLY_PAID: &str = "partially_paid";
pub const DRAFT: &str = "draft";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Blue,
    Yellow,
    Orange,
    Red,
    Purple,
    Gray,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Green => "green",
            Tone::Blue => "blue",
            Tone::Yellow => "yellow",
            Tone::Orange => "orange",
            Tone::Red => "red",
            Tone::Purple => "purple",
            Tone::Gray => "gray",
        }
    }

    /// Terminal foreground color used by table output.
    pub fn term_color(&self) -> comfy_table::Color {
        match self {
            Tone::Green => comfy_table::Color::Green,
            Tone::Blue => comfy_table::Color::Blue,
            Tone::Yellow => comfy_table::Color::Yellow,
            Tone::Orange => comfy_table::Color::DarkYellow,
            Tone::Red => comfy_table::Color::Red,
            Tone::Purple => comfy_table::Color::Magenta,
            Tone::Gray => comfy_table::Color::Grey,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusStyle {
    pub tone: Tone,
    pub icon: &'static str,
}

const fn style(tone: Tone, icon: &'static str) -> StatusStyle {
    StatusStyle { tone, icon }
}

pub const NEUTRAL: StatusStyle = style(Tone::Gray, "circle");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Account,
    Transaction,
    Expense,
    Budget,
    TaxRecord,
    Bill,
    Invoice,
    Party,
    InventoryItem,
    AuditAction,
    Priority,
}

type Table = &'static [(&'static str, StatusStyle)];

const ACCOUNT: Table = &[
    ("active", style(Tone::Green, "check-circle")),
    ("inactive", style(Tone::Yellow, "pause-circle")),
    ("frozen", style(Tone::Blue, "snowflake")),
    ("closed", style(Tone::Red, "x-circle")),
];

const TRANSACTION: Table = &[
    ("completed", style(Tone::Green, "check-circle")),
    ("pending", style(Tone::Yellow, "clock")),
    ("processing", style(Tone::Blue, "refresh")),
    ("failed", style(Tone::Red, "alert-triangle")),
    ("cancelled", style(Tone::Red, "x-circle")),
    ("reversed", style(Tone::Purple, "rotate-ccw")),
];

const EXPENSE: Table = &[
    ("draft", style(Tone::Gray, "edit")),
    ("submitted", style(Tone::Blue, "send")),
    ("approved", style(Tone::Green, "check-circle")),
    ("rejected", style(Tone::Red, "x-circle")),
    ("paid", style(Tone::Purple, "credit-card")),
    ("cancelled", style(Tone::Orange, "slash")),
];

const BUDGET: Table = &[
    ("draft", style(Tone::Gray, "edit")),
    ("active", style(Tone::Green, "activity")),
    ("approved", style(Tone::Blue, "check-circle")),
    ("exceeded", style(Tone::Red, "alert-triangle")),
    ("closed", style(Tone::Purple, "lock")),
];

const TAX_RECORD: Table = &[
    ("pending", style(Tone::Yellow, "clock")),
    ("filed", style(Tone::Blue, "file-text")),
    ("paid", style(Tone::Green, "check-circle")),
    ("overdue", style(Tone::Red, "alert-triangle")),
    ("cancelled", style(Tone::Orange, "x-circle")),
];

const DOCUMENT: Table = &[
    ("draft", style(Tone::Gray, "edit")),
    ("pending", style(Tone::Yellow, "clock")),
    ("sent", style(Tone::Blue, "send")),
    ("partially_paid", style(Tone::Orange, "pie-chart")),
    ("paid", style(Tone::Green, "check-circle")),
    ("overdue", style(Tone::Red, "alert-triangle")),
    ("cancelled", style(Tone::Purple, "x-circle")),
];

const PARTY: Table = &[
    ("active", style(Tone::Green, "check-circle")),
    ("inactive", style(Tone::Yellow, "pause-circle")),
    ("suspended", style(Tone::Red, "slash")),
];

const INVENTORY_ITEM: Table = &[
    ("active", style(Tone::Green, "package")),
    ("low_stock", style(Tone::Orange, "alert-circle")),
    ("out_of_stock", style(Tone::Red, "alert-triangle")),
    ("discontinued", style(Tone::Gray, "archive")),
];

const AUDIT_ACTION: Table = &[
    ("create", style(Tone::Green, "plus")),
    ("update", style(Tone::Blue, "edit")),
    ("delete", style(Tone::Red, "trash")),
    ("view", style(Tone::Gray, "eye")),
    ("login", style(Tone::Purple, "log-in")),
    ("logout", style(Tone::Orange, "log-out")),
];

const PRIORITY: Table = &[
    ("low", style(Tone::Gray, "arrow-down")),
    ("medium", style(Tone::Blue, "minus")),
    ("high", style(Tone::Orange, "arrow-up")),
    ("urgent", style(Tone::Red, "alert-octagon")),
];

fn table(kind: EntityKind) -> Table {
    match kind {
        EntityKind::Account => ACCOUNT,
        EntityKind::Transaction => TRANSACTION,
        EntityKind::Expense => EXPENSE,
        EntityKind::Budget => BUDGET,
        EntityKind::TaxRecord => TAX_RECORD,
        EntityKind::Bill | EntityKind::Invoice => DOCUMENT,
        EntityKind::Party => PARTY,
        EntityKind::InventoryItem => INVENTORY_ITEM,
        EntityKind::AuditAction => AUDIT_ACTION,
        EntityKind::Priority => PRIORITY,
    }
}

pub fn style_for(kind: EntityKind, status: &str) -> StatusStyle {
    let key = status.trim();
    table(kind)
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, s)| *s)
        .unwrap_or(NEUTRAL)
}

/// Every status string the table for `kind` knows about.
pub fn known_statuses(kind: EntityKind) -> impl Iterator<Item = &'static str> {
    table(kind).iter().map(|(name, _)| *name)
}

/// Human label: `partially_paid` becomes `Partially Paid`.
pub fn label(status: &str) -> String {
    status
        .split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut cs = w.chars();
            match cs.next() {
                Some(f) => f.to_uppercase().chain(cs.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
