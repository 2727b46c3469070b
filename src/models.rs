// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::money::Money;

/// Server ids arrive as integers or strings depending on the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(v: i64) -> Self {
        RecordId(v.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }
        Ok(match Raw::deserialize(d)? {
            Raw::Int(v) => RecordId(v.to_string()),
            Raw::Text(s) => RecordId(s),
        })
    }
}

/// Accepts `2025-03-10` as well as full RFC 3339 timestamps.
pub fn parse_flexible_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    s.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

fn de_opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.as_deref().and_then(parse_flexible_date))
}

/// Text columns the API may send as `null`.
fn de_null_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.unwrap_or_default())
}

fn de_opt_decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
    let m: Option<Money> = Option::deserialize(d)?;
    Ok(m.map(|m| m.amount()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Bank,
    Cash,
    Receivable,
    Payable,
    #[serde(other)]
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Bank => "bank",
            AccountType::Cash => "cash",
            AccountType::Receivable => "receivable",
            AccountType::Payable => "payable",
            AccountType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: RecordId,
    #[serde(default, alias = "accountName", deserialize_with = "de_null_string")]
    pub name: String,
    pub r#type: AccountType,
    #[serde(default)]
    pub current_balance: Money,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de_null_string")]
    pub status: String,
    #[serde(default)]
    pub is_reconciled: bool,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub last_reconciled_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
    Adjustment,
    #[serde(other)]
    Other,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Transfer => "transfer",
            TransactionType::Adjustment => "adjustment",
            TransactionType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<TransactionType> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            "transfer" => Some(TransactionType::Transfer),
            "adjustment" => Some(TransactionType::Adjustment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: RecordId,
    pub r#type: TransactionType,
    #[serde(default)]
    pub amount: Money,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub transaction_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_null_string")]
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub account_id: Option<RecordId>,
    #[serde(default)]
    pub vendor_id: Option<RecordId>,
    #[serde(default)]
    pub customer_id: Option<RecordId>,
}

/// Vendors and customers share the same shape on the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_null_string")]
    pub name: String,
    #[serde(default)]
    pub current_balance: Money,
    #[serde(default, deserialize_with = "de_null_string")]
    pub status: String,
    #[serde(default)]
    pub payment_terms: Option<String>,
}

pub type Vendor = Party;
pub type Customer = Party;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetType {
    Income,
    Expense,
    Capital,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_null_string")]
    pub name: String,
    pub r#type: BudgetType,
    #[serde(default)]
    pub allocated_amount: Money,
    #[serde(default)]
    pub spent_amount: Money,
    #[serde(default)]
    pub remaining_amount: Money,
    #[serde(default, deserialize_with = "de_null_string")]
    pub status: String,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxPeriod {
    Monthly,
    Quarterly,
    Yearly,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRecord {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_null_string")]
    pub r#type: String,
    pub period: TaxPeriod,
    pub year: i32,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub quarter: Option<u32>,
    #[serde(default)]
    pub tax_amount: Money,
    #[serde(default, deserialize_with = "de_null_string")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_null_string")]
    pub category: String,
    #[serde(default)]
    pub amount: Money,
    #[serde(default, deserialize_with = "de_null_string")]
    pub status: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub expense_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    View,
    Login,
    Logout,
    #[serde(other)]
    Other,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::View => "view",
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
            AuditAction::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub action: AuditAction,
    pub entity: String,
    #[serde(default)]
    pub entity_id: Option<RecordId>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Bills (payables) and invoices (receivables) carry the same money columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(default)]
    pub id: Option<i64>,
    pub bill_number: String,
    pub vendor: String,
    pub bill_date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub total_amount: Money,
    #[serde(default)]
    pub paid_amount: Money,
    #[serde(default)]
    pub remaining_amount: Money,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub id: Option<i64>,
    pub invoice_number: String,
    pub customer: String,
    pub invoice_date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub total_amount: Money,
    #[serde(default)]
    pub paid_amount: Money,
    #[serde(default)]
    pub remaining_amount: Money,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub current_stock: Decimal,
    pub unit_cost: Money,
    #[serde(default)]
    pub total_value: Money,
    #[serde(default, deserialize_with = "de_opt_decimal")]
    pub reorder_level: Option<Decimal>,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    In,
    Out,
    Adjustment,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "in",
            MovementType::Out => "out",
            MovementType::Adjustment => "adjustment",
        }
    }

    pub fn parse(s: &str) -> Option<MovementType> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Some(MovementType::In),
            "out" => Some(MovementType::Out),
            "adjustment" | "adjust" => Some(MovementType::Adjustment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransaction {
    #[serde(default)]
    pub id: Option<i64>,
    pub item_id: i64,
    pub r#type: MovementType,
    /// Signed for adjustments, positive for in/out.
    pub quantity: Decimal,
    pub unit_cost: Money,
    #[serde(default)]
    pub total_cost: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub reference: Option<String>,
}
