// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local records store (bills, invoices, inventory).
//!
//! Every write goes through the pre-save functions in [`crate::records`] first.
//! Amounts and quantities are stored as decimal TEXT.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::error::{ErpError, ErpResult};
use crate::models::{Bill, InventoryItem, InventoryTransaction, Invoice, MovementType};
use crate::money::Money;
use crate::records;

pub fn open_or_init(path: &Path) -> ErpResult<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut conn = Connection::open(path)?;
    init_schema(&mut conn)?;
    debug!(path = %path.display(), "records store opened");
    Ok(conn)
}

pub fn open_in_memory() -> ErpResult<Connection> {
    let mut conn = Connection::open_in_memory()?;
    init_schema(&mut conn)?;
    Ok(conn)
}

fn init_schema(conn: &mut Connection) -> ErpResult<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS bills(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        number TEXT NOT NULL UNIQUE,
        party TEXT NOT NULL,
        issued_on TEXT NOT NULL,
        due_on TEXT,
        total_amount TEXT NOT NULL,
        paid_amount TEXT NOT NULL DEFAULT '0',
        remaining_amount TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS invoices(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        number TEXT NOT NULL UNIQUE,
        party TEXT NOT NULL,
        issued_on TEXT NOT NULL,
        due_on TEXT,
        total_amount TEXT NOT NULL,
        paid_amount TEXT NOT NULL DEFAULT '0',
        remaining_amount TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS inventory_items(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sku TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        category TEXT,
        current_stock TEXT NOT NULL,
        unit_cost TEXT NOT NULL,
        total_value TEXT NOT NULL,
        reorder_level TEXT,
        status TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS inventory_transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item_id INTEGER NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('in','out','adjustment')),
        quantity TEXT NOT NULL,
        unit_cost TEXT NOT NULL,
        total_cost TEXT NOT NULL,
        date TEXT NOT NULL,
        reference TEXT,
        FOREIGN KEY(item_id) REFERENCES inventory_items(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_inventory_tx_item ON inventory_transactions(item_id);
    "#,
    )?;
    Ok(())
}

fn money_col(row: &Row, idx: usize) -> rusqlite::Result<Money> {
    let s: String = row.get(idx)?;
    Money::from_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn decimal_col(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    Decimal::from_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn opt_decimal_col(row: &Row, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|s| {
        Decimal::from_str(&s).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    })
    .transpose()
}

fn date_col(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn opt_date_col(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let s: Option<String> = row.get(idx)?;
    Ok(s.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
}

/// Bills and invoices share one table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ledger {
    Payables,
    Receivables,
}

impl Ledger {
    fn table(&self) -> &'static str {
        match self {
            Ledger::Payables => "bills",
            Ledger::Receivables => "invoices",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Ledger::Payables => records::BILL_PREFIX,
            Ledger::Receivables => records::INVOICE_PREFIX,
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            Ledger::Payables => "Bill",
            Ledger::Receivables => "Invoice",
        }
    }
}

/// Common row for bills and invoices.
#[derive(Debug, Clone, PartialEq)]
struct DocumentRow {
    id: Option<i64>,
    number: String,
    party: String,
    issued_on: NaiveDate,
    due_on: Option<NaiveDate>,
    total: Money,
    paid: Money,
    remaining: Money,
    status: String,
}

impl From<&Bill> for DocumentRow {
    fn from(b: &Bill) -> Self {
        DocumentRow {
            id: b.id,
            number: b.bill_number.clone(),
            party: b.vendor.clone(),
            issued_on: b.bill_date,
            due_on: b.due_date,
            total: b.total_amount,
            paid: b.paid_amount,
            remaining: b.remaining_amount,
            status: b.status.clone(),
        }
    }
}

impl From<DocumentRow> for Bill {
    fn from(d: DocumentRow) -> Self {
        Bill {
            id: d.id,
            bill_number: d.number,
            vendor: d.party,
            bill_date: d.issued_on,
            due_date: d.due_on,
            total_amount: d.total,
            paid_amount: d.paid,
            remaining_amount: d.remaining,
            status: d.status,
        }
    }
}

impl From<&Invoice> for DocumentRow {
    fn from(i: &Invoice) -> Self {
        DocumentRow {
            id: i.id,
            number: i.invoice_number.clone(),
            party: i.customer.clone(),
            issued_on: i.invoice_date,
            due_on: i.due_date,
            total: i.total_amount,
            paid: i.paid_amount,
            remaining: i.remaining_amount,
            status: i.status.clone(),
        }
    }
}

impl From<DocumentRow> for Invoice {
    fn from(d: DocumentRow) -> Self {
        Invoice {
            id: d.id,
            invoice_number: d.number,
            customer: d.party,
            invoice_date: d.issued_on,
            due_date: d.due_on,
            total_amount: d.total,
            paid_amount: d.paid,
            remaining_amount: d.remaining,
            status: d.status,
        }
    }
}

const DOC_COLUMNS: &str =
    "id, number, party, issued_on, due_on, total_amount, paid_amount, remaining_amount, status";

fn read_document(r: &Row) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        id: Some(r.get(0)?),
        number: r.get(1)?,
        party: r.get(2)?,
        issued_on: date_col(r, 3)?,
        due_on: opt_date_col(r, 4)?,
        total: money_col(r, 5)?,
        paid: money_col(r, 6)?,
        remaining: money_col(r, 7)?,
        status: r.get(8)?,
    })
}

fn validate_document(d: &DocumentRow) -> ErpResult<()> {
    if d.party.trim().is_empty() {
        return Err(ErpError::validation("party", "must not be empty"));
    }
    if d.total.is_negative() {
        return Err(ErpError::validation("totalAmount", "must not be negative"));
    }
    if d.paid.is_negative() {
        return Err(ErpError::validation("paidAmount", "must not be negative"));
    }
    Ok(())
}

fn insert_document(conn: &Connection, ledger: Ledger, d: &mut DocumentRow) -> ErpResult<i64> {
    validate_document(d)?;
    if d.number.trim().is_empty() {
        d.number = records::generate_number(ledger.prefix(), d.issued_on, &mut rand::thread_rng());
    }
    d.remaining = records::compute_remaining_amount(d.total, d.paid);
    d.status = records::settlement_status(&d.status, d.total, d.paid);
    conn.execute(
        &format!(
            "INSERT INTO {}(number, party, issued_on, due_on, total_amount, paid_amount, remaining_amount, status)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            ledger.table()
        ),
        params![
            d.number,
            d.party,
            d.issued_on.to_string(),
            d.due_on.map(|x| x.to_string()),
            d.total.to_string(),
            d.paid.to_string(),
            d.remaining.to_string(),
            d.status
        ],
    )?;
    let id = conn.last_insert_rowid();
    d.id = Some(id);
    debug!(table = ledger.table(), number = %d.number, "document inserted");
    Ok(id)
}

fn get_document(conn: &Connection, ledger: Ledger, number: &str) -> ErpResult<DocumentRow> {
    let sql = format!("SELECT {} FROM {} WHERE number=?1", DOC_COLUMNS, ledger.table());
    conn.query_row(&sql, params![number], read_document)
        .optional()?
        .ok_or_else(|| ErpError::not_found(ledger.noun(), number))
}

fn list_documents(conn: &Connection, ledger: Ledger, status: Option<&str>) -> ErpResult<Vec<DocumentRow>> {
    let mut sql = format!("SELECT {} FROM {}", DOC_COLUMNS, ledger.table());
    if status.is_some() {
        sql.push_str(" WHERE status=?1");
    }
    sql.push_str(" ORDER BY issued_on DESC, id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = match status {
        Some(s) => stmt.query_map(params![s], read_document)?.collect::<Result<Vec<_>, _>>()?,
        None => stmt.query_map([], read_document)?.collect::<Result<Vec<_>, _>>()?,
    };
    Ok(rows)
}

fn record_document_payment(conn: &Connection, ledger: Ledger, number: &str, amount: Money) -> ErpResult<DocumentRow> {
    if !amount.is_positive() {
        return Err(ErpError::validation("amount", "payment must be positive"));
    }
    let mut d = get_document(conn, ledger, number)?;
    d.paid += amount;
    d.remaining = records::compute_remaining_amount(d.total, d.paid);
    d.status = records::settlement_status(&d.status, d.total, d.paid);
    conn.execute(
        &format!(
            "UPDATE {} SET paid_amount=?1, remaining_amount=?2, status=?3 WHERE number=?4",
            ledger.table()
        ),
        params![d.paid.to_string(), d.remaining.to_string(), d.status, d.number],
    )?;
    Ok(d)
}

pub fn insert_bill(conn: &Connection, bill: &mut Bill) -> ErpResult<i64> {
    records::prepare_bill(bill);
    let mut row = DocumentRow::from(&*bill);
    let id = insert_document(conn, Ledger::Payables, &mut row)?;
    *bill = row.into();
    Ok(id)
}

pub fn get_bill(conn: &Connection, number: &str) -> ErpResult<Bill> {
    Ok(get_document(conn, Ledger::Payables, number)?.into())
}

pub fn list_bills(conn: &Connection, status: Option<&str>) -> ErpResult<Vec<Bill>> {
    Ok(list_documents(conn, Ledger::Payables, status)?
        .into_iter()
        .map(Bill::from)
        .collect())
}

pub fn pay_bill(conn: &Connection, number: &str, amount: Money) -> ErpResult<Bill> {
    Ok(record_document_payment(conn, Ledger::Payables, number, amount)?.into())
}

pub fn insert_invoice(conn: &Connection, inv: &mut Invoice) -> ErpResult<i64> {
    records::prepare_invoice(inv);
    let mut row = DocumentRow::from(&*inv);
    let id = insert_document(conn, Ledger::Receivables, &mut row)?;
    *inv = row.into();
    Ok(id)
}

pub fn get_invoice(conn: &Connection, number: &str) -> ErpResult<Invoice> {
    Ok(get_document(conn, Ledger::Receivables, number)?.into())
}

pub fn list_invoices(conn: &Connection, status: Option<&str>) -> ErpResult<Vec<Invoice>> {
    Ok(list_documents(conn, Ledger::Receivables, status)?
        .into_iter()
        .map(Invoice::from)
        .collect())
}

pub fn pay_invoice(conn: &Connection, number: &str, amount: Money) -> ErpResult<Invoice> {
    Ok(record_document_payment(conn, Ledger::Receivables, number, amount)?.into())
}

const ITEM_COLUMNS: &str =
    "id, sku, name, category, current_stock, unit_cost, total_value, reorder_level, status";

fn read_item(r: &Row) -> rusqlite::Result<InventoryItem> {
    Ok(InventoryItem {
        id: Some(r.get(0)?),
        sku: r.get(1)?,
        name: r.get(2)?,
        category: r.get(3)?,
        current_stock: decimal_col(r, 4)?,
        unit_cost: money_col(r, 5)?,
        total_value: money_col(r, 6)?,
        reorder_level: opt_decimal_col(r, 7)?,
        status: r.get(8)?,
    })
}

pub fn insert_item(conn: &Connection, item: &mut InventoryItem) -> ErpResult<i64> {
    if item.sku.trim().is_empty() {
        return Err(ErpError::validation("sku", "must not be empty"));
    }
    if item.current_stock.is_sign_negative() && !item.current_stock.is_zero() {
        return Err(ErpError::validation("currentStock", "must not be negative"));
    }
    records::prepare_item(item);
    conn.execute(
        "INSERT INTO inventory_items(sku, name, category, current_stock, unit_cost, total_value, reorder_level, status)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        params![
            item.sku,
            item.name,
            item.category,
            item.current_stock.to_string(),
            item.unit_cost.to_string(),
            item.total_value.to_string(),
            item.reorder_level.map(|d| d.to_string()),
            item.status
        ],
    )?;
    let id = conn.last_insert_rowid();
    item.id = Some(id);
    Ok(id)
}

pub fn get_item(conn: &Connection, sku: &str) -> ErpResult<InventoryItem> {
    let sql = format!("SELECT {} FROM inventory_items WHERE sku=?1", ITEM_COLUMNS);
    conn.query_row(&sql, params![sku], read_item)
        .optional()?
        .ok_or_else(|| ErpError::not_found("Item", sku))
}

pub fn list_items(conn: &Connection) -> ErpResult<Vec<InventoryItem>> {
    let sql = format!("SELECT {} FROM inventory_items ORDER BY sku", ITEM_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], read_item)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn update_item(conn: &Connection, item: &mut InventoryItem) -> ErpResult<()> {
    records::prepare_item(item);
    conn.execute(
        "UPDATE inventory_items SET current_stock=?1, unit_cost=?2, total_value=?3, status=?4 WHERE id=?5",
        params![
            item.current_stock.to_string(),
            item.unit_cost.to_string(),
            item.total_value.to_string(),
            item.status,
            item.id
        ],
    )?;
    Ok(())
}

/// Apply a stock movement and store it, atomically. Returns the updated item.
pub fn record_movement(conn: &mut Connection, sku: &str, mv: &mut InventoryTransaction) -> ErpResult<InventoryItem> {
    if mv.r#type != MovementType::Adjustment && mv.quantity <= Decimal::ZERO {
        return Err(ErpError::validation("quantity", "must be positive"));
    }
    let tx = conn.transaction()?;
    let mut item = get_item(&tx, sku)?;
    let item_id = item
        .id
        .ok_or_else(|| ErpError::not_found("Item", sku))?;
    let new_stock = item.current_stock + records::stock_delta(mv);
    if new_stock < Decimal::ZERO {
        return Err(ErpError::validation(
            "quantity",
            format!("only {} of {} in stock", item.current_stock, sku),
        ));
    }
    item.current_stock = new_stock;
    if mv.r#type == MovementType::In && mv.unit_cost.is_positive() {
        item.unit_cost = mv.unit_cost;
    }
    if mv.unit_cost.is_zero() {
        mv.unit_cost = item.unit_cost;
    }
    update_item(&tx, &mut item)?;

    mv.item_id = item_id;
    records::prepare_movement(mv);
    tx.execute(
        "INSERT INTO inventory_transactions(item_id, type, quantity, unit_cost, total_cost, date, reference)
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            item_id,
            mv.r#type.as_str(),
            mv.quantity.to_string(),
            mv.unit_cost.to_string(),
            mv.total_cost.to_string(),
            mv.date.to_string(),
            mv.reference
        ],
    )?;
    mv.id = Some(tx.last_insert_rowid());
    tx.commit()?;
    Ok(item)
}

pub fn list_movements(conn: &Connection, sku: &str) -> ErpResult<Vec<InventoryTransaction>> {
    let item = get_item(conn, sku)?;
    let mut stmt = conn.prepare(
        "SELECT id, item_id, type, quantity, unit_cost, total_cost, date, reference
         FROM inventory_transactions WHERE item_id=?1 ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![item.id], |r| {
        let kind: String = r.get(2)?;
        Ok(InventoryTransaction {
            id: Some(r.get(0)?),
            item_id: r.get(1)?,
            r#type: MovementType::parse(&kind).unwrap_or(MovementType::Adjustment),
            quantity: decimal_col(r, 3)?,
            unit_cost: money_col(r, 4)?,
            total_cost: money_col(r, 5)?,
            date: date_col(r, 6)?,
            reference: r.get(7)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
