// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard statistics.
//!
//! Everything here is a pure function over already-fetched collections. An empty
//! slice (which is what a failed fetch leaves behind) always produces zeros.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::health::{self, Health};
use crate::models::{Account, AccountType, Budget, Expense, Party, TaxRecord, Transaction, TransactionType};
use crate::money::{Money, clamp_percent, format_currency, format_percent, percentage};
use crate::status::{self, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub year: i32,
    pub month: Option<u32>,
}

impl Period {
    pub fn year(year: i32) -> Self {
        Period { year, month: None }
    }

    pub fn month(year: i32, month: u32) -> Self {
        Period {
            year,
            month: Some(month),
        }
    }

    /// Undated records never fall inside a period.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        match date {
            Some(d) => d.year() == self.year && self.month.is_none_or(|m| d.month() == m),
            None => false,
        }
    }

    /// The period just before this one, used for trends.
    pub fn previous(&self) -> Period {
        match self.month {
            Some(1) => Period::month(self.year - 1, 12),
            Some(m) => Period::month(self.year, m - 1),
            None => Period::year(self.year - 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn between(current: Money, previous: Money) -> Trend {
        match current.cmp(&previous) {
            std::cmp::Ordering::Greater => Trend::Up,
            std::cmp::Ordering::Less => Trend::Down,
            std::cmp::Ordering::Equal => Trend::Flat,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Flat => "■",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum StatValue {
    Amount(Money),
    Count(usize),
    Percent(Decimal),
}

impl StatValue {
    pub fn display(&self) -> String {
        match self {
            StatValue::Amount(m) => format_currency(*m),
            StatValue::Count(n) => n.to_string(),
            StatValue::Percent(p) => format_percent(*p),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub title: String,
    pub value: StatValue,
    pub subtitle: String,
    pub tone: Tone,
    pub icon: &'static str,
    pub trend: Option<Trend>,
}

impl StatCard {
    fn new(title: &str, value: StatValue, subtitle: impl Into<String>, tone: Tone, icon: &'static str) -> Self {
        StatCard {
            title: title.to_string(),
            value,
            subtitle: subtitle.into(),
            tone,
            icon,
            trend: None,
        }
    }

    fn with_trend(mut self, trend: Option<Trend>) -> Self {
        self.trend = trend;
        self
    }
}

fn is_completed(status: &str) -> bool {
    status.eq_ignore_ascii_case(status::COMPLETED)
}

fn in_scope(t: &Transaction, period: Option<Period>) -> bool {
    period.is_none_or(|p| p.contains(t.transaction_date))
}

fn sum_completed(txs: &[Transaction], kind: TransactionType, period: Option<Period>) -> Money {
    txs.iter()
        .filter(|t| t.r#type == kind && is_completed(&t.status) && in_scope(t, period))
        .map(|t| t.amount)
        .sum()
}

/// Σ amount over completed income transactions.
pub fn total_revenue(txs: &[Transaction]) -> Money {
    sum_completed(txs, TransactionType::Income, None)
}

/// Σ amount over completed expense transactions.
pub fn total_expenses(txs: &[Transaction]) -> Money {
    sum_completed(txs, TransactionType::Expense, None)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub revenue: Money,
    pub expenses: Money,
    pub net_income: Money,
    pub profit_margin: Decimal,
    pub transaction_count: usize,
}

pub fn revenue_summary(txs: &[Transaction], period: Option<Period>) -> RevenueSummary {
    let revenue = sum_completed(txs, TransactionType::Income, period);
    let expenses = sum_completed(txs, TransactionType::Expense, period);
    let net_income = revenue - expenses;
    RevenueSummary {
        revenue,
        expenses,
        net_income,
        profit_margin: net_income.percent_of(revenue),
        transaction_count: txs.iter().filter(|t| in_scope(t, period)).count(),
    }
}

pub fn revenue_cards(txs: &[Transaction], period: Option<Period>) -> Vec<StatCard> {
    let cur = revenue_summary(txs, period);
    let prev = period.map(|p| revenue_summary(txs, Some(p.previous())));
    let net_tone = if cur.net_income.is_negative() {
        Tone::Red
    } else {
        Tone::Green
    };
    vec![
        StatCard::new(
            "Total Revenue",
            StatValue::Amount(cur.revenue),
            "Completed income",
            Tone::Green,
            "trending-up",
        )
        .with_trend(prev.map(|p| Trend::between(cur.revenue, p.revenue))),
        StatCard::new(
            "Total Expenses",
            StatValue::Amount(cur.expenses),
            "Completed expenses",
            Tone::Red,
            "trending-down",
        )
        .with_trend(prev.map(|p| Trend::between(cur.expenses, p.expenses))),
        StatCard::new(
            "Net Income",
            StatValue::Amount(cur.net_income),
            "Revenue minus expenses",
            net_tone,
            "dollar-sign",
        )
        .with_trend(prev.map(|p| Trend::between(cur.net_income, p.net_income))),
        StatCard::new(
            "Profit Margin",
            StatValue::Percent(cur.profit_margin),
            format!("{} transactions", cur.transaction_count),
            Tone::Blue,
            "percent",
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CashFlowMonth {
    pub month: u32,
    pub inflow: Money,
    pub outflow: Money,
    pub net: Money,
}

/// Twelve rows, January first. Transfers and adjustments move money between
/// accounts and are left out.
pub fn monthly_cash_flow(txs: &[Transaction], year: i32) -> Vec<CashFlowMonth> {
    let mut map: BTreeMap<u32, (Money, Money)> = (1..=12).map(|m| (m, (Money::ZERO, Money::ZERO))).collect();
    for t in txs.iter().filter(|t| is_completed(&t.status)) {
        let Some(d) = t.transaction_date.filter(|d| d.year() == year) else {
            continue;
        };
        let entry = map.entry(d.month()).or_insert((Money::ZERO, Money::ZERO));
        match t.r#type {
            TransactionType::Income => entry.0 += t.amount,
            TransactionType::Expense => entry.1 += t.amount,
            _ => {}
        }
    }
    map.into_iter()
        .map(|(month, (inflow, outflow))| CashFlowMonth {
            month,
            inflow,
            outflow,
            net: inflow - outflow,
        })
        .collect()
}

pub fn cash_flow_cards(txs: &[Transaction], year: i32) -> Vec<StatCard> {
    let months = monthly_cash_flow(txs, year);
    let inflow: Money = months.iter().map(|m| m.inflow).sum();
    let outflow: Money = months.iter().map(|m| m.outflow).sum();
    let net = inflow - outflow;
    let positive_months = months.iter().filter(|m| m.net.is_positive()).count();
    vec![
        StatCard::new("Cash Inflow", StatValue::Amount(inflow), format!("Year {}", year), Tone::Green, "arrow-down-left"),
        StatCard::new("Cash Outflow", StatValue::Amount(outflow), format!("Year {}", year), Tone::Red, "arrow-up-right"),
        StatCard::new(
            "Net Cash Flow",
            StatValue::Amount(net),
            "Inflow minus outflow",
            if net.is_negative() { Tone::Red } else { Tone::Blue },
            "activity",
        ),
        StatCard::new(
            "Positive Months",
            StatValue::Count(positive_months),
            "Months with net inflow",
            Tone::Purple,
            "calendar",
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartySummary {
    pub total_outstanding: Money,
    /// Parties with a positive balance. The dashboards label these "overdue"
    /// without looking at any due date.
    pub outstanding_count: usize,
    pub active_count: usize,
    pub total_count: usize,
    pub average_balance: Money,
}

pub fn is_outstanding(p: &Party) -> bool {
    p.current_balance.is_positive()
}

pub fn party_summary(parties: &[Party]) -> PartySummary {
    let total_outstanding: Money = parties.iter().map(|p| p.current_balance).sum();
    let total_count = parties.len();
    let average_balance = if total_count == 0 {
        Money::ZERO
    } else {
        Money::new(total_outstanding.amount() / Decimal::from(total_count))
    };
    PartySummary {
        total_outstanding,
        outstanding_count: parties.iter().filter(|p| is_outstanding(p)).count(),
        active_count: parties
            .iter()
            .filter(|p| p.status.eq_ignore_ascii_case(status::ACTIVE))
            .count(),
        total_count,
        average_balance,
    }
}

fn party_cards(parties: &[Party], noun: &str, owed: &str) -> Vec<StatCard> {
    let s = party_summary(parties);
    vec![
        StatCard::new(
            &format!("Total {}", owed),
            StatValue::Amount(s.total_outstanding),
            format!("Across {} {}s", s.total_count, noun),
            Tone::Blue,
            "dollar-sign",
        ),
        StatCard::new(
            "Overdue",
            StatValue::Count(s.outstanding_count),
            format!("{}s with an outstanding balance", noun),
            if s.outstanding_count > 0 { Tone::Red } else { Tone::Green },
            "alert-triangle",
        ),
        StatCard::new(
            &format!("Active {}s", noun),
            StatValue::Count(s.active_count),
            format!("of {}", s.total_count),
            Tone::Green,
            "users",
        ),
        StatCard::new(
            "Average Balance",
            StatValue::Amount(s.average_balance),
            format!("Per {}", noun.to_lowercase()),
            Tone::Purple,
            "bar-chart",
        ),
    ]
}

pub fn payables_cards(vendors: &[Party]) -> Vec<StatCard> {
    party_cards(vendors, "Vendor", "Payables")
}

pub fn receivables_cards(customers: &[Party]) -> Vec<StatCard> {
    party_cards(customers, "Customer", "Receivables")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashPosition {
    pub total_balance: Money,
    pub by_type: Vec<(AccountType, Money)>,
    pub account_count: usize,
    pub reconciled_count: usize,
    pub reconciled_percent: Decimal,
}

/// Balances of active accounts. Reconciliation counts cover every account.
pub fn cash_position(accounts: &[Account]) -> CashPosition {
    let active = || {
        accounts
            .iter()
            .filter(|a| a.status.is_empty() || a.status.eq_ignore_ascii_case(status::ACTIVE))
    };
    let by_type = [
        AccountType::Bank,
        AccountType::Cash,
        AccountType::Receivable,
        AccountType::Payable,
    ]
    .into_iter()
    .map(|ty| {
        let total: Money = active().filter(|a| a.r#type == ty).map(|a| a.current_balance).sum();
        (ty, total)
    })
    .collect();
    let reconciled_count = accounts.iter().filter(|a| a.is_reconciled).count();
    CashPosition {
        total_balance: active().map(|a| a.current_balance).sum(),
        by_type,
        account_count: accounts.len(),
        reconciled_count,
        reconciled_percent: percentage(Decimal::from(reconciled_count), Decimal::from(accounts.len())),
    }
}

pub fn cash_cards(accounts: &[Account]) -> Vec<StatCard> {
    let pos = cash_position(accounts);
    let of = |ty: AccountType| {
        pos.by_type
            .iter()
            .find(|(t, _)| *t == ty)
            .map(|(_, m)| *m)
            .unwrap_or(Money::ZERO)
    };
    vec![
        StatCard::new(
            "Total Balance",
            StatValue::Amount(pos.total_balance),
            format!("{} accounts", pos.account_count),
            Tone::Blue,
            "briefcase",
        ),
        StatCard::new("Bank", StatValue::Amount(of(AccountType::Bank)), "Bank accounts", Tone::Green, "home"),
        StatCard::new("Cash on Hand", StatValue::Amount(of(AccountType::Cash)), "Cash accounts", Tone::Yellow, "dollar-sign"),
        StatCard::new(
            "Reconciled",
            StatValue::Percent(pos.reconciled_percent),
            format!("{} of {} accounts", pos.reconciled_count, pos.account_count),
            Tone::Purple,
            "check-square",
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub name: String,
    pub allocated: Money,
    pub spent: Money,
    pub remaining: Money,
    /// Not clamped; over-spend reads above 100.
    pub percentage: Decimal,
    /// Clamped to `[0, 100]`.
    pub bar_width: Decimal,
    pub health: Health,
}

pub fn budget_remaining(b: &Budget) -> Money {
    b.allocated_amount - b.spent_amount
}

pub fn budget_progress(b: &Budget) -> BudgetProgress {
    let percentage = b.spent_amount.percent_of(b.allocated_amount);
    BudgetProgress {
        name: b.name.clone(),
        allocated: b.allocated_amount,
        spent: b.spent_amount,
        remaining: budget_remaining(b),
        percentage,
        bar_width: clamp_percent(percentage),
        health: health::budget_health_for_percent(percentage),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub allocated: Money,
    pub spent: Money,
    pub remaining: Money,
    pub utilization: Decimal,
    pub over_budget_count: usize,
    pub budget_count: usize,
}

fn in_year(b: &Budget, year: Option<i32>) -> bool {
    match year {
        Some(y) => b.year == Some(y),
        None => true,
    }
}

pub fn budget_summary(budgets: &[Budget], year: Option<i32>) -> BudgetSummary {
    let scoped: Vec<&Budget> = budgets.iter().filter(|b| in_year(b, year)).collect();
    let allocated: Money = scoped.iter().map(|b| b.allocated_amount).sum();
    let spent: Money = scoped.iter().map(|b| b.spent_amount).sum();
    BudgetSummary {
        allocated,
        spent,
        remaining: allocated - spent,
        utilization: spent.percent_of(allocated),
        over_budget_count: scoped
            .iter()
            .filter(|b| budget_progress(b).health == Health::OverBudget)
            .count(),
        budget_count: scoped.len(),
    }
}

pub fn budget_cards(budgets: &[Budget], year: Option<i32>) -> Vec<StatCard> {
    let s = budget_summary(budgets, year);
    let health = health::budget_health(s.spent, s.allocated);
    vec![
        StatCard::new(
            "Total Allocated",
            StatValue::Amount(s.allocated),
            format!("{} budgets", s.budget_count),
            Tone::Blue,
            "pie-chart",
        ),
        StatCard::new("Total Spent", StatValue::Amount(s.spent), health.label(), health.tone(), "shopping-cart"),
        StatCard::new(
            "Remaining",
            StatValue::Amount(s.remaining),
            "Allocated minus spent",
            if s.remaining.is_negative() { Tone::Red } else { Tone::Green },
            "database",
        ),
        StatCard::new(
            "Utilization",
            StatValue::Percent(s.utilization),
            format!("{} over budget", s.over_budget_count),
            health.tone(),
            "activity",
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxSummary {
    pub liability: Money,
    pub paid: Money,
    pub pending: Money,
    pub overdue_count: usize,
    pub compliance_score: Decimal,
    pub record_count: usize,
}

/// Cancelled filings carry no liability.
pub fn tax_summary(records: &[TaxRecord], year: i32) -> TaxSummary {
    let scoped: Vec<&TaxRecord> = records
        .iter()
        .filter(|r| r.year == year && !r.status.eq_ignore_ascii_case("cancelled"))
        .collect();
    let liability: Money = scoped.iter().map(|r| r.tax_amount).sum();
    let paid: Money = scoped
        .iter()
        .filter(|r| r.status.eq_ignore_ascii_case(status::PAID))
        .map(|r| r.tax_amount)
        .sum();
    TaxSummary {
        liability,
        paid,
        pending: liability - paid,
        overdue_count: scoped
            .iter()
            .filter(|r| r.status.eq_ignore_ascii_case("overdue"))
            .count(),
        compliance_score: health::compliance_score(paid, liability),
        record_count: scoped.len(),
    }
}

pub fn tax_cards(records: &[TaxRecord], year: i32) -> Vec<StatCard> {
    let s = tax_summary(records, year);
    vec![
        StatCard::new(
            "Tax Liability",
            StatValue::Amount(s.liability),
            format!("{} filings in {}", s.record_count, year),
            Tone::Blue,
            "file-text",
        ),
        StatCard::new("Paid", StatValue::Amount(s.paid), "Settled filings", Tone::Green, "check-circle"),
        StatCard::new(
            "Pending",
            StatValue::Amount(s.pending),
            format!("{} overdue", s.overdue_count),
            if s.overdue_count > 0 { Tone::Red } else { Tone::Yellow },
            "clock",
        ),
        StatCard::new(
            "Compliance Score",
            StatValue::Percent(s.compliance_score),
            "Paid over liability",
            Tone::Purple,
            "shield",
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub count: usize,
    pub approved_count: usize,
    pub amount: Money,
    pub approval_rate: Decimal,
    pub health: Health,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub total: Money,
    pub approved_amount: Money,
    pub pending_count: usize,
    pub categories: Vec<CategoryBreakdown>,
}

fn is_approved(e: &Expense) -> bool {
    e.status.eq_ignore_ascii_case(status::APPROVED)
}

/// Categories come back sorted by amount, largest first.
pub fn expense_summary(expenses: &[Expense]) -> ExpenseSummary {
    let mut by_cat: BTreeMap<&str, (usize, usize, Money)> = BTreeMap::new();
    for e in expenses {
        let key = if e.category.trim().is_empty() {
            "(uncategorized)"
        } else {
            e.category.as_str()
        };
        let entry = by_cat.entry(key).or_insert((0, 0, Money::ZERO));
        entry.0 += 1;
        if is_approved(e) {
            entry.1 += 1;
        }
        entry.2 += e.amount;
    }
    let mut categories: Vec<CategoryBreakdown> = by_cat
        .into_iter()
        .map(|(cat, (count, approved_count, amount))| {
            let approval_rate = percentage(Decimal::from(approved_count), Decimal::from(count));
            CategoryBreakdown {
                category: cat.to_string(),
                count,
                approved_count,
                amount,
                approval_rate,
                health: health::category_health(approval_rate),
            }
        })
        .collect();
    categories.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));

    ExpenseSummary {
        total: expenses.iter().map(|e| e.amount).sum(),
        approved_amount: expenses.iter().filter(|e| is_approved(e)).map(|e| e.amount).sum(),
        pending_count: expenses
            .iter()
            .filter(|e| e.status.eq_ignore_ascii_case(status::SUBMITTED))
            .count(),
        categories,
    }
}

pub fn expense_cards(expenses: &[Expense]) -> Vec<StatCard> {
    let s = expense_summary(expenses);
    vec![
        StatCard::new(
            "Total Expenses",
            StatValue::Amount(s.total),
            format!("{} claims", expenses.len()),
            Tone::Blue,
            "file",
        ),
        StatCard::new(
            "Approved",
            StatValue::Amount(s.approved_amount),
            format!("{} of total", format_percent(s.approved_amount.percent_of(s.total))),
            Tone::Green,
            "check-circle",
        ),
        StatCard::new(
            "Pending Approval",
            StatValue::Count(s.pending_count),
            "Submitted claims",
            if s.pending_count > 0 { Tone::Yellow } else { Tone::Gray },
            "clock",
        ),
        StatCard::new(
            "Categories",
            StatValue::Count(s.categories.len()),
            "With at least one claim",
            Tone::Purple,
            "tag",
        ),
    ]
}
