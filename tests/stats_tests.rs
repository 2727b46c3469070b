// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use guardian_erp::health::Health;
use guardian_erp::models::{Account, Budget, Expense, Party, TaxRecord, Transaction};
use guardian_erp::money::Money;
use guardian_erp::stats::{self, Period, StatValue, Trend};
use rust_decimal::Decimal;
use serde_json::json;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn txs() -> Vec<Transaction> {
    serde_json::from_value(json!([
        {"id": 1, "type": "income", "amount": "1000.00", "transactionDate": "2025-03-05", "status": "completed"},
        {"id": 2, "type": "income", "amount": 500, "transactionDate": "2025-03-20T10:00:00Z", "status": "completed"},
        {"id": 3, "type": "income", "amount": "9999.00", "transactionDate": "2025-03-21", "status": "pending"},
        {"id": 4, "type": "expense", "amount": "300.00", "transactionDate": "2025-03-22", "status": "completed"},
        {"id": 5, "type": "transfer", "amount": "700.00", "transactionDate": "2025-03-22", "status": "completed"},
        {"id": 6, "type": "income", "amount": "200.00", "transactionDate": "2025-02-10", "status": "completed"},
        {"id": 7, "type": "expense", "amount": "50.00", "transactionDate": "2025-02-11", "status": "completed"}
    ]))
    .unwrap()
}

#[test]
fn revenue_counts_only_completed_income() {
    assert_eq!(stats::total_revenue(&txs()), Money::from_major(1700));
    assert_eq!(stats::total_expenses(&txs()), Money::from_major(350));
}

#[test]
fn empty_input_yields_zero_stats() {
    assert_eq!(stats::total_revenue(&[]), Money::ZERO);
    let s = stats::revenue_summary(&[], None);
    assert_eq!(s.net_income, Money::ZERO);
    assert_eq!(s.profit_margin, Decimal::ZERO);
    let b = stats::budget_summary(&[], None);
    assert_eq!(b.utilization, Decimal::ZERO);
    let p = stats::party_summary(&[]);
    assert_eq!(p.average_balance, Money::ZERO);
    let t = stats::tax_summary(&[], 2025);
    assert_eq!(t.compliance_score, Decimal::ZERO);
    assert!(stats::expense_summary(&[]).categories.is_empty());
    for card in stats::cash_cards(&[]) {
        match card.value {
            StatValue::Amount(m) => assert!(m.is_zero()),
            StatValue::Count(n) => assert_eq!(n, 0),
            StatValue::Percent(p) => assert!(p.is_zero()),
        }
    }
}

#[test]
fn revenue_summary_scoped_to_a_month_with_trend() {
    let all = txs();
    let march = Period::month(2025, 3);
    let s = stats::revenue_summary(&all, Some(march));
    assert_eq!(s.revenue, Money::from_major(1500));
    assert_eq!(s.expenses, Money::from_major(300));
    assert_eq!(s.net_income, Money::from_major(1200));
    assert_eq!(s.profit_margin, dec("80"));
    assert_eq!(s.transaction_count, 5);

    let cards = stats::revenue_cards(&all, Some(march));
    assert_eq!(cards[0].title, "Total Revenue");
    assert_eq!(cards[0].trend, Some(Trend::Up));
    assert_eq!(cards[0].value.display(), "RWF 1,500");
}

#[test]
fn period_previous_wraps_the_year() {
    assert_eq!(Period::month(2025, 1).previous(), Period::month(2024, 12));
    assert_eq!(Period::year(2025).previous(), Period::year(2024));
    assert!(!Period::year(2025).contains(None));
}

#[test]
fn monthly_cash_flow_has_twelve_rows_and_skips_transfers() {
    let months = stats::monthly_cash_flow(&txs(), 2025);
    assert_eq!(months.len(), 12);
    let feb = &months[1];
    assert_eq!((feb.inflow, feb.outflow, feb.net), (Money::from_major(200), Money::from_major(50), Money::from_major(150)));
    let mar = &months[2];
    assert_eq!(mar.inflow, Money::from_major(1500));
    assert_eq!(mar.outflow, Money::from_major(300));
    assert!(months[5].net.is_zero());
}

#[test]
fn overdue_count_is_the_positive_balance_heuristic() {
    let vendors: Vec<Party> = serde_json::from_value(json!([
        {"id": 1, "name": "Acme", "currentBalance": "1200.00", "status": "active"},
        {"id": 2, "name": "Beta", "currentBalance": "0", "status": "active"},
        {"id": 3, "name": "Gamma", "currentBalance": "300.00", "status": "inactive"}
    ]))
    .unwrap();
    let s = stats::party_summary(&vendors);
    assert_eq!(s.total_outstanding, Money::from_major(1500));
    assert_eq!(s.outstanding_count, 2);
    assert_eq!(s.active_count, 2);
    assert_eq!(s.average_balance, Money::from_major(500));

    let cards = stats::payables_cards(&vendors);
    assert_eq!(cards[1].title, "Overdue");
    assert_eq!(cards[1].value, StatValue::Count(2));
}

#[test]
fn cash_position_sums_active_accounts_by_type() {
    let accounts: Vec<Account> = serde_json::from_value(json!([
        {"id": 1, "name": "BK Main", "type": "bank", "currentBalance": "10000", "status": "active", "isReconciled": true},
        {"id": 2, "accountName": "Petty", "type": "cash", "currentBalance": "500", "status": "active"},
        {"id": 3, "name": "Old", "type": "bank", "currentBalance": "9999", "status": "closed", "isReconciled": true},
        {"id": 4, "name": "Clients", "type": "receivable", "currentBalance": "2500", "status": "active"}
    ]))
    .unwrap();
    assert_eq!(accounts[1].name, "Petty");
    let pos = stats::cash_position(&accounts);
    assert_eq!(pos.total_balance, Money::from_major(13000));
    assert_eq!(pos.account_count, 4);
    assert_eq!(pos.reconciled_count, 2);
    assert_eq!(pos.reconciled_percent, dec("50"));
}

fn budget(allocated: &str, spent: &str, year: i32) -> Budget {
    serde_json::from_value(json!({
        "id": 1, "name": "Operations", "type": "expense",
        "allocatedAmount": allocated, "spentAmount": spent, "status": "active", "year": year
    }))
    .unwrap()
}

#[test]
fn budget_progress_keeps_raw_percentage_and_clamps_the_bar() {
    let p = stats::budget_progress(&budget("1000", "1250", 2025));
    assert_eq!(p.remaining, Money::from_major(-250));
    assert_eq!(p.percentage, dec("125"));
    assert_eq!(p.bar_width, dec("100"));
    assert_eq!(p.health, Health::OverBudget);
}

#[test]
fn budget_with_zero_allocation_reads_zero_percent() {
    let p = stats::budget_progress(&budget("0", "40", 2025));
    assert_eq!(p.percentage, Decimal::ZERO);
    assert_eq!(p.remaining, Money::from_major(-40));
    assert_eq!(p.health, Health::UnderBudget);
}

#[test]
fn budget_health_bands() {
    assert_eq!(stats::budget_progress(&budget("1000", "900", 2025)).health, Health::UnderBudget);
    assert_eq!(stats::budget_progress(&budget("1000", "950", 2025)).health, Health::OnTrack);
    assert_eq!(stats::budget_progress(&budget("1000", "1000", 2025)).health, Health::OnTrack);
    assert_eq!(stats::budget_progress(&budget("1000", "1000.01", 2025)).health, Health::OverBudget);
}

#[test]
fn huge_budgets_do_not_overflow() {
    let p = stats::budget_progress(&budget("1e27", "9e26", 2025));
    assert_eq!(p.percentage, dec("90"));
    assert_eq!(p.health, Health::UnderBudget);

    let budgets = vec![budget("5e28", "7e28", 2025), budget("5e28", "7e28", 2025)];
    let s = stats::budget_summary(&budgets, Some(2025));
    assert_eq!(s.allocated.amount(), Decimal::MAX);
    assert_eq!(s.spent.amount(), Decimal::MAX);
    assert_eq!(s.utilization, dec("100"));
    assert_eq!(s.budget_count, 2);
}

#[test]
fn budget_summary_filters_by_year() {
    let budgets = vec![budget("1000", "500", 2025), budget("2000", "2500", 2025), budget("700", "0", 2024)];
    let s = stats::budget_summary(&budgets, Some(2025));
    assert_eq!(s.allocated, Money::from_major(3000));
    assert_eq!(s.spent, Money::from_major(3000));
    assert_eq!(s.remaining, Money::ZERO);
    assert_eq!(s.utilization, dec("100"));
    assert_eq!(s.over_budget_count, 1);
    assert_eq!(s.budget_count, 2);
}

#[test]
fn tax_compliance_is_paid_over_liability() {
    let records: Vec<TaxRecord> = serde_json::from_value(json!([
        {"id": 1, "type": "VAT", "period": "monthly", "year": 2025, "month": 1, "taxAmount": "600", "status": "paid"},
        {"id": 2, "type": "VAT", "period": "monthly", "year": 2025, "month": 2, "taxAmount": "400", "status": "overdue"},
        {"id": 3, "type": "PAYE", "period": "quarterly", "year": 2025, "quarter": 1, "taxAmount": "1000", "status": "cancelled"},
        {"id": 4, "type": "CIT", "period": "yearly", "year": 2024, "taxAmount": "5000", "status": "paid"}
    ]))
    .unwrap();
    let s = stats::tax_summary(&records, 2025);
    assert_eq!(s.liability, Money::from_major(1000));
    assert_eq!(s.paid, Money::from_major(600));
    assert_eq!(s.pending, Money::from_major(400));
    assert_eq!(s.overdue_count, 1);
    assert_eq!(s.compliance_score, dec("60"));
    assert_eq!(s.record_count, 2);
}

#[test]
fn expense_categories_sorted_by_amount_with_approval_health() {
    let expenses: Vec<Expense> = serde_json::from_value(json!([
        {"id": 1, "category": "Travel", "amount": "100", "status": "approved"},
        {"id": 2, "category": "Travel", "amount": "50", "status": "submitted"},
        {"id": 3, "category": "Uniforms", "amount": "400", "status": "approved"},
        {"id": 4, "category": "Uniforms", "amount": "100", "status": "approved"},
        {"id": 5, "category": "", "amount": "10", "status": "draft"}
    ]))
    .unwrap();
    let s = stats::expense_summary(&expenses);
    assert_eq!(s.total, Money::from_major(660));
    assert_eq!(s.approved_amount, Money::from_major(600));
    assert_eq!(s.pending_count, 1);
    let names: Vec<&str> = s.categories.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, ["Uniforms", "Travel", "(uncategorized)"]);
    assert_eq!(s.categories[0].approval_rate, dec("100"));
    assert_eq!(s.categories[0].health, Health::OnTrack);
    assert_eq!(s.categories[1].approval_rate, dec("50"));
    assert_eq!(s.categories[1].health, Health::OverBudget);
}
