// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use guardian_erp::chat::notifications::Priority;
use guardian_erp::health::{Health, category_health, compliance_score};
use guardian_erp::money::Money;
use guardian_erp::status::{EntityKind, NEUTRAL, Tone, known_statuses, label, style_for};
use rust_decimal::Decimal;

const CORE: [(EntityKind, &[&str]); 5] = [
    (EntityKind::Account, &["active", "inactive", "frozen", "closed"]),
    (
        EntityKind::Transaction,
        &["completed", "pending", "processing", "failed", "cancelled", "reversed"],
    ),
    (
        EntityKind::Expense,
        &["draft", "submitted", "approved", "rejected", "paid", "cancelled"],
    ),
    (EntityKind::Budget, &["draft", "active", "approved", "exceeded", "closed"]),
    (EntityKind::TaxRecord, &["pending", "filed", "paid", "overdue", "cancelled"]),
];

#[test]
fn every_enumerated_status_has_its_own_style() {
    for (kind, statuses) in CORE {
        for s in statuses {
            assert_ne!(style_for(kind, s), NEUTRAL, "{:?} '{}' fell back to neutral", kind, s);
        }
        assert_eq!(known_statuses(kind).count(), statuses.len(), "{:?}", kind);
    }
}

#[test]
fn unknown_status_falls_back_to_neutral_gray() {
    for (kind, _) in CORE {
        assert_eq!(style_for(kind, "teleported"), NEUTRAL);
        assert_eq!(style_for(kind, ""), NEUTRAL);
    }
    assert_eq!(NEUTRAL.tone, Tone::Gray);
}

#[test]
fn lookup_ignores_case_and_padding() {
    assert_eq!(
        style_for(EntityKind::Transaction, " Completed "),
        style_for(EntityKind::Transaction, "completed")
    );
    assert_eq!(style_for(EntityKind::Transaction, "COMPLETED").tone, Tone::Green);
}

#[test]
fn documents_share_one_table() {
    for s in known_statuses(EntityKind::Bill) {
        assert_eq!(style_for(EntityKind::Bill, s), style_for(EntityKind::Invoice, s));
    }
    assert_eq!(style_for(EntityKind::Invoice, "partially_paid").tone, Tone::Orange);
}

#[test]
fn priority_styles_escalate() {
    assert_eq!(Priority::Low.style().tone, Tone::Gray);
    assert_eq!(Priority::Urgent.style().tone, Tone::Red);
    assert!(Priority::Urgent > Priority::High);
}

#[test]
fn labels_are_title_cased() {
    assert_eq!(label("partially_paid"), "Partially Paid");
    assert_eq!(label("out_of_stock"), "Out Of Stock");
    assert_eq!(label("ACTIVE"), "Active");
}

#[test]
fn health_labels_and_tones() {
    assert_eq!(Health::UnderBudget.label(), "Under Budget");
    assert_eq!(Health::UnderBudget.tone(), Tone::Green);
    assert_eq!(Health::OnTrack.tone(), Tone::Orange);
    assert_eq!(Health::OverBudget.tone(), Tone::Red);
    assert_eq!(category_health(Decimal::from(80)), Health::OnTrack);
    assert_eq!(category_health(Decimal::from(79)), Health::OverBudget);
    assert_eq!(compliance_score(Money::from_major(5), Money::ZERO), Decimal::ZERO);
}
