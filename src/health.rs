// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::money::{Money, percentage};
use crate::status::Tone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Health {
    UnderBudget,
    OnTrack,
    OverBudget,
}

impl Health {
    pub fn label(&self) -> &'static str {
        match self {
            Health::UnderBudget => "Under Budget",
            Health::OnTrack => "On Track",
            Health::OverBudget => "Over Budget",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Health::UnderBudget => Tone::Green,
            Health::OnTrack => Tone::Orange,
            Health::OverBudget => Tone::Red,
        }
    }
}

/// Spent-to-allocated ratio: up to 90% is under budget, up to 100% on track.
pub fn budget_health(spent: Money, allocated: Money) -> Health {
    budget_health_for_percent(spent.percent_of(allocated))
}

pub fn budget_health_for_percent(pct: Decimal) -> Health {
    if pct <= Decimal::from(90) {
        Health::UnderBudget
    } else if pct <= Decimal::ONE_HUNDRED {
        Health::OnTrack
    } else {
        Health::OverBudget
    }
}

/// Expense categories reuse the budget labels for their approval rate:
/// 80% or more approved reads "On Track", anything lower "Over Budget".
pub fn category_health(approval_rate: Decimal) -> Health {
    if approval_rate >= Decimal::from(80) {
        Health::OnTrack
    } else {
        Health::OverBudget
    }
}

/// Paid tax over total liability, in percent. No banding.
pub fn compliance_score(paid: Money, liability: Money) -> Decimal {
    percentage(paid.amount(), liability.amount())
}
