// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monetary amounts.
//!
//! The API sends DECIMAL columns either as JSON strings (`"1500.00"`) or as plain
//! numbers. Both are parsed here, once, into [`Money`], which keeps two fractional
//! digits and never goes through `f64`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ErpError;

/// Currency every amount is displayed in.
pub const DISPLAY_CURRENCY: &str = "RWF";

/// Minor-unit precision of stored amounts.
pub const SCALE: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(d: Decimal) -> Self {
        Money(d.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn from_major(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// `Money::from_minor(150_050)` is 1500.50.
    pub fn from_minor(minor: i64) -> Self {
        Money(Decimal::new(minor, SCALE))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Money {
        Money(self.0.abs())
    }

    /// Ratio of `self` to `whole` in percent, 0 when `whole` is zero.
    pub fn percent_of(&self, whole: Money) -> Decimal {
        percentage(self.0, whole.0)
    }
}

/// `part / whole * 100`, guarded so a zero denominator yields 0. Results beyond
/// the decimal range saturate.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .or_else(|| {
            part.checked_div(whole)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        })
        .unwrap_or_else(|| saturated(part.is_sign_negative() != whole.is_sign_negative()))
}

fn saturated(negative: bool) -> Decimal {
    if negative { Decimal::MIN } else { Decimal::MAX }
}

/// Clamp a percentage into `[0, 100]` for progress bar widths.
pub fn clamp_percent(p: Decimal) -> Decimal {
    p.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

impl FromStr for Money {
    type Err = ErpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().replace(',', "");
        if t.is_empty() {
            return Ok(Money::ZERO);
        }
        let d = Decimal::from_str(&t)
            .or_else(|_| Decimal::from_scientific(&t))
            .map_err(|_| ErpError::validation("amount", format!("'{}' is not a decimal", s)))?;
        Ok(Money::new(d))
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::new(d)
    }
}

impl From<i64> for Money {
    fn from(v: i64) -> Self {
        Money::from_major(v)
    }
}

impl From<i32> for Money {
    fn from(v: i32) -> Self {
        Money::from_major(i64::from(v))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// Arithmetic saturates at the ends of the decimal range instead of panicking.

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(
            self.0
                .checked_add(rhs.0)
                .unwrap_or_else(|| saturated(rhs.0.is_sign_negative())),
        )
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(
            self.0
                .checked_sub(rhs.0)
                .unwrap_or_else(|| saturated(!rhs.0.is_sign_negative())),
        )
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;
    fn mul(self, rhs: Decimal) -> Money {
        match self.0.checked_mul(rhs) {
            Some(d) => Money::new(d),
            None => Money(saturated(self.0.is_sign_negative() != rhs.is_sign_negative())),
        }
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::from_str(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money::from_major(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        Ok(Money(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        // Go through the shortest round-trip text so 0.1 stays 0.1.
        Money::from_str(&v.to_string()).map_err(E::custom)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Money, D::Error> {
        d.deserialize_any(MoneyVisitor)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Money, D::Error> {
        d.deserialize_any(MoneyVisitor)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an amount in `ccy` with zero fraction digits and thousands separators.
pub fn format_money(amount: Decimal, ccy: &str) -> String {
    let whole = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = whole.abs().trunc().to_string();
    let sign = if whole.is_sign_negative() && !whole.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{} {}", sign, ccy, group_thousands(&digits))
}

/// `format_currency(Money::from(1_500_000))` gives `"RWF 1,500,000"`.
pub fn format_currency(amount: impl Into<Money>) -> String {
    format_money(amount.into().amount(), DISPLAY_CURRENCY)
}

/// One fractional digit, e.g. `"45.5%"`.
pub fn format_percent(p: Decimal) -> String {
    format!(
        "{:.1}%",
        p.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}
