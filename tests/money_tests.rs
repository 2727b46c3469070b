// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use guardian_erp::money::{Money, clamp_percent, format_currency, format_percent, percentage};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn formats_rwf_with_grouping_and_no_fraction() {
    assert_eq!(format_currency(1500000), "RWF 1,500,000");
    assert_eq!(format_currency(0), "RWF 0");
    assert_eq!(format_currency(999), "RWF 999");
    assert_eq!(format_currency(1000), "RWF 1,000");
    assert_eq!(format_currency(Money::from_minor(123_456_789)), "RWF 1,234,568");
}

#[test]
fn negative_amounts_put_the_sign_before_the_currency() {
    assert_eq!(format_currency(-1500), "-RWF 1,500");
    // rounds to zero, so no sign
    assert_eq!(format_currency(Money::from_minor(-40)), "RWF 0");
}

#[test]
fn parses_strings_with_separators_and_rounds_to_cents() {
    let m: Money = "1,500,000.50".parse().unwrap();
    assert_eq!(m, Money::from_minor(150_000_050));
    let r: Money = "10.005".parse().unwrap();
    assert_eq!(r, Money::from_minor(1001));
    let empty: Money = "  ".parse().unwrap();
    assert!(empty.is_zero());
    assert!("abc".parse::<Money>().is_err());
}

#[test]
fn deserializes_from_string_number_and_null() {
    #[derive(serde::Deserialize)]
    struct Row {
        a: Money,
        b: Money,
        c: Money,
        #[serde(default)]
        d: Money,
    }
    let row: Row = serde_json::from_str(r#"{"a":"1500.00","b":2500,"c":null}"#).unwrap();
    assert_eq!(row.a, Money::from_major(1500));
    assert_eq!(row.b, Money::from_major(2500));
    assert!(row.c.is_zero());
    assert!(row.d.is_zero());
}

#[test]
fn serializes_as_a_two_digit_string() {
    let v = serde_json::to_value(Money::from_major(42)).unwrap();
    assert_eq!(v, serde_json::json!("42.00"));
}

#[test]
fn percentage_guards_zero_denominator() {
    assert_eq!(percentage(dec("50"), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(percentage(dec("50"), dec("200")), dec("25"));
    assert_eq!(Money::from_major(5).percent_of(Money::ZERO), Decimal::ZERO);
}

#[test]
fn clamp_only_limits_the_bar() {
    assert_eq!(clamp_percent(dec("150")), dec("100"));
    assert_eq!(clamp_percent(dec("-3")), Decimal::ZERO);
    assert_eq!(clamp_percent(dec("42.5")), dec("42.5"));
}

#[test]
fn percent_has_one_decimal() {
    assert_eq!(format_percent(dec("45.54")), "45.5%");
    assert_eq!(format_percent(dec("100")), "100.0%");
}

#[test]
fn arithmetic_and_sum() {
    let items = [Money::from_major(10), Money::from_minor(550), Money::from_major(-3)];
    let total: Money = items.iter().sum();
    assert_eq!(total, Money::from_minor(1250));
    assert_eq!(Money::from_major(10) - Money::from_major(15), Money::from_major(-5));
    assert_eq!(Money::from_minor(250) * dec("4"), Money::from_major(10));
}

#[test]
fn arithmetic_saturates_at_the_decimal_range() {
    let big: Money = "7e28".parse().unwrap();
    assert_eq!((big + big).amount(), Decimal::MAX);
    assert_eq!((-big - big).amount(), Decimal::MIN);
    assert_eq!([big, big, Money::from_major(1)].iter().sum::<Money>().amount(), Decimal::MAX);
    assert_eq!((big * dec("-2")).amount(), Decimal::MIN);

    let mut acc = big;
    acc += big;
    acc -= Money::from_major(1);
    assert_eq!(acc.amount(), Decimal::MAX - Decimal::ONE);
}

#[test]
fn percentage_of_huge_values_does_not_panic() {
    assert_eq!(percentage(dec("900000000000000000000000000"), dec("1000000000000000000000000000")), dec("90"));
    assert_eq!(percentage(Decimal::MAX, dec("0.5")), Decimal::MAX);
    assert_eq!(percentage(Decimal::MAX, dec("-0.5")), Decimal::MIN);
    assert_eq!(percentage(dec("1"), dec("3")), dec("100") / dec("3"));
}
