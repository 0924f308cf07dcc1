//! Rounding and presentation helpers shared by the estimator and its callers.
//!
//! Estimates are carried unrounded; these functions are applied only when a
//! value is shown to the filer.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use taxwiz_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use taxwiz_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-100.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Formats an amount as US currency: `$`, thousands separators, and two
/// decimal places after half-up rounding.
///
/// ```
/// use rust_decimal_macros::dec;
/// use taxwiz_core::calculations::common::format_currency;
///
/// assert_eq!(format_currency(dec!(1711.5)), "$1,711.50");
/// assert_eq!(format_currency(dec!(-1234567.891)), "-$1,234,567.89");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let negative = rounded < Decimal::ZERO;
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}
