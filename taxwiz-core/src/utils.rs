use rust_decimal::Decimal;

use crate::calculations::{EstimateError, InputField, InvalidReason};

/// Trims whitespace, drops one leading `$` and removes `,` thousands separators.
fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    unsigned.trim_start().replace(',', "")
}

/// Parses form text into an amount for `field`.
///
/// Accepts `"1,234.56"` and `"$1,234.56"`. Sign is not checked here; range
/// checks belong to [`TaxInput::validate`](crate::TaxInput::validate).
///
/// # Errors
///
/// [`InvalidReason::Missing`] for blank input, [`InvalidReason::NotNumeric`]
/// for anything that is not a plain decimal number (including `NaN`, `inf`
/// and exponent notation).
pub fn parse_amount(
    field: InputField,
    s: &str,
) -> Result<Decimal, EstimateError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Err(EstimateError::invalid(field, InvalidReason::Missing));
    }
    if normalized.contains(['e', 'E']) {
        tracing::warn!(%field, input = %s, "invalid amount: exponent notation");
        return Err(EstimateError::invalid(
            field,
            InvalidReason::NotNumeric(s.trim().to_string()),
        ));
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(%field, input = %s, "invalid amount: {}", e);
        EstimateError::invalid(field, InvalidReason::NotNumeric(s.trim().to_string()))
    })
}

/// Like [`parse_amount`], but blank input is `Ok(None)`.
pub fn parse_optional_amount(
    field: InputField,
    s: &str,
) -> Result<Option<Decimal>, EstimateError> {
    if normalize_amount_input(s).is_empty() {
        return Ok(None);
    }
    parse_amount(field, s).map(Some)
}

/// Parses the tax year field.
pub fn parse_tax_year(s: &str) -> Result<i32, EstimateError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(EstimateError::invalid(
            InputField::TaxYear,
            InvalidReason::Missing,
        ));
    }
    trimmed.parse().map_err(|_| {
        EstimateError::invalid(
            InputField::TaxYear,
            InvalidReason::NotNumeric(trimmed.to_string()),
        )
    })
}
