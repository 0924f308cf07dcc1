use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::calculations::{EstimateError, InputField, InvalidReason};

/// Tax years the estimator accepts. Federal income tax starts in 1913.
pub const PLAUSIBLE_TAX_YEARS: RangeInclusive<i32> = 1913..=2099;

/// Values collected by the wizard for a single estimate.
///
/// `deductions` of `None` means "use the standard deduction for the year".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    pub tax_year: i32,
    pub gross_income: Decimal,
    pub withholdings: Decimal,
    pub deductions: Option<Decimal>,
}

impl TaxInput {
    /// Builds a validated input.
    ///
    /// # Errors
    ///
    /// [`EstimateError::InvalidInput`] when an amount is negative or the tax
    /// year is outside [`PLAUSIBLE_TAX_YEARS`].
    pub fn new(
        tax_year: i32,
        gross_income: Decimal,
        withholdings: Decimal,
        deductions: Option<Decimal>,
    ) -> Result<Self, EstimateError> {
        let input = Self {
            tax_year,
            gross_income,
            withholdings,
            deductions,
        };
        input.validate()?;
        Ok(input)
    }

    /// Builds a validated input from floating point amounts.
    ///
    /// NaN and infinities are rejected before any conversion happens.
    pub fn from_f64(
        tax_year: i32,
        gross_income: f64,
        withholdings: f64,
        deductions: Option<f64>,
    ) -> Result<Self, EstimateError> {
        let gross_income = decimal_from_f64(InputField::GrossIncome, gross_income)?;
        let withholdings = decimal_from_f64(InputField::Withholdings, withholdings)?;
        let deductions = deductions
            .map(|d| decimal_from_f64(InputField::Deductions, d))
            .transpose()?;

        Self::new(tax_year, gross_income, withholdings, deductions)
    }

    /// Checks every field, reporting the first violation found.
    pub fn validate(&self) -> Result<(), EstimateError> {
        if !PLAUSIBLE_TAX_YEARS.contains(&self.tax_year) {
            return Err(EstimateError::invalid(
                InputField::TaxYear,
                InvalidReason::YearOutOfRange(self.tax_year),
            ));
        }

        ensure_non_negative(InputField::GrossIncome, self.gross_income)?;
        ensure_non_negative(InputField::Withholdings, self.withholdings)?;
        if let Some(deductions) = self.deductions {
            ensure_non_negative(InputField::Deductions, deductions)?;
        }

        Ok(())
    }
}

fn ensure_non_negative(
    field: InputField,
    value: Decimal,
) -> Result<(), EstimateError> {
    if value < Decimal::ZERO {
        return Err(EstimateError::invalid(
            field,
            InvalidReason::Negative(value),
        ));
    }
    Ok(())
}

fn decimal_from_f64(
    field: InputField,
    value: f64,
) -> Result<Decimal, EstimateError> {
    if !value.is_finite() {
        return Err(EstimateError::invalid(field, InvalidReason::NonFinite));
    }
    Decimal::from_f64(value).ok_or_else(|| {
        EstimateError::invalid(field, InvalidReason::NotNumeric(value.to_string()))
    })
}
