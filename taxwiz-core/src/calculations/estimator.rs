//! Tax liability estimate for the filing wizard.
//!
//! Given gross income, withholdings and an optional deduction for a tax
//! year, the estimator computes taxable income, the tax owed under the
//! year's marginal rate schedule, and the resulting refund or balance due.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Deduction: the filer's amount if given, else the standard deduction |
//! | 2    | Taxable income: gross income - deduction, minimum 0 |
//! | 3    | Tax owed: base tax of the bracket + marginal income × bracket rate |
//! | 4    | Refund: withholdings - tax owed, minimum 0 |
//! | 5    | Amount owed: tax owed - withholdings, minimum 0 |
//!
//! Bracket ceilings are inclusive: income exactly at a ceiling is taxed
//! entirely within the lower bracket. Nothing is rounded here.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxwiz_core::{TaxInput, estimate};
//!
//! let input = TaxInput::new(2021, dec!(50000), dec!(6000), None).unwrap();
//! let result = estimate(&input).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(37450));
//! assert_eq!(result.tax_owed, dec!(4288.50));
//! assert_eq!(result.refund, dec!(1711.50));
//! assert_eq!(result.amount_owed, dec!(0));
//! ```

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::common::max;
use crate::config::ScheduleBook;
use crate::models::{TaxInput, TaxResult, TaxSchedule};

/// Input field named in an [`EstimateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    TaxYear,
    GrossIncome,
    Withholdings,
    Deductions,
}

impl InputField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TaxYear => "tax year",
            Self::GrossIncome => "income",
            Self::Withholdings => "withholdings",
            Self::Deductions => "deductions",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("value is required")]
    Missing,

    #[error("'{0}' is not a number")]
    NotNumeric(String),

    #[error("value must be finite")]
    NonFinite,

    #[error("{0} must not be negative")]
    Negative(Decimal),

    #[error("{0} is not a plausible tax year")]
    YearOutOfRange(i32),
}

/// Errors that can occur during an estimate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: InputField,
        reason: InvalidReason,
    },
}

impl EstimateError {
    pub fn invalid(
        field: InputField,
        reason: InvalidReason,
    ) -> Self {
        Self::InvalidInput { field, reason }
    }

    /// The field that failed validation.
    pub fn field(&self) -> InputField {
        match self {
            Self::InvalidInput { field, .. } => *field,
        }
    }
}

/// Estimates a return against the built-in schedule.
///
/// Shorthand for `TaxEstimator::new(ScheduleBook::builtin_ref()).estimate(input)`.
///
/// # Errors
///
/// [`EstimateError::InvalidInput`] if any field fails validation.
pub fn estimate(input: &TaxInput) -> Result<TaxResult, EstimateError> {
    TaxEstimator::new(ScheduleBook::builtin_ref()).estimate(input)
}

/// Calculator bound to a set of per-year schedules.
#[derive(Debug, Clone, Copy)]
pub struct TaxEstimator<'a> {
    schedules: &'a ScheduleBook,
}

impl<'a> TaxEstimator<'a> {
    pub fn new(schedules: &'a ScheduleBook) -> Self {
        Self { schedules }
    }

    /// Validates `input`, picks the schedule for its tax year and computes
    /// the liability.
    ///
    /// # Errors
    ///
    /// [`EstimateError::InvalidInput`] if any field fails validation. No
    /// partial result is produced.
    pub fn estimate(
        &self,
        input: &TaxInput,
    ) -> Result<TaxResult, EstimateError> {
        input.validate()?;

        let schedule = self.schedules.schedule_for(input.tax_year);

        let (deduction_applied, used_standard_deduction) =
            self.determine_deduction(input.deductions, schedule.standard_deduction);
        let taxable_income = self.taxable_income(input.gross_income, deduction_applied);
        let tax_owed = self.calculate_tax(schedule, taxable_income);
        let refund = self.refund(input.withholdings, tax_owed);
        let amount_owed = self.amount_owed(input.withholdings, tax_owed);

        tracing::debug!(
            tax_year = input.tax_year,
            schedule_year = schedule.tax_year,
            %taxable_income,
            %tax_owed,
            "estimated return"
        );

        Ok(TaxResult {
            taxable_income,
            tax_owed,
            refund,
            amount_owed,
            deduction_applied,
            used_standard_deduction,
        })
    }

    /// Uses the filer's deduction when present, otherwise the standard one.
    fn determine_deduction(
        &self,
        deductions: Option<Decimal>,
        standard: Decimal,
    ) -> (Decimal, bool) {
        match deductions {
            Some(amount) => (amount, false),
            None => (standard, true),
        }
    }

    fn taxable_income(
        &self,
        gross_income: Decimal,
        deduction: Decimal,
    ) -> Decimal {
        max(gross_income - deduction, Decimal::ZERO)
    }

    /// Tax from the schedule's marginal brackets.
    fn calculate_tax(
        &self,
        schedule: &TaxSchedule,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        match schedule.bracket_for(taxable_income) {
            Some(bracket) => bracket.tax_on(taxable_income),
            None => Decimal::ZERO,
        }
    }

    fn refund(
        &self,
        withholdings: Decimal,
        tax_owed: Decimal,
    ) -> Decimal {
        max(withholdings - tax_owed, Decimal::ZERO)
    }

    fn amount_owed(
        &self,
        withholdings: Decimal,
        tax_owed: Decimal,
    ) -> Decimal {
        max(tax_owed - withholdings, Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::config::{
        BRACKET_1_CEILING, BRACKET_1_RATE, BRACKET_2_CEILING, BRACKET_2_TAX, BRACKET_3_RATE,
        STANDARD_DEDUCTION,
    };
    use crate::models::TaxBracket;

    fn input(
        gross_income: Decimal,
        withholdings: Decimal,
        deductions: Option<Decimal>,
    ) -> TaxInput {
        TaxInput {
            tax_year: 2021,
            gross_income,
            withholdings,
            deductions,
        }
    }

    fn two_bracket_book() -> ScheduleBook {
        ScheduleBook::new(vec![TaxSchedule {
            tax_year: 2024,
            standard_deduction: dec!(1000),
            brackets: vec![
                TaxBracket {
                    min_income: dec!(0),
                    max_income: Some(dec!(5000)),
                    tax_rate: dec!(0.05),
                    base_tax: dec!(0),
                },
                TaxBracket {
                    min_income: dec!(5000),
                    max_income: None,
                    tax_rate: dec!(0.50),
                    base_tax: dec!(250),
                },
            ],
        }])
        .unwrap()
    }

    // =========================================================================
    // determine_deduction tests
    // =========================================================================

    #[test]
    fn determine_deduction_uses_supplied_amount() {
        let book = ScheduleBook::builtin();
        let estimator = TaxEstimator::new(&book);

        let (deduction, used_standard) =
            estimator.determine_deduction(Some(dec!(20000)), STANDARD_DEDUCTION);

        assert_eq!(deduction, dec!(20000));
        assert!(!used_standard);
    }

    #[test]
    fn determine_deduction_uses_standard_when_absent() {
        let book = ScheduleBook::builtin();
        let estimator = TaxEstimator::new(&book);

        let (deduction, used_standard) = estimator.determine_deduction(None, STANDARD_DEDUCTION);

        assert_eq!(deduction, dec!(12550));
        assert!(used_standard);
    }

    #[test]
    fn determine_deduction_keeps_explicit_zero() {
        let book = ScheduleBook::builtin();
        let estimator = TaxEstimator::new(&book);

        let (deduction, used_standard) =
            estimator.determine_deduction(Some(dec!(0)), STANDARD_DEDUCTION);

        assert_eq!(deduction, dec!(0));
        assert!(!used_standard);
    }

    // =========================================================================
    // calculate_tax tests
    // =========================================================================

    #[test]
    fn calculate_tax_first_bracket() {
        let book = ScheduleBook::builtin();
        let estimator = TaxEstimator::new(&book);
        let schedule = book.schedule_for(2021);

        assert_eq!(estimator.calculate_tax(schedule, dec!(10000)), dec!(1000.00));
    }

    #[test]
    fn calculate_tax_at_first_ceiling_stays_in_first_bracket() {
        let book = ScheduleBook::builtin();
        let estimator = TaxEstimator::new(&book);
        let schedule = book.schedule_for(2021);

        let result = estimator.calculate_tax(schedule, BRACKET_1_CEILING);

        assert_eq!(result, BRACKET_1_CEILING * BRACKET_1_RATE);
        assert_eq!(result, dec!(1027.50));
    }

    #[test]
    fn calculate_tax_at_second_ceiling_stays_in_second_bracket() {
        let book = ScheduleBook::builtin();
        let estimator = TaxEstimator::new(&book);
        let schedule = book.schedule_for(2021);

        let result = estimator.calculate_tax(schedule, BRACKET_2_CEILING);

        assert_eq!(result, BRACKET_2_TAX);
    }

    #[test]
    fn calculate_tax_third_bracket() {
        let book = ScheduleBook::builtin();
        let estimator = TaxEstimator::new(&book);
        let schedule = book.schedule_for(2021);

        let result = estimator.calculate_tax(schedule, dec!(100000));

        // 4807.50 + (100000 - 41775) * 0.22 = 4807.50 + 12809.50 = 17617
        assert_eq!(result, dec!(17617.00));
        assert_eq!(
            result,
            BRACKET_2_TAX + (dec!(100000) - BRACKET_2_CEILING) * BRACKET_3_RATE
        );
    }

    #[test]
    fn calculate_tax_returns_zero_for_zero_income() {
        let book = ScheduleBook::builtin();
        let estimator = TaxEstimator::new(&book);
        let schedule = book.schedule_for(2021);

        assert_eq!(estimator.calculate_tax(schedule, dec!(0)), dec!(0));
    }

    #[test]
    fn calculate_tax_keeps_fractional_cents() {
        let book = ScheduleBook::builtin();
        let estimator = TaxEstimator::new(&book);
        let schedule = book.schedule_for(2021);

        // 0.10 * 0.05 = 0.005, unrounded
        assert_eq!(estimator.calculate_tax(schedule, dec!(0.05)), dec!(0.005));
    }

    // =========================================================================
    // estimate (integration) tests
    // =========================================================================

    #[test]
    fn estimate_standard_deduction_refund_scenario() {
        let result = estimate(&input(dec!(50000), dec!(6000), None)).unwrap();

        assert_eq!(
            result,
            TaxResult {
                taxable_income: dec!(37450),
                // 1027.50 + (37450 - 10275) * 0.12 = 4288.50
                tax_owed: dec!(4288.50),
                refund: dec!(1711.50),
                amount_owed: dec!(0),
                deduction_applied: dec!(12550),
                used_standard_deduction: true,
            }
        );
    }

    #[test]
    fn estimate_zero_income_is_all_zero() {
        let result = estimate(&input(dec!(0), dec!(0), None)).unwrap();

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.tax_owed, dec!(0));
        assert_eq!(result.refund, dec!(0));
        assert_eq!(result.amount_owed, dec!(0));
    }

    #[test]
    fn estimate_balance_due_scenario() {
        let result = estimate(&input(dec!(50000), dec!(3000), None)).unwrap();

        assert_eq!(result.refund, dec!(0));
        assert_eq!(result.amount_owed, dec!(1288.50));
        assert!(result.is_balance_due());
        assert!(!result.is_refund());
    }

    #[test]
    fn estimate_withholdings_equal_to_tax_gives_neither() {
        let result = estimate(&input(dec!(50000), dec!(4288.50), None)).unwrap();

        assert_eq!(result.refund, dec!(0));
        assert_eq!(result.amount_owed, dec!(0));
    }

    #[test]
    fn estimate_deductions_above_income_floor_taxable_at_zero() {
        let result = estimate(&input(dec!(8000), dec!(500), Some(dec!(9000)))).unwrap();

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.tax_owed, dec!(0));
        assert_eq!(result.refund, dec!(500));
    }

    #[test]
    fn estimate_explicit_zero_deduction_taxes_full_income() {
        let result = estimate(&input(dec!(10000), dec!(0), Some(dec!(0)))).unwrap();

        assert_eq!(result.taxable_income, dec!(10000));
        assert_eq!(result.tax_owed, dec!(1000.00));
        assert!(!result.used_standard_deduction);
    }

    #[test]
    fn estimate_taxable_exactly_at_first_ceiling() {
        let gross = BRACKET_1_CEILING + STANDARD_DEDUCTION;
        let result = estimate(&input(gross, dec!(0), None)).unwrap();

        assert_eq!(result.taxable_income, BRACKET_1_CEILING);
        assert_eq!(result.tax_owed, BRACKET_1_CEILING * BRACKET_1_RATE);
    }

    #[test]
    fn estimate_rejects_negative_income() {
        let result = estimate(&input(dec!(-100), dec!(0), None));

        assert_eq!(
            result,
            Err(EstimateError::invalid(
                InputField::GrossIncome,
                InvalidReason::Negative(dec!(-100))
            ))
        );
    }

    #[test]
    fn estimate_rejects_implausible_year() {
        let mut bad = input(dec!(100), dec!(0), None);
        bad.tax_year = 3021;

        let result = estimate(&bad);

        assert_eq!(result.unwrap_err().field(), InputField::TaxYear);
    }

    #[test]
    fn estimate_uses_schedule_for_the_input_year() {
        let book = two_bracket_book();
        let estimator = TaxEstimator::new(&book);
        let mut input = input(dec!(7000), dec!(0), None);
        input.tax_year = 2024;

        let result = estimator.estimate(&input).unwrap();

        // 7000 - 1000 = 6000; 250 + 1000 * 0.50 = 750
        assert_eq!(result.taxable_income, dec!(6000));
        assert_eq!(result.tax_owed, dec!(750));
        assert_eq!(result.amount_owed, dec!(750));
    }

    #[test]
    fn estimate_is_monotonic_in_gross_income() {
        let mut previous = Decimal::ZERO;
        let mut gross = Decimal::ZERO;

        while gross <= dec!(120000) {
            let result = estimate(&input(gross, dec!(0), Some(dec!(5000)))).unwrap();
            assert!(
                result.tax_owed >= previous,
                "tax decreased at gross income {gross}"
            );
            previous = result.tax_owed;
            gross += dec!(137.37);
        }
    }

    #[test]
    fn estimate_refund_and_owed_are_exclusive() {
        for withholdings in [dec!(0), dec!(1000), dec!(4288.50), dec!(9000)] {
            let result = estimate(&input(dec!(50000), withholdings, None)).unwrap();

            assert!(
                result.refund.is_zero() || result.amount_owed.is_zero(),
                "both non-zero for withholdings {withholdings}"
            );
            assert!(result.taxable_income >= Decimal::ZERO);
        }
    }

    #[test]
    fn error_message_names_field_and_reason() {
        let err = EstimateError::invalid(InputField::GrossIncome, InvalidReason::Negative(dec!(-100)));

        assert_eq!(err.to_string(), "invalid income: -100 must not be negative");
    }
}
