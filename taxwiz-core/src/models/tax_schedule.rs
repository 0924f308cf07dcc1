use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ScheduleError;
use crate::models::{PLAUSIBLE_TAX_YEARS, TaxBracket};

/// Standard deduction and marginal rate brackets for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSchedule {
    pub tax_year: i32,
    pub standard_deduction: Decimal,
    pub brackets: Vec<TaxBracket>,
}

impl TaxSchedule {
    /// Returns the bracket that taxes `taxable_income`, or `None` when the
    /// income is zero (or the schedule has not been validated).
    pub fn bracket_for(
        &self,
        taxable_income: Decimal,
    ) -> Option<&TaxBracket> {
        self.brackets.iter().find(|b| b.contains(taxable_income))
    }

    /// Checks that the brackets form one contiguous, gap-free ladder
    /// starting at zero and ending unbounded, and that each bracket's base
    /// tax equals the tax owed at the top of the bracket below it.
    ///
    /// # Errors
    ///
    /// The first [`ScheduleError`] encountered, in bracket order.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        let tax_year = self.tax_year;

        if !PLAUSIBLE_TAX_YEARS.contains(&tax_year) {
            return Err(ScheduleError::YearOutOfRange(tax_year));
        }
        if self.standard_deduction < Decimal::ZERO {
            return Err(ScheduleError::NegativeAmount {
                tax_year,
                field: "standard_deduction",
                value: self.standard_deduction,
            });
        }

        let Some(first) = self.brackets.first() else {
            return Err(ScheduleError::NoBrackets { tax_year });
        };
        if !first.min_income.is_zero() {
            return Err(ScheduleError::FirstBracketNotZero {
                tax_year,
                found: first.min_income,
            });
        }

        let last_index = self.brackets.len() - 1;
        let mut previous: Option<&TaxBracket> = None;

        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
                return Err(ScheduleError::RateOutOfRange {
                    tax_year,
                    index,
                    rate: bracket.tax_rate,
                });
            }
            if bracket.base_tax < Decimal::ZERO {
                return Err(ScheduleError::NegativeAmount {
                    tax_year,
                    field: "base_tax",
                    value: bracket.base_tax,
                });
            }

            match bracket.max_income {
                Some(max) if max <= bracket.min_income => {
                    return Err(ScheduleError::EmptyRange {
                        tax_year,
                        index,
                        min: bracket.min_income,
                        max,
                    });
                }
                Some(_) if index == last_index => {
                    return Err(ScheduleError::LastBracketBounded { tax_year });
                }
                None if index != last_index => {
                    return Err(ScheduleError::UnboundedNotLast { tax_year, index });
                }
                _ => {}
            }

            if let Some(prev) = previous {
                // prev.max_income is Some: an unbounded non-last bracket was rejected above
                let prev_max = prev.max_income.unwrap_or(Decimal::MAX);
                if bracket.min_income != prev_max {
                    return Err(ScheduleError::Gap {
                        tax_year,
                        index,
                        expected: prev_max,
                        found: bracket.min_income,
                    });
                }

                let expected_base = prev.tax_on(prev_max);
                if bracket.base_tax != expected_base {
                    return Err(ScheduleError::InconsistentBaseTax {
                        tax_year,
                        index,
                        expected: expected_base,
                        found: bracket.base_tax,
                    });
                }
            } else if !bracket.base_tax.is_zero() {
                return Err(ScheduleError::InconsistentBaseTax {
                    tax_year,
                    index,
                    expected: Decimal::ZERO,
                    found: bracket.base_tax,
                });
            }

            previous = Some(bracket);
        }

        Ok(())
    }
}
