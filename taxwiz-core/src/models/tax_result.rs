use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a single estimate. Amounts are unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Gross income minus the applied deduction, floored at zero.
    pub taxable_income: Decimal,

    /// Liability from the marginal rate schedule.
    pub tax_owed: Decimal,

    /// Withholdings in excess of the liability.
    pub refund: Decimal,

    /// Liability not covered by withholdings.
    pub amount_owed: Decimal,

    /// The deduction actually subtracted from gross income.
    pub deduction_applied: Decimal,

    /// True when no deduction was supplied and the schedule's standard
    /// deduction was used instead.
    pub used_standard_deduction: bool,
}

impl TaxResult {
    pub fn is_refund(&self) -> bool {
        self.refund > Decimal::ZERO
    }

    pub fn is_balance_due(&self) -> bool {
        self.amount_owed > Decimal::ZERO
    }
}
