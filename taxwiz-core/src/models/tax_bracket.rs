use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal rate band of a schedule.
///
/// The band covers `(min_income, max_income]`; a `max_income` of `None`
/// means the band is unbounded above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    #[serde(default)]
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    /// Total tax owed on all income up to `min_income`.
    pub base_tax: Decimal,
}

impl TaxBracket {
    /// True when `taxable_income` falls inside this band.
    pub fn contains(
        &self,
        taxable_income: Decimal,
    ) -> bool {
        taxable_income > self.min_income
            && self
                .max_income
                .is_none_or(|ceiling| taxable_income <= ceiling)
    }

    /// Tax owed on `taxable_income`, assuming it falls inside this band.
    pub fn tax_on(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        self.base_tax + (taxable_income - self.min_income) * self.tax_rate
    }
}
