//! Dashboard totals over the returns a filer has on record.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{ReturnStatus, TaxReturn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummaryError {
    /// A running total left the range of [`Decimal`]. `id` is the return
    /// whose amount could not be added.
    #[error("{total} overflows at return {id}")]
    Overflow { total: &'static str, id: i64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnSummary {
    /// Number of returns in each status; statuses with no returns are absent.
    pub by_status: BTreeMap<ReturnStatus, usize>,
    pub total_refund: Decimal,
    pub total_owed: Decimal,
    /// Returns whose balance can be paid now, in input order.
    pub payable_ids: Vec<i64>,
}

impl ReturnSummary {
    /// Tallies `returns` in order.
    ///
    /// # Errors
    ///
    /// [`SummaryError::Overflow`] when the refund or owed total exceeds what
    /// a [`Decimal`] can hold.
    pub fn from_returns(returns: &[TaxReturn]) -> Result<Self, SummaryError> {
        let mut summary = Self::default();

        for tax_return in returns {
            *summary.by_status.entry(tax_return.status).or_default() += 1;
            summary.total_refund = summary
                .total_refund
                .checked_add(tax_return.refund_amount)
                .ok_or(SummaryError::Overflow {
                    total: "total refund",
                    id: tax_return.id,
                })?;
            summary.total_owed = summary
                .total_owed
                .checked_add(tax_return.amount_owed)
                .ok_or(SummaryError::Overflow {
                    total: "total owed",
                    id: tax_return.id,
                })?;
            if tax_return.is_payable() {
                summary.payable_ids.push(tax_return.id);
            }
        }

        Ok(summary)
    }

    pub fn count(
        &self,
        status: ReturnStatus,
    ) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.by_status.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn tax_return(
        id: i64,
        status: ReturnStatus,
        refund: Decimal,
        owed: Decimal,
    ) -> TaxReturn {
        TaxReturn {
            id,
            tax_year: 2022,
            income: dec!(60000),
            withholdings: dec!(5000),
            deductions: None,
            tax_owed: dec!(5000),
            refund_amount: refund,
            amount_owed: owed,
            status,
            created_at: Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap(),
            submitted_at: None,
        }
    }

    #[test]
    fn empty_list_has_zero_totals() {
        let summary = ReturnSummary::from_returns(&[]).unwrap();

        assert_eq!(summary.total(), 0);
        assert_eq!(summary.total_refund, Decimal::ZERO);
        assert!(summary.payable_ids.is_empty());
    }

    #[test]
    fn summary_counts_statuses_and_sums_amounts() {
        let returns = vec![
            tax_return(1, ReturnStatus::Draft, dec!(0), dec!(400)),
            tax_return(2, ReturnStatus::Submitted, dec!(0), dec!(250.25)),
            tax_return(3, ReturnStatus::Processed, dec!(1200.50), dec!(0)),
            tax_return(4, ReturnStatus::Processed, dec!(0), dec!(99.75)),
        ];

        let summary = ReturnSummary::from_returns(&returns).unwrap();

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.count(ReturnStatus::Draft), 1);
        assert_eq!(summary.count(ReturnStatus::Processed), 2);
        assert_eq!(summary.count(ReturnStatus::Rejected), 0);
        assert_eq!(summary.total_refund, dec!(1200.50));
        assert_eq!(summary.total_owed, dec!(750.00));
        // the draft balance is not payable yet
        assert_eq!(summary.payable_ids, vec![2, 4]);
    }

    #[test]
    fn overflowing_refund_total_is_an_error() {
        let returns = vec![
            tax_return(1, ReturnStatus::Processed, Decimal::MAX, dec!(0)),
            tax_return(2, ReturnStatus::Processed, Decimal::MAX, dec!(0)),
        ];

        assert_eq!(
            ReturnSummary::from_returns(&returns),
            Err(SummaryError::Overflow {
                total: "total refund",
                id: 2,
            })
        );
    }

    #[test]
    fn overflowing_owed_total_is_an_error() {
        let returns = vec![
            tax_return(5, ReturnStatus::Submitted, dec!(0), Decimal::MAX),
            tax_return(6, ReturnStatus::Submitted, dec!(0), dec!(1)),
        ];

        let err = ReturnSummary::from_returns(&returns).unwrap_err();

        assert_eq!(err.to_string(), "total owed overflows at return 6");
    }
}
