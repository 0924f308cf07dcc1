use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle of a filed return as reported by the filing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    Draft,
    Submitted,
    Processed,
    Rejected,
}

impl ReturnStatus {
    pub fn all() -> &'static [ReturnStatus] {
        &[
            ReturnStatus::Draft,
            ReturnStatus::Submitted,
            ReturnStatus::Processed,
            ReturnStatus::Rejected,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Processed => "processed",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "processed" => Some(Self::Processed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::Processed => "Processed",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ReturnStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A return as stored by the filing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReturn {
    pub id: i64,
    pub tax_year: i32,
    pub income: Decimal,
    pub withholdings: Decimal,
    #[serde(default)]
    pub deductions: Option<Decimal>,
    pub tax_owed: Decimal,
    pub refund_amount: Decimal,
    pub amount_owed: Decimal,
    pub status: ReturnStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl TaxReturn {
    /// A balance can be paid once the return has left the draft state.
    pub fn is_payable(&self) -> bool {
        self.amount_owed > Decimal::ZERO && self.status != ReturnStatus::Draft
    }

    /// Balances are due April 15 of the year after the tax year. `None` when
    /// that date is not representable.
    pub fn payment_due_date(&self) -> Option<NaiveDate> {
        self.tax_year
            .checked_add(1)
            .and_then(|year| NaiveDate::from_ymd_opt(year, 4, 15))
    }
}

/// Document posted to the filing service when the wizard is submitted.
///
/// Amounts go over the wire as JSON numbers; `deductions` is `null` when
/// the filer left it blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTaxReturn {
    pub tax_year: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub withholdings: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub deductions: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn filed_return(
        status: ReturnStatus,
        amount_owed: Decimal,
    ) -> TaxReturn {
        TaxReturn {
            id: 7,
            tax_year: 2021,
            income: dec!(50000),
            withholdings: dec!(3000),
            deductions: None,
            tax_owed: dec!(4288.50),
            refund_amount: dec!(0),
            amount_owed,
            status,
            created_at: Utc.with_ymd_and_hms(2022, 2, 1, 9, 30, 0).unwrap(),
            submitted_at: None,
        }
    }

    #[test]
    fn status_codes_round_trip_through_parse() {
        for status in ReturnStatus::all() {
            assert_eq!(ReturnStatus::parse(status.as_str()), Some(*status));
        }
    }

    #[test]
    fn status_parse_rejects_unknown_code() {
        assert_eq!(ReturnStatus::parse("archived"), None);
        assert_eq!(ReturnStatus::parse("Draft"), None);
    }

    #[test]
    fn status_display_uses_label() {
        assert_eq!(ReturnStatus::Processed.to_string(), "Processed");
    }

    #[test]
    fn submitted_return_with_balance_is_payable() {
        assert!(filed_return(ReturnStatus::Submitted, dec!(1288.50)).is_payable());
    }

    #[test]
    fn draft_return_is_not_payable() {
        assert!(!filed_return(ReturnStatus::Draft, dec!(1288.50)).is_payable());
    }

    #[test]
    fn return_without_balance_is_not_payable() {
        assert!(!filed_return(ReturnStatus::Processed, dec!(0)).is_payable());
    }

    #[test]
    fn payment_due_date_is_april_fifteenth_of_following_year() {
        let due = filed_return(ReturnStatus::Submitted, dec!(10)).payment_due_date();

        assert_eq!(due, NaiveDate::from_ymd_opt(2022, 4, 15));
    }

    #[test]
    fn payment_due_date_is_none_for_unrepresentable_year() {
        let mut tax_return = filed_return(ReturnStatus::Submitted, dec!(10));

        tax_return.tax_year = i32::MAX;
        assert_eq!(tax_return.payment_due_date(), None);

        tax_return.tax_year = i32::MIN;
        assert_eq!(tax_return.payment_due_date(), None);
    }

    #[test]
    fn tax_return_deserializes_from_service_json() {
        let json = r#"{
            "id": 3,
            "tax_year": 2022,
            "income": 64000.0,
            "withholdings": 7000.0,
            "deductions": null,
            "tax_owed": 5000.5,
            "refund_amount": 1999.5,
            "amount_owed": 0.0,
            "status": "processed",
            "created_at": "2023-03-01T10:00:00Z",
            "submitted_at": "2023-03-02T11:15:00Z"
        }"#;

        let parsed: TaxReturn = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.id, 3);
        assert_eq!(parsed.status, ReturnStatus::Processed);
        assert_eq!(parsed.tax_owed, dec!(5000.5));
        assert_eq!(parsed.refund_amount, dec!(1999.5));
        assert!(parsed.submitted_at.is_some());
    }

    #[test]
    fn tax_return_rejects_unknown_status() {
        let json = r#"{
            "id": 3, "tax_year": 2022, "income": 1, "withholdings": 1,
            "tax_owed": 1, "refund_amount": 0, "amount_owed": 0,
            "status": "archived", "created_at": "2023-03-01T10:00:00Z"
        }"#;

        assert!(serde_json::from_str::<TaxReturn>(json).is_err());
    }

    #[test]
    fn new_tax_return_serializes_amounts_as_numbers() {
        let payload = NewTaxReturn {
            tax_year: 2021,
            income: dec!(50000),
            withholdings: dec!(6000.5),
            deductions: None,
        };

        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "tax_year": 2021,
                "income": 50000.0,
                "withholdings": 6000.5,
                "deductions": null
            })
        );
    }
}
