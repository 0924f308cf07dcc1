use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ReturnStatus, TaxReturn};

static EXPIRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("valid expiry pattern"));
static CVV_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("valid cvv pattern"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("return {id} has no balance due")]
    NothingOwed { id: i64 },

    #[error("return {id} is still a draft and cannot be paid")]
    DraftReturn { id: i64 },
}

/// Payment posted to the filing service for a single return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub tax_return_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl PaymentRequest {
    /// Builds a request for the full balance of `tax_return`.
    pub fn for_return(tax_return: &TaxReturn) -> Result<Self, PaymentError> {
        if tax_return.status == ReturnStatus::Draft {
            return Err(PaymentError::DraftReturn { id: tax_return.id });
        }
        if tax_return.amount_owed <= Decimal::ZERO {
            return Err(PaymentError::NothingOwed { id: tax_return.id });
        }

        Ok(Self {
            tax_return_id: tax_return.id,
            amount: tax_return.amount_owed,
        })
    }
}

/// Card fields collected by the (mock) payment form. Nothing here is
/// charged or stored; the values are only checked for shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    /// Validates every field and returns all problems at once.
    ///
    /// Rules:
    /// - every field is required
    /// - card number is 12 to 19 digits, spaces allowed between groups
    /// - expiry is `MM/YY`
    /// - CVV is 3 or 4 digits
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.cardholder_name.trim().is_empty() {
            errors.push("Cardholder name is required.".to_string());
        }

        let number = self.card_number.trim();
        if number.is_empty() {
            errors.push("Card number is required.".to_string());
        } else {
            let digits: String = number.chars().filter(|c| *c != ' ').collect();
            if !digits.chars().all(|c| c.is_ascii_digit()) || !(12..=19).contains(&digits.len())
            {
                errors.push("Card number must be 12 to 19 digits.".to_string());
            }
        }

        let expiry = self.expiry.trim();
        if expiry.is_empty() {
            errors.push("Expiry date is required.".to_string());
        } else if !EXPIRY_PATTERN.is_match(expiry) {
            errors.push("Expiry date must be MM/YY.".to_string());
        }

        let cvv = self.cvv.trim();
        if cvv.is_empty() {
            errors.push("CVV is required.".to_string());
        } else if !CVV_PATTERN.is_match(cvv) {
            errors.push("CVV must be 3 or 4 digits.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
