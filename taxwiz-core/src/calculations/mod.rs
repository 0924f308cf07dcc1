//! Tax liability calculations.
//!
//! [`estimator`] turns a [`TaxInput`](crate::TaxInput) into a
//! [`TaxResult`](crate::TaxResult) using a configured marginal rate
//! schedule; [`common`] holds the rounding and formatting helpers used when
//! results are presented.

pub mod common;
pub mod estimator;

pub use estimator::{EstimateError, InputField, InvalidReason, TaxEstimator, estimate};
