pub mod calculations;
pub mod config;
pub mod models;
pub mod returns;
pub mod utils;
pub mod wizard;

pub use calculations::{EstimateError, InputField, InvalidReason, TaxEstimator, estimate};
pub use config::{ScheduleBook, ScheduleError};
pub use models::*;
pub use returns::{ReturnSummary, SummaryError};
pub use wizard::{ReturnReview, TaxWizard, WizardError, WizardForm, WizardStep};
