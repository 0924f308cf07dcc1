mod payment;
mod tax_bracket;
mod tax_input;
mod tax_result;
mod tax_return;
mod tax_schedule;

pub use payment::{CardDetails, PaymentError, PaymentRequest};
pub use tax_bracket::TaxBracket;
pub use tax_input::{PLAUSIBLE_TAX_YEARS, TaxInput};
pub use tax_result::TaxResult;
pub use tax_return::{NewTaxReturn, ReturnStatus, TaxReturn};
pub use tax_schedule::TaxSchedule;
