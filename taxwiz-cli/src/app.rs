//! Command implementations behind the `taxwiz` binary.
//!
//! Each command returns the text to print so that `main` stays a thin
//! dispatcher and the commands can be tested without capturing stdout.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::Serialize;
use tracing::{debug, info};

use taxwiz_core::{
    CardDetails, PaymentRequest, ReturnSummary, ScheduleBook, TaxEstimator, TaxInput, TaxResult,
    TaxReturn, TaxWizard, WizardError, WizardForm,
};

use crate::csv_loader;
use crate::report::{BatchReport, EstimateReport, ReturnsReport};

/// Loads per-year schedules from `path`, or the built-in 2021 schedule
/// when no file is given.
pub fn load_schedules(path: Option<&Path>) -> Result<ScheduleBook> {
    match path {
        Some(path) => {
            let book = ScheduleBook::from_file(path)
                .with_context(|| format!("failed to load schedules from {}", path.display()))?;
            info!(path = %path.display(), years = ?book.years(), "loaded tax schedules");
            Ok(book)
        }
        None => {
            debug!("no schedule file given, using built-in schedule");
            Ok(ScheduleBook::builtin())
        }
    }
}

/// The year filers are most likely preparing: the one before today's.
pub fn default_tax_year() -> i32 {
    Local::now().year() - 1
}

/// Builds the wizard form from command-line text. A missing year means
/// [`default_tax_year`]; missing deductions stay blank.
pub fn form_from_args(
    year: Option<i32>,
    income: &str,
    withholdings: &str,
    deductions: Option<&str>,
) -> WizardForm {
    WizardForm {
        tax_year: year.unwrap_or_else(default_tax_year).to_string(),
        income: income.to_string(),
        withholdings: withholdings.to_string(),
        deductions: deductions.unwrap_or_default().to_string(),
    }
}

/// Steps the wizard through to review, stopping at the first step that
/// refuses to advance.
fn walk_to_review(wizard: &mut TaxWizard) -> Result<(), WizardError> {
    while !wizard.is_last_step() {
        let step = wizard.next()?;
        debug!(%step, progress = wizard.progress_percent(), "wizard advanced");
    }
    Ok(())
}

#[derive(Serialize)]
struct EstimateOutput<'a> {
    input: &'a TaxInput,
    result: &'a TaxResult,
}

/// Runs the wizard over `form` and renders the estimate, as a report or as
/// pretty-printed JSON.
pub fn estimate_command(
    schedules: &ScheduleBook,
    form: WizardForm,
    json: bool,
) -> Result<String> {
    let mut wizard = TaxWizard::with_form(form);
    walk_to_review(&mut wizard)?;
    let review = wizard.review(schedules)?;

    if json {
        let output = EstimateOutput {
            input: &review.input,
            result: &review.result,
        };
        return serde_json::to_string_pretty(&output).context("failed to serialize estimate");
    }

    Ok(EstimateReport::new(&review.input, &review.result).to_string())
}

/// Renders the JSON document the wizard would submit for `form`.
pub fn payload_command(form: WizardForm) -> Result<String> {
    let mut wizard = TaxWizard::with_form(form);
    walk_to_review(&mut wizard)?;
    let submission = wizard.submission()?;

    serde_json::to_string_pretty(&submission).context("failed to serialize submission")
}

/// Estimates every row of a batch CSV file, in file order.
pub fn batch_command(
    schedules: &ScheduleBook,
    path: &Path,
) -> Result<String> {
    let inputs = csv_loader::load_from_file(path)
        .with_context(|| format!("failed to load batch input from {}", path.display()))?;
    info!(rows = inputs.len(), "loaded batch input");

    let estimator = TaxEstimator::new(schedules);
    let rows = inputs
        .into_iter()
        .enumerate()
        .map(|(idx, input)| {
            let result = estimator
                .estimate(&input)
                .with_context(|| format!("row {}", idx + 1))?;
            Ok((input, result))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BatchReport { rows: &rows }.to_string())
}

/// Reads a JSON array of returns as listed by the filing service.
pub fn load_returns(path: &Path) -> Result<Vec<TaxReturn>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse returns from {}", path.display()))
}

/// Renders the status table and dashboard totals for a returns file.
pub fn returns_command(path: &Path) -> Result<String> {
    let returns = load_returns(path)?;
    let summary = ReturnSummary::from_returns(&returns)
        .with_context(|| format!("failed to summarize returns from {}", path.display()))?;
    debug!(total = summary.total(), payable = summary.payable_ids.len(), "summarized returns");

    Ok(ReturnsReport::new(&returns, &summary).to_string())
}

/// Validates the card form and prints the payment request for return `id`
/// as JSON. Nothing is charged.
pub fn pay_command(
    path: &Path,
    id: i64,
    card: &CardDetails,
) -> Result<String> {
    let returns = load_returns(path)?;
    let tax_return = returns
        .iter()
        .find(|tax_return| tax_return.id == id)
        .with_context(|| format!("no return with id {id} in {}", path.display()))?;

    if let Err(errors) = card.validate() {
        anyhow::bail!("card details are invalid: {}", errors.join(" "));
    }

    let request = PaymentRequest::for_return(tax_return)?;
    info!(id, amount = %request.amount, "built payment request");

    serde_json::to_string_pretty(&request).context("failed to serialize payment request")
}
