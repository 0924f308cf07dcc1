//! Step-by-step return preparation.
//!
//! The wizard walks the filer through four steps, holding raw form text
//! until the review step parses it into a [`TaxInput`]:
//!
//! 1. Basic information (tax year)
//! 2. Income (total income and withholdings, both required)
//! 3. Deductions (optional; blank means standard deduction)
//! 4. Review (estimate shown, return ready to submit)

use std::fmt;

use thiserror::Error;

use crate::calculations::{EstimateError, InputField, TaxEstimator};
use crate::config::ScheduleBook;
use crate::models::{NewTaxReturn, TaxInput, TaxResult};
use crate::utils::{parse_amount, parse_optional_amount, parse_tax_year};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    BasicInformation,
    Income,
    Deductions,
    Review,
}

impl WizardStep {
    pub const COUNT: u8 = 4;

    /// 1-based position of the step.
    pub fn number(&self) -> u8 {
        match self {
            Self::BasicInformation => 1,
            Self::Income => 2,
            Self::Deductions => 3,
            Self::Review => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInformation => "Basic Information",
            Self::Income => "Income Information",
            Self::Deductions => "Deductions",
            Self::Review => "Review & Submit",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::BasicInformation => Some(Self::Income),
            Self::Income => Some(Self::Deductions),
            Self::Deductions => Some(Self::Review),
            Self::Review => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            Self::BasicInformation => None,
            Self::Income => Some(Self::BasicInformation),
            Self::Deductions => Some(Self::Income),
            Self::Review => Some(Self::Deductions),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Step {} of {}: {}", self.number(), Self::COUNT, self.title())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("required fields are blank: {}", list_fields(.0))]
    MissingFields(Vec<InputField>),

    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

fn list_fields(fields: &[InputField]) -> String {
    fields
        .iter()
        .map(InputField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raw text of the wizard's form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardForm {
    pub tax_year: String,
    pub income: String,
    pub withholdings: String,
    pub deductions: String,
}

impl WizardForm {
    /// Required fields on the income step that are still blank.
    fn blank_income_fields(&self) -> Vec<InputField> {
        let mut blank = Vec::new();
        if self.income.trim().is_empty() {
            blank.push(InputField::GrossIncome);
        }
        if self.withholdings.trim().is_empty() {
            blank.push(InputField::Withholdings);
        }
        blank
    }

    /// Parses every field into a validated [`TaxInput`].
    pub fn to_input(&self) -> Result<TaxInput, EstimateError> {
        let tax_year = parse_tax_year(&self.tax_year)?;
        let gross_income = parse_amount(InputField::GrossIncome, &self.income)?;
        let withholdings = parse_amount(InputField::Withholdings, &self.withholdings)?;
        let deductions = parse_optional_amount(InputField::Deductions, &self.deductions)?;

        TaxInput::new(tax_year, gross_income, withholdings, deductions)
    }
}

/// What the review step shows: the parsed input and its estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnReview {
    pub input: TaxInput,
    pub result: TaxResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxWizard {
    step: WizardStep,
    pub form: WizardForm,
}

impl TaxWizard {
    /// Starts on the first step with `tax_year` preselected.
    pub fn new(tax_year: i32) -> Self {
        Self {
            step: WizardStep::default(),
            form: WizardForm {
                tax_year: tax_year.to_string(),
                ..Default::default()
            },
        }
    }

    /// Wraps an already filled-in form, starting on the first step.
    pub fn with_form(form: WizardForm) -> Self {
        Self {
            step: WizardStep::default(),
            form,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn step_number(&self) -> u8 {
        self.step.number()
    }

    /// Share of the wizard completed, in percent.
    pub fn progress_percent(&self) -> u16 {
        u16::from(self.step.number()) * 100 / u16::from(WizardStep::COUNT)
    }

    pub fn is_first_step(&self) -> bool {
        self.step.previous().is_none()
    }

    pub fn is_last_step(&self) -> bool {
        self.step.next().is_none()
    }

    /// Whether [`TaxWizard::next`] would move forward.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Income => self.form.blank_income_fields().is_empty(),
            WizardStep::Review => false,
            _ => true,
        }
    }

    /// Moves to the next step and returns it. Staying on the review step is
    /// not an error.
    ///
    /// # Errors
    ///
    /// [`WizardError::MissingFields`] when leaving the income step with
    /// income or withholdings blank.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        if self.step == WizardStep::Income {
            let blank = self.form.blank_income_fields();
            if !blank.is_empty() {
                return Err(WizardError::MissingFields(blank));
            }
        }

        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Moves back one step; stays put on the first step.
    pub fn previous(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Parses the form and estimates it against `schedules`.
    pub fn review(
        &self,
        schedules: &ScheduleBook,
    ) -> Result<ReturnReview, WizardError> {
        let input = self.form.to_input()?;
        let result = TaxEstimator::new(schedules).estimate(&input)?;
        Ok(ReturnReview { input, result })
    }

    /// Builds the document submitted to the filing service.
    pub fn submission(&self) -> Result<NewTaxReturn, WizardError> {
        let input = self.form.to_input()?;
        Ok(NewTaxReturn {
            tax_year: input.tax_year,
            income: input.gross_income,
            withholdings: input.withholdings,
            deductions: input.deductions,
        })
    }
}
