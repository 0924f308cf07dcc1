//! CSV loader for batch estimate input.
//!
//! ## CSV Format
//!
//! Columns are matched by header name, so order does not matter. Header
//! names are case-sensitive. Whitespace around values is trimmed.
//!
//! | Column         | Required | Type    | Notes                                   |
//! |----------------|----------|---------|-----------------------------------------|
//! | `tax_year`     | yes      | integer | e.g. `2021`                             |
//! | `income`       | yes      | decimal | gross income                            |
//! | `withholdings` | yes      | decimal | tax already withheld                    |
//! | `deductions`   | no       | decimal | leave empty to use the standard deduction |
//!
//! Amounts are read as text and parsed exactly, so a leading `$` and `,`
//! thousands separators are accepted the same way as on the command line.
//!
//! ### Example
//!
//! ```csv
//! tax_year,income,withholdings,deductions
//! 2021,50000.00,6000.00,
//! 2021,85000.00,9000.00,20000.00
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use taxwiz_core::utils::{parse_amount, parse_optional_amount};
use taxwiz_core::{EstimateError, InputField, TaxInput};

#[derive(Debug, Deserialize)]
struct CsvRow {
    tax_year: i32,
    income: String,
    withholdings: String,
    #[serde(default)]
    deductions: String,
}

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structural problems: bad header, missing required column, a tax year
    /// that is not an integer.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// The row has an amount that is not a number, a negative amount or an
    /// implausible tax year. `row` is 1-based and does not count the header.
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: EstimateError,
    },
}

fn parse_row(row: &CsvRow) -> Result<TaxInput, EstimateError> {
    let gross_income = parse_amount(InputField::GrossIncome, &row.income)?;
    let withholdings = parse_amount(InputField::Withholdings, &row.withholdings)?;
    let deductions = parse_optional_amount(InputField::Deductions, &row.deductions)?;

    TaxInput::new(row.tax_year, gross_income, withholdings, deductions)
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<TaxInput, CsvLoadError> {
    parse_row(&row).map_err(|source| CsvLoadError::InvalidRow {
        row: row_number,
        source,
    })
}

/// Parses CSV text into validated inputs, in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid, a required
///   column is missing or the tax year is not an integer.
/// * [`CsvLoadError::InvalidRow`] if a row holds a blank, non-numeric or
///   negative amount, or an implausible tax year.
pub fn load_from_str(input: &str) -> Result<Vec<TaxInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Reads a file from disk and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<TaxInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}
