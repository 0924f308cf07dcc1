//! Marginal rate schedules, keyed by tax year.
//!
//! The built-in book carries a single schedule: the 2021 single-filer
//! standard deduction and the first three federal brackets. Further years
//! are supplied as TOML:
//!
//! ```toml
//! [[schedule]]
//! tax_year = 2022
//! standard_deduction = "12950"
//!
//! [[schedule.brackets]]
//! min_income = "0"
//! max_income = "10275"
//! tax_rate = "0.10"
//! base_tax = "0"
//!
//! [[schedule.brackets]]
//! min_income = "10275"
//! tax_rate = "0.12"
//! base_tax = "1027.50"
//! ```
//!
//! Amounts may be written as strings or bare numbers; strings keep every
//! digit exactly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{TaxBracket, TaxSchedule};

/// Year the built-in constants were published for.
pub const DEFAULT_TAX_YEAR: i32 = 2021;
pub const STANDARD_DEDUCTION: Decimal = dec!(12550);

pub const BRACKET_1_CEILING: Decimal = dec!(10275);
pub const BRACKET_1_RATE: Decimal = dec!(0.10);

pub const BRACKET_2_CEILING: Decimal = dec!(41775);
pub const BRACKET_2_RATE: Decimal = dec!(0.12);
/// Tax owed on income up to [`BRACKET_1_CEILING`].
pub const BRACKET_1_TAX: Decimal = dec!(1027.50);

pub const BRACKET_3_RATE: Decimal = dec!(0.22);
/// Tax owed on income up to [`BRACKET_2_CEILING`].
pub const BRACKET_2_TAX: Decimal = dec!(4807.50);

static BUILTIN: LazyLock<ScheduleBook> = LazyLock::new(ScheduleBook::builtin);

/// Errors raised while loading or validating schedules.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("cannot read schedule file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schedule TOML is invalid: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("no schedules defined")]
    Empty,

    #[error("tax year {0} is defined more than once")]
    DuplicateYear(i32),

    #[error("{0} is not a plausible tax year")]
    YearOutOfRange(i32),

    #[error("schedule {tax_year} has no brackets")]
    NoBrackets { tax_year: i32 },

    #[error("schedule {tax_year}: first bracket must start at 0, found {found}")]
    FirstBracketNotZero { tax_year: i32, found: Decimal },

    #[error("schedule {tax_year}: bracket {index} starts at {found}, expected {expected}")]
    Gap {
        tax_year: i32,
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("schedule {tax_year}: bracket {index} is unbounded but is not the last bracket")]
    UnboundedNotLast { tax_year: i32, index: usize },

    #[error("schedule {tax_year}: last bracket must have no max_income")]
    LastBracketBounded { tax_year: i32 },

    #[error("schedule {tax_year}: bracket {index} max_income {max} is not above min_income {min}")]
    EmptyRange {
        tax_year: i32,
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("schedule {tax_year}: bracket {index} rate {rate} is outside 0..=1")]
    RateOutOfRange {
        tax_year: i32,
        index: usize,
        rate: Decimal,
    },

    #[error("schedule {tax_year}: {field} must not be negative, found {value}")]
    NegativeAmount {
        tax_year: i32,
        field: &'static str,
        value: Decimal,
    },

    #[error("schedule {tax_year}: bracket {index} base_tax is {found}, expected {expected}")]
    InconsistentBaseTax {
        tax_year: i32,
        index: usize,
        expected: Decimal,
        found: Decimal,
    },
}

#[derive(Debug, Deserialize)]
struct ScheduleFile {
    #[serde(default, rename = "schedule")]
    schedules: Vec<TaxSchedule>,
}

/// The built-in schedule, assembled from the constants above.
pub fn default_schedule() -> TaxSchedule {
    TaxSchedule {
        tax_year: DEFAULT_TAX_YEAR,
        standard_deduction: STANDARD_DEDUCTION,
        brackets: vec![
            TaxBracket {
                min_income: Decimal::ZERO,
                max_income: Some(BRACKET_1_CEILING),
                tax_rate: BRACKET_1_RATE,
                base_tax: Decimal::ZERO,
            },
            TaxBracket {
                min_income: BRACKET_1_CEILING,
                max_income: Some(BRACKET_2_CEILING),
                tax_rate: BRACKET_2_RATE,
                base_tax: BRACKET_1_TAX,
            },
            TaxBracket {
                min_income: BRACKET_2_CEILING,
                max_income: None,
                tax_rate: BRACKET_3_RATE,
                base_tax: BRACKET_2_TAX,
            },
        ],
    }
}

/// Validated schedules indexed by tax year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleBook {
    schedules: BTreeMap<i32, TaxSchedule>,
    fallback: TaxSchedule,
}

impl ScheduleBook {
    /// A book holding only [`default_schedule`].
    pub fn builtin() -> Self {
        let fallback = default_schedule();
        let mut schedules = BTreeMap::new();
        schedules.insert(fallback.tax_year, fallback.clone());
        Self {
            schedules,
            fallback,
        }
    }

    /// Shared instance of [`ScheduleBook::builtin`].
    pub fn builtin_ref() -> &'static ScheduleBook {
        &BUILTIN
    }

    /// Validates and indexes `schedules`.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::Empty`] for an empty list,
    /// [`ScheduleError::DuplicateYear`] when a year repeats, or the first
    /// validation failure of any schedule.
    pub fn new(schedules: Vec<TaxSchedule>) -> Result<Self, ScheduleError> {
        if schedules.is_empty() {
            return Err(ScheduleError::Empty);
        }

        let mut by_year = BTreeMap::new();
        for schedule in schedules {
            schedule.validate()?;
            let year = schedule.tax_year;
            if by_year.insert(year, schedule).is_some() {
                return Err(ScheduleError::DuplicateYear(year));
            }
        }

        Ok(Self {
            schedules: by_year,
            fallback: default_schedule(),
        })
    }

    /// Parses `[[schedule]]` tables from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ScheduleError> {
        let file: ScheduleFile = toml::from_str(text)?;
        Self::new(file.schedules)
    }

    /// Reads and parses a TOML schedule file.
    pub fn from_file(path: &Path) -> Result<Self, ScheduleError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScheduleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Configured tax years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.schedules.keys().copied().collect()
    }

    /// Schedule to apply for `tax_year`.
    ///
    /// Picks the exact year when configured, otherwise the latest configured
    /// year before it, otherwise the built-in default schedule.
    pub fn schedule_for(
        &self,
        tax_year: i32,
    ) -> &TaxSchedule {
        if let Some(schedule) = self.schedules.get(&tax_year) {
            return schedule;
        }

        match self.schedules.range(..tax_year).next_back() {
            Some((year, schedule)) => {
                debug!(tax_year, using = *year, "no schedule for year, using earlier one");
                schedule
            }
            None => {
                debug!(
                    tax_year,
                    using = self.fallback.tax_year,
                    "no schedule for year, using built-in default"
                );
                &self.fallback
            }
        }
    }
}

impl Default for ScheduleBook {
    fn default() -> Self {
        Self::builtin()
    }
}
