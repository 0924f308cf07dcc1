//! Plain-text rendering of estimates and filed returns for the terminal.
//!
//! Amounts are carried unrounded and only rounded here, through
//! [`format_currency`].

use std::fmt;

use taxwiz_core::calculations::common::format_currency;
use taxwiz_core::{ReturnStatus, ReturnSummary, TaxInput, TaxResult, TaxReturn};

const LABEL_WIDTH: usize = 16;
const AMOUNT_WIDTH: usize = 14;

/// A single estimate, one labelled line per figure.
pub struct EstimateReport<'a> {
    pub input: &'a TaxInput,
    pub result: &'a TaxResult,
}

impl<'a> EstimateReport<'a> {
    pub fn new(
        input: &'a TaxInput,
        result: &'a TaxResult,
    ) -> Self {
        Self { input, result }
    }
}

fn line(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: &str,
) -> fmt::Result {
    writeln!(f, "{:<LABEL_WIDTH$}{value}", format!("{label}:"))
}

impl fmt::Display for EstimateReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let input = self.input;
        let result = self.result;

        let deduction = if result.used_standard_deduction {
            format!("{} (standard)", format_currency(result.deduction_applied))
        } else {
            format_currency(result.deduction_applied)
        };

        line(f, "Tax year", &input.tax_year.to_string())?;
        line(f, "Gross income", &format_currency(input.gross_income))?;
        line(f, "Deduction", &deduction)?;
        line(f, "Taxable income", &format_currency(result.taxable_income))?;
        line(f, "Estimated tax", &format_currency(result.tax_owed))?;
        line(f, "Withholdings", &format_currency(input.withholdings))?;

        if result.is_balance_due() {
            line(f, "Amount owed", &format_currency(result.amount_owed))
        } else if result.is_refund() {
            line(f, "Refund", &format_currency(result.refund))
        } else {
            line(f, "Balance", "no refund and nothing owed")
        }
    }
}

/// One row per estimated input, numbered from 1 in input order.
pub struct BatchReport<'a> {
    pub rows: &'a [(TaxInput, TaxResult)],
}

impl fmt::Display for BatchReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:>4}  {:>4}  {:>w$}  {:>w$}  {:>w$}  {:>w$}  {:>w$}  {:>w$}",
            "#",
            "Year",
            "Income",
            "Deduction",
            "Taxable",
            "Tax",
            "Refund",
            "Owed",
            w = AMOUNT_WIDTH
        )?;

        for (idx, (input, result)) in self.rows.iter().enumerate() {
            writeln!(
                f,
                "{:>4}  {:>4}  {:>w$}  {:>w$}  {:>w$}  {:>w$}  {:>w$}  {:>w$}",
                idx + 1,
                input.tax_year,
                format_currency(input.gross_income),
                format_currency(result.deduction_applied),
                format_currency(result.taxable_income),
                format_currency(result.tax_owed),
                format_currency(result.refund),
                format_currency(result.amount_owed),
                w = AMOUNT_WIDTH
            )?;
        }

        write!(f, "{} estimate(s)", self.rows.len())
    }
}

/// Status table of filed returns followed by dashboard totals.
pub struct ReturnsReport<'a> {
    pub returns: &'a [TaxReturn],
    pub summary: &'a ReturnSummary,
}

impl<'a> ReturnsReport<'a> {
    pub fn new(
        returns: &'a [TaxReturn],
        summary: &'a ReturnSummary,
    ) -> Self {
        Self { returns, summary }
    }

    fn status_counts(&self) -> String {
        ReturnStatus::all()
            .iter()
            .filter_map(|status| match self.summary.count(*status) {
                0 => None,
                n => Some(format!("{status} {n}")),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ReturnsReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:>6}  {:>4}  {:<10}  {:>w$}  {:>w$}  {:>w$}  Due",
            "ID",
            "Year",
            "Status",
            "Tax",
            "Refund",
            "Owed",
            w = AMOUNT_WIDTH
        )?;

        for tax_return in self.returns {
            let due = tax_return
                .payment_due_date()
                .filter(|_| tax_return.is_payable())
                .map(|date| date.format("%b %d, %Y").to_string())
                .unwrap_or_else(|| "-".to_string());

            writeln!(
                f,
                "{:>6}  {:>4}  {:<10}  {:>w$}  {:>w$}  {:>w$}  {due}",
                tax_return.id,
                tax_return.tax_year,
                tax_return.status.label(),
                format_currency(tax_return.tax_owed),
                format_currency(tax_return.refund_amount),
                format_currency(tax_return.amount_owed),
                w = AMOUNT_WIDTH
            )?;
        }

        writeln!(f)?;
        if self.summary.total() == 0 {
            line(f, "Returns", "0")?;
        } else {
            line(
                f,
                "Returns",
                &format!("{} ({})", self.summary.total(), self.status_counts()),
            )?;
        }
        line(f, "Total refund", &format_currency(self.summary.total_refund))?;
        line(f, "Total owed", &format_currency(self.summary.total_owed))?;

        let payable = if self.summary.payable_ids.is_empty() {
            "none".to_string()
        } else {
            self.summary
                .payable_ids
                .iter()
                .map(|id| format!("#{id}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "{:<LABEL_WIDTH$}{payable}", "Payable now:")
    }
}
