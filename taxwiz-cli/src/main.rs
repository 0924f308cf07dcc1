use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use taxwiz_cli::{app, logging};
use taxwiz_core::{CardDetails, WizardForm};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Federal income tax estimator for individual filers.
///
/// Estimates liability from a marginal rate schedule and reports the
/// refund or balance due against withholdings.
#[derive(Debug, Parser)]
#[command(name = "taxwiz", version)]
struct Cli {
    /// TOML file with per-year tax schedules. Uses the built-in 2021
    /// single-filer schedule when omitted.
    #[arg(long, global = true)]
    schedules: Option<PathBuf>,

    /// Log filter directive (e.g. `debug`, `taxwiz_core=trace`).
    /// Overrides `RUST_LOG`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Amounts are taken as typed: `50000`, `50,000.00` and `$50,000` are all
/// accepted.
#[derive(Debug, Args)]
struct ReturnArgs {
    /// Tax year; defaults to last calendar year.
    #[arg(long)]
    year: Option<i32>,

    /// Total income for the year.
    #[arg(long, allow_hyphen_values = true)]
    income: String,

    /// Federal tax already withheld.
    #[arg(long, allow_hyphen_values = true)]
    withholdings: String,

    /// Itemized deductions; the standard deduction applies when omitted.
    #[arg(long, allow_hyphen_values = true)]
    deductions: Option<String>,
}

impl ReturnArgs {
    fn into_form(self) -> WizardForm {
        app::form_from_args(
            self.year,
            &self.income,
            &self.withholdings,
            self.deductions.as_deref(),
        )
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate tax owed and the refund or balance due.
    Estimate {
        #[command(flatten)]
        args: ReturnArgs,

        /// Print the estimate as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Estimate every row of a CSV file
    /// (`tax_year,income,withholdings[,deductions]`).
    Batch {
        #[arg(long)]
        file: PathBuf,
    },

    /// Print the JSON document submitted to the filing service.
    Payload {
        #[command(flatten)]
        args: ReturnArgs,
    },

    /// Summarize a JSON list of filed returns.
    Returns {
        #[arg(long)]
        file: PathBuf,
    },

    /// Check card details and print the payment request for a return.
    Pay {
        /// JSON list of filed returns.
        #[arg(long)]
        file: PathBuf,

        /// Id of the return to pay.
        #[arg(long)]
        id: i64,

        #[command(flatten)]
        card: CardArgs,
    },
}

/// Card fields are only checked for shape; nothing is charged or stored.
#[derive(Debug, Args)]
struct CardArgs {
    /// Name on the card.
    #[arg(long = "name", default_value = "")]
    cardholder_name: String,

    /// 12 to 19 digits; spaces between groups are allowed.
    #[arg(long, default_value = "")]
    card_number: String,

    /// Expiry as MM/YY.
    #[arg(long, default_value = "")]
    expiry: String,

    #[arg(long, default_value = "")]
    cvv: String,
}

impl From<CardArgs> for CardDetails {
    fn from(args: CardArgs) -> Self {
        Self {
            cardholder_name: args.cardholder_name,
            card_number: args.card_number,
            expiry: args.expiry,
            cvv: args.cvv,
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref())?;

    let output = match cli.command {
        Command::Estimate { args, json } => {
            let schedules = app::load_schedules(cli.schedules.as_deref())?;
            app::estimate_command(&schedules, args.into_form(), json)?
        }
        Command::Batch { file } => {
            let schedules = app::load_schedules(cli.schedules.as_deref())?;
            app::batch_command(&schedules, &file)?
        }
        Command::Payload { args } => app::payload_command(args.into_form())?,
        Command::Returns { file } => app::returns_command(&file)?,
        Command::Pay { file, id, card } => app::pay_command(&file, id, &card.into())?,
    };

    println!("{output}");
    Ok(())
}
