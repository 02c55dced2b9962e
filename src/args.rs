//! These structs provide the CLI interface for the money CLI.

use crate::commands::OutputFormat;
use crate::model::{parse_date, Amount, NewTransaction};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// money: A command-line tool for keeping a personal ledger of credits and debits.
///
/// Every credit and debit is a row in a spreadsheet ledger file with a running balance. The
/// program can add and delete rows, summarize spending by category, show credit and debit over
/// time, and warn you as your spending approaches a target limit.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and its configuration file.
    ///
    /// This is the first command you should run. By default the data directory is $HOME/money;
    /// pass --money-home to put it somewhere else. An empty ledger file is created unless the
    /// ledger named with --ledger already exists.
    Init(InitArgs),
    /// Add a credit, a debit, or both to the end of the ledger.
    Insert(InsertArgs),
    /// Delete a transaction by its ID and recompute the running balances.
    Delete(DeleteArgs),
    /// Print every transaction in the ledger.
    List(ListArgs),
    /// Show totals, spending by category, recent credits and debits, and goal progress.
    Summary(SummaryArgs),
    /// Show credit and debit totals per day.
    Trend,
    /// Show or set the target spending limit.
    Goal(GoalArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the config file and backups are held. Defaults to ~/money
    #[arg(long, env = "MONEY_HOME", default_value_t = default_money_home())]
    money_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, money_home: PathBuf) -> Self {
        Self {
            log_level,
            money_home: money_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn money_home(&self) -> &DisplayPath {
        &self.money_home
    }
}

/// (Not shown): Args for the `money init` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct InitArgs {
    /// The ledger file to use. Relative paths are taken from the money home directory. Defaults
    /// to ledger.csv in the money home directory.
    #[arg(long)]
    ledger: Option<PathBuf>,
}

impl InitArgs {
    pub fn new(ledger: Option<PathBuf>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> Option<&Path> {
        self.ledger.as_deref()
    }
}

/// (Not shown): Args for the `money insert` command.
#[derive(Debug, Parser, Clone)]
pub struct InsertArgs {
    /// The date of the transaction, e.g. 2025-05-01
    #[arg(long, value_parser = parse_date_arg)]
    pub date: NaiveDate,

    /// Money received. Amounts may include a dollar sign and thousands separators.
    #[arg(long, default_value_t = Amount::ZERO, allow_negative_numbers = true)]
    pub credit: Amount,

    /// Where the money came from.
    #[arg(long, default_value = "")]
    pub credit_description: String,

    /// Money spent.
    #[arg(long, default_value_t = Amount::ZERO, allow_negative_numbers = true)]
    pub debit: Amount,

    /// What the money was spent on. Spending is grouped by this label.
    #[arg(long, default_value = "")]
    pub debit_description: String,
}

impl From<InsertArgs> for NewTransaction {
    fn from(args: InsertArgs) -> Self {
        NewTransaction {
            date: args.date,
            credit: args.credit,
            credit_description: args.credit_description,
            debit: args.debit,
            debit_description: args.debit_description,
        }
    }
}

/// (Not shown): Args for the `money delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The ID of the transaction to delete.
    transaction_id: u64,
}

impl DeleteArgs {
    pub fn new(transaction_id: u64) -> Self {
        Self { transaction_id }
    }

    pub fn transaction_id(&self) -> u64 {
        self.transaction_id
    }
}

/// (Not shown): Args for the `money list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// How to print the rows.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl ListArgs {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// (Not shown): Args for the `money summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// How many of the most recent credits and debits to show.
    #[arg(long, default_value_t = crate::session::RECENT_ROWS)]
    recent: usize,
}

impl SummaryArgs {
    pub fn new(recent: usize) -> Self {
        Self { recent }
    }

    pub fn recent(&self) -> usize {
        self.recent
    }
}

/// (Not shown): Args for the `money goal` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct GoalArgs {
    /// The new spending limit. Zero clears the goal. Without this the current goal is shown.
    #[arg(long, allow_negative_numbers = true)]
    set: Option<Amount>,
}

impl GoalArgs {
    pub fn new(set: Option<Amount>) -> Self {
        Self { set }
    }

    pub fn set(&self) -> Option<Amount> {
        self.set
    }
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| format!("{e:#}"))
}

fn default_money_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("money"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --money-home or MONEY_HOME instead of relying on the default \
                money home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("money")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
