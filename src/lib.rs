//! A personal finance ledger kept in a CSV spreadsheet: record credits and debits with running
//! balances, summarize spending by category, and track spending against a goal.

pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
pub mod goal;
pub mod model;
mod session;
mod store;
#[cfg(test)]
mod test;
mod utils;

pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use session::{Session, Summary, RECENT_ROWS};
pub use store::LedgerStore;
