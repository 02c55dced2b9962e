//! Reading and writing the ledger file.
//!
//! The ledger is a CSV spreadsheet whose first row is the header. Headers are matched after
//! trimming whitespace and may appear in any order; extra columns are ignored. On save the file
//! is rewritten with exactly the ledger columns, in their canonical order.

use crate::error::{Error, ErrorType, IntoResult, Res, Result};
use crate::model::{Ledger, Mapping, Transaction, TransactionColumn};
use crate::utils;
use anyhow::Context;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Loads and saves a `Ledger` at a fixed path.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and validates the ledger file.
    ///
    /// # Errors
    /// - `ErrorType::NotFound` if the file does not exist.
    /// - `ErrorType::Schema` if a required column is missing or a row cannot be parsed.
    /// - `ErrorType::Io` for any other read failure.
    pub async fn load(&self) -> Result<Ledger> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::msg(
                    ErrorType::NotFound,
                    format!(
                        "File not found. Ensure the file path is correct: {}",
                        self.path.display()
                    ),
                ))
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Unable to read {}", self.path.display()))
                    .pub_result(ErrorType::Io)
            }
        };
        let ledger = parse(&bytes)
            .with_context(|| format!("Invalid ledger file {}", self.path.display()))
            .pub_result(ErrorType::Schema)?;
        debug!(
            "Loaded {} transactions from {}",
            ledger.len(),
            self.path.display()
        );
        Ok(ledger)
    }

    /// Loads the ledger, falling back to an empty one when the file is missing or invalid. The
    /// reason is logged.
    pub async fn load_or_empty(&self) -> Ledger {
        match self.load().await {
            Ok(ledger) => ledger,
            Err(e) => {
                error!("{e}");
                Ledger::default()
            }
        }
    }

    /// Overwrites the ledger file with `ledger`.
    pub async fn save(&self, ledger: &Ledger) -> Result<()> {
        let bytes = to_csv(ledger).pub_result(ErrorType::Io)?;
        utils::replace(&self.path, bytes)
            .await
            .pub_result(ErrorType::Io)?;
        debug!(
            "Saved {} transactions to {}",
            ledger.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Parses the contents of a ledger file.
pub(crate) fn parse(bytes: &[u8]) -> Res<Ledger> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers().context("Unable to read the header row")?;
    let mapping = Mapping::new(headers.iter())?;
    let missing = mapping.missing();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|c| c.header()).collect();
        anyhow::bail!(
            "Invalid file format. Missing required columns: {}",
            names.join(", ")
        );
    }
    let extra: Vec<&str> = mapping
        .headers()
        .iter()
        .map(String::as_str)
        .filter(|h| !h.is_empty() && TransactionColumn::from_header(h).is_err())
        .collect();
    if !extra.is_empty() {
        debug!("Ignoring extra columns: {}", extra.join(", "));
    }

    let mut transactions = Vec::new();
    for (ix, record) in reader.records().enumerate() {
        // Data starts on the second line of the file.
        let line = ix + 2;
        let record = record.with_context(|| format!("Unable to read row {line}"))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let txn = Transaction::from_record(&mapping, &record)
            .with_context(|| format!("Invalid data in row {line}"))?;
        transactions.push(txn);
    }
    Ledger::from_transactions(transactions)
}

/// Serializes a ledger, header row first.
pub(crate) fn to_csv(ledger: &Ledger) -> Res<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TransactionColumn::ALL.iter().map(|c| c.header()))?;
    for txn in ledger.data() {
        writer.write_record(txn.to_row())?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to flush CSV data: {}", e.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, NewTransaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const HEADER: &str = "Transaction_ID,Transaction_Date,Credit,Credit_Description,Debit,\
                          Debit_Description,Total_Balance\n";

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    #[test]
    fn test_parse() {
        let data = format!("{HEADER}1,2025-05-01,100,Salary,0,,100\n2,2025-05-02,0,,30,Food,70\n");
        let ledger = parse(data.as_bytes()).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.data()[1].debit_description(), "Food");
        assert_eq!(ledger.last_balance(), Amount::from(70));
    }

    #[test]
    fn test_parse_normalizes_headers_and_ignores_extra_columns() {
        let data = " Total_Balance , Notes ,Debit_Description,Debit,Credit_Description,Credit,\
                    Transaction_Date, Transaction_ID\n\
                    -4.5,hello,Coffee,4.50,,,2025-05-03 00:00:00,1\n";
        let ledger = parse(data.as_bytes()).unwrap();
        let txn = &ledger.data()[0];
        assert_eq!(txn.transaction_id(), 1);
        assert_eq!(txn.date(), day(3));
        assert_eq!(txn.debit().value(), rust_decimal::Decimal::new(45, 1));
        assert_eq!(txn.debit_description(), "Coffee");
    }

    #[test]
    fn test_parse_header_only() {
        assert!(parse(HEADER.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_skips_blank_rows() {
        let data = format!("{HEADER},,,,,,\n1,2025-05-01,5,Gift,0,,5\n\n");
        assert_eq!(parse(data.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_missing_columns() {
        let data = "Transaction_ID,Transaction_Date,Credit,Credit_Description,Total_Balance\n";
        let err = parse(data.as_bytes()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Missing required columns: Debit, Debit_Description"));
    }

    #[test]
    fn test_parse_bad_row_names_line() {
        let data = format!("{HEADER}1,2025-05-01,5,,0,,5\n2,not a date,5,,0,,10\n");
        let err = parse(data.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid data in row 3"));
    }

    #[test]
    fn test_parse_negative_debit_names_line() {
        let data = format!("{HEADER}1,2025-05-01,5,,0,,5
2,2025-05-02,0,,-40,Food,45
");
        let err = parse(data.as_bytes()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Invalid data in row 3"));
        assert!(msg.contains("Negative value -40 in 'Debit'"));
    }

    #[test]
    fn test_parse_overflowing_credits() {
        let max = "79228162514264337593543950335";
        let data = format!("{HEADER}1,2025-05-01,{max},,0,,{max}
2,2025-05-02,{max},,0,,0
");
        let err = parse(data.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("Amounts overflow at Transaction ID 2"));
    }

    #[test]
    fn test_to_csv() {
        let mut ledger = Ledger::new();
        ledger
            .insert(NewTransaction::credit(day(1), 100, "Salary, May"))
            .unwrap();
        let text = String::from_utf8(to_csv(&ledger).unwrap()).unwrap();
        assert_eq!(
            text,
            format!("{HEADER}1,2025-05-01,100,\"Salary, May\",0,,100\n")
        );
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path().join("ledger.csv"));
        let mut ledger = Ledger::new();
        ledger
            .insert(NewTransaction::credit(day(1), 100, "Salary"))
            .unwrap();
        ledger
            .insert(NewTransaction::debit(day(2), 30, "Food"))
            .unwrap();

        store.save(&ledger).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, ledger);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path().join("missing.csv"));
        let err = store.load().await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
        assert!(store.load_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_invalid_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");
        utils::write(&path, "Transaction_ID,Credit\n1,5\n").await.unwrap();
        let store = LedgerStore::new(&path);

        let err = store.load().await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Schema);
        assert!(err.to_string().contains("Invalid file format"));
        assert!(store.load_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_negative_amount_is_schema_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");
        let data = format!("{HEADER}1,2025-05-01,-5,Refund,0,,-5
");
        utils::write(&path, data).await.unwrap();
        let store = LedgerStore::new(&path);

        let err = store.load().await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Schema);
        assert!(store.load_or_empty().await.is_empty());
    }
}
