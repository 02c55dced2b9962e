use crate::error::Res;
use crate::model::{Amount, Mapping};
use anyhow::{bail, Context};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single row of the ledger.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub(crate) transaction_id: u64,
    pub(crate) date: NaiveDate,
    pub(crate) credit: Amount,
    pub(crate) credit_description: String,
    pub(crate) debit: Amount,
    pub(crate) debit_description: String,
    pub(crate) running_balance: Amount,
}

impl Transaction {
    pub fn transaction_id(&self) -> u64 {
        self.transaction_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn credit(&self) -> Amount {
        self.credit
    }

    pub fn credit_description(&self) -> &str {
        &self.credit_description
    }

    pub fn debit(&self) -> Amount {
        self.debit
    }

    pub fn debit_description(&self) -> &str {
        &self.debit_description
    }

    pub fn running_balance(&self) -> Amount {
        self.running_balance
    }

    /// Credit minus debit for this row alone.
    pub fn net(&self) -> Amount {
        self.credit - self.debit
    }

    /// Parses one data row of a ledger file using the header `mapping`. Columns that are not part
    /// of the ledger are ignored.
    pub(crate) fn from_record(mapping: &Mapping, record: &csv::StringRecord) -> Res<Self> {
        let get = |column: TransactionColumn| cell(mapping, record, column);

        let id_str = get(TransactionColumn::TransactionId)?;
        let transaction_id = parse_id(id_str)
            .with_context(|| format!("Invalid transaction ID '{id_str}'"))?;

        let date_str = get(TransactionColumn::Date)?;
        let date = parse_date(date_str)?;

        let amount = |column: TransactionColumn| -> Res<Amount> {
            let s = get(column)?;
            Amount::from_str(s).with_context(|| format!("Invalid value in '{}'", column.header()))
        };
        // Credits and debits are magnitudes; only the running balance may go below zero.
        let magnitude = |column: TransactionColumn| -> Res<Amount> {
            let value = amount(column)?;
            if value.is_negative() {
                bail!("Negative value {value} in '{}'", column.header());
            }
            Ok(value)
        };

        Ok(Self {
            transaction_id,
            date,
            credit: magnitude(TransactionColumn::Credit)?,
            credit_description: get(TransactionColumn::CreditDescription)?.to_string(),
            debit: magnitude(TransactionColumn::Debit)?,
            debit_description: get(TransactionColumn::DebitDescription)?.to_string(),
            running_balance: amount(TransactionColumn::RunningBalance)?,
        })
    }

    /// The cell values of this row in the order of `TransactionColumn::ALL`.
    pub(crate) fn to_row(&self) -> [String; TRANSACTION_COL_COUNT] {
        [
            self.transaction_id.to_string(),
            self.date.format(DATE_FORMAT).to_string(),
            self.credit.to_string(),
            self.credit_description.clone(),
            self.debit.to_string(),
            self.debit_description.clone(),
            self.running_balance.to_string(),
        ]
    }
}

/// A transaction that has not yet been assigned an ID or a running balance.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewTransaction {
    pub date: NaiveDate,
    #[serde(default)]
    pub credit: Amount,
    #[serde(default)]
    pub credit_description: String,
    #[serde(default)]
    pub debit: Amount,
    #[serde(default)]
    pub debit_description: String,
}

impl NewTransaction {
    pub fn credit(date: NaiveDate, amount: impl Into<Amount>, description: &str) -> Self {
        Self {
            date,
            credit: amount.into(),
            credit_description: description.to_string(),
            debit: Amount::ZERO,
            debit_description: String::new(),
        }
    }

    pub fn debit(date: NaiveDate, amount: impl Into<Amount>, description: &str) -> Self {
        Self {
            date,
            credit: Amount::ZERO,
            credit_description: String::new(),
            debit: amount.into(),
            debit_description: description.to_string(),
        }
    }
}

/// The columns of a ledger file.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionColumn {
    TransactionId,
    Date,
    Credit,
    CreditDescription,
    Debit,
    DebitDescription,
    RunningBalance,
}

serde_plain::derive_display_from_serialize!(TransactionColumn);
serde_plain::derive_fromstr_from_deserialize!(TransactionColumn);

impl TransactionColumn {
    /// Every column, in the order they are written to a ledger file.
    pub const ALL: [TransactionColumn; TRANSACTION_COL_COUNT] = [
        TransactionColumn::TransactionId,
        TransactionColumn::Date,
        TransactionColumn::Credit,
        TransactionColumn::CreditDescription,
        TransactionColumn::Debit,
        TransactionColumn::DebitDescription,
        TransactionColumn::RunningBalance,
    ];

    /// The header text used for this column in a ledger file.
    pub fn header(&self) -> &'static str {
        match self {
            TransactionColumn::TransactionId => TRANSACTION_ID_STR,
            TransactionColumn::Date => DATE_STR,
            TransactionColumn::Credit => CREDIT_STR,
            TransactionColumn::CreditDescription => CREDIT_DESCRIPTION_STR,
            TransactionColumn::Debit => DEBIT_STR,
            TransactionColumn::DebitDescription => DEBIT_DESCRIPTION_STR,
            TransactionColumn::RunningBalance => RUNNING_BALANCE_STR,
        }
    }

    pub fn from_header(header: impl AsRef<str>) -> Res<TransactionColumn> {
        let header = header.as_ref().trim();
        match TransactionColumn::ALL.into_iter().find(|c| c.header() == header) {
            Some(column) => Ok(column),
            None => bail!("Invalid transaction column name '{header}'"),
        }
    }
}

pub(crate) const TRANSACTION_ID_STR: &str = "Transaction_ID";
pub(crate) const DATE_STR: &str = "Transaction_Date";
pub(crate) const CREDIT_STR: &str = "Credit";
pub(crate) const CREDIT_DESCRIPTION_STR: &str = "Credit_Description";
pub(crate) const DEBIT_STR: &str = "Debit";
pub(crate) const DEBIT_DESCRIPTION_STR: &str = "Debit_Description";
pub(crate) const RUNNING_BALANCE_STR: &str = "Total_Balance";

pub(crate) const TRANSACTION_COL_COUNT: usize = 7;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn cell<'a>(
    mapping: &Mapping,
    record: &'a csv::StringRecord,
    column: TransactionColumn,
) -> Res<&'a str> {
    let ix = mapping
        .index(column)
        .with_context(|| format!("The '{}' column is missing", column.header()))?;
    Ok(record.get(ix).unwrap_or_default().trim())
}

/// Spreadsheet programs sometimes write whole numbers as `3.0`.
fn parse_id(s: &str) -> Res<u64> {
    let digits = s.strip_suffix(".0").unwrap_or(s);
    let id: u64 = digits.parse()?;
    if id == 0 {
        bail!("Transaction IDs start at 1");
    }
    Ok(id)
}

/// Accepts a plain date or a timestamp, in which case the time is dropped.
pub(crate) fn parse_date(s: &str) -> Res<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(timestamp.date());
        }
    }
    NaiveDate::parse_from_str(s, "%m/%d/%Y").with_context(|| format!("Invalid date '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> Mapping {
        Mapping::new(TransactionColumn::ALL.iter().map(|c| c.header())).unwrap()
    }

    fn record(cells: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(cells.to_vec())
    }

    #[test]
    fn test_from_record() {
        let r = record(&["3", "2025-02-01", "$1,000.00", "Salary", "", "", "1000"]);
        let txn = Transaction::from_record(&mapping(), &r).unwrap();
        assert_eq!(txn.transaction_id(), 3);
        assert_eq!(txn.date(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(txn.credit(), Amount::from(1000));
        assert_eq!(txn.credit_description(), "Salary");
        assert_eq!(txn.debit(), Amount::ZERO);
        assert_eq!(txn.running_balance(), Amount::from(1000));
        assert_eq!(txn.net(), Amount::from(1000));
    }

    #[test]
    fn test_from_record_timestamp_and_float_id() {
        let r = record(&["7.0", "2025-02-01 00:00:00", "0", "", "12.5", "Food", "-12.5"]);
        let txn = Transaction::from_record(&mapping(), &r).unwrap();
        assert_eq!(txn.transaction_id(), 7);
        assert_eq!(txn.date(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    }

    #[test]
    fn test_from_record_bad_id() {
        let r = record(&["abc", "2025-02-01", "0", "", "0", "", "0"]);
        let err = Transaction::from_record(&mapping(), &r).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid transaction ID 'abc'"));

        let r = record(&["0", "2025-02-01", "0", "", "0", "", "0"]);
        assert!(Transaction::from_record(&mapping(), &r).is_err());
    }

    #[test]
    fn test_from_record_bad_amount() {
        let r = record(&["1", "2025-02-01", "lots", "", "0", "", "0"]);
        let err = Transaction::from_record(&mapping(), &r).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid value in 'Credit'"));
    }

    #[test]
    fn test_from_record_negative_amount() {
        let r = record(&["1", "2025-02-01", "0", "", "-40", "Food", "40"]);
        let err = Transaction::from_record(&mapping(), &r).unwrap_err();
        assert!(format!("{err:#}").contains("Negative value -40 in 'Debit'"));

        let r = record(&["1", "2025-02-01", "-5", "Refund", "0", "", "-5"]);
        let err = Transaction::from_record(&mapping(), &r).unwrap_err();
        assert!(format!("{err:#}").contains("in 'Credit'"));

        // A negative running balance is an overdrawn ledger, not bad data.
        let r = record(&["1", "2025-02-01", "0", "", "40", "Food", "-40"]);
        assert!(Transaction::from_record(&mapping(), &r).is_ok());
    }

    #[test]
    fn test_to_row_order() {
        let r = record(&["2", "2025-02-03", "0", "", "30", "Rent", "-30"]);
        let txn = Transaction::from_record(&mapping(), &r).unwrap();
        assert_eq!(
            txn.to_row(),
            ["2", "2025-02-03", "0", "", "30", "Rent", "-30"].map(String::from)
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(parse_date("2024-12-31").unwrap(), expected);
        assert_eq!(parse_date("2024-12-31T08:15:00").unwrap(), expected);
        assert_eq!(parse_date("12/31/2024").unwrap(), expected);
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_column_headers() {
        for column in TransactionColumn::ALL {
            assert_eq!(
                TransactionColumn::from_header(column.header()).unwrap(),
                column
            );
        }
        assert!(TransactionColumn::from_header("Amount").is_err());
        assert_eq!(TransactionColumn::RunningBalance.to_string(), "running_balance");
    }
}
