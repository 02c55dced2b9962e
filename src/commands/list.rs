//! The list command renders every ledger row as JSON, a Markdown table, or CSV.

use crate::args::ListArgs;
use crate::commands::{Out, OutputFormat, Rows};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Ledger, TransactionColumn};
use crate::store;
use crate::{Config, Result};
use anyhow::Context;

/// Loads the ledger and renders its rows in the requested format. The `Rows` value is returned
/// as the structure so that the caller can print it.
///
/// # Errors
///
/// - `ErrorType::NotFound` if the ledger file does not exist.
/// - `ErrorType::Schema` if the ledger file cannot be parsed.
pub async fn list(config: Config, args: ListArgs) -> Result<Out<Rows>> {
    let ledger = config.store().load().await?;
    let rows = match args.format() {
        OutputFormat::Json => Rows::Json(
            serde_json::to_value(&ledger)
                .context("Unable to serialize the ledger")
                .pub_result(ErrorType::Io)?,
        ),
        OutputFormat::Table => Rows::Table(markdown_table(&ledger)),
        OutputFormat::Csv => {
            let bytes = store::to_csv(&ledger).pub_result(ErrorType::Io)?;
            Rows::Csv(String::from_utf8_lossy(&bytes).into_owned())
        }
    };
    Ok(Out::new(
        format!("The ledger has {} transactions", ledger.len()),
        rows,
    ))
}

fn markdown_table(ledger: &Ledger) -> String {
    let headers: Vec<&str> = TransactionColumn::ALL.iter().map(|c| c.header()).collect();
    let mut lines = Vec::with_capacity(ledger.len() + 2);
    lines.push(format!("| {} |", headers.join(" | ")));
    lines.push(format!("|{}", "---|".repeat(headers.len())));
    for txn in ledger.data() {
        let cells: Vec<String> = txn.to_row().iter().map(|c| c.replace('|', "\\|")).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    const LEDGER: &str = "Transaction_ID,Transaction_Date,Credit,Credit_Description,Debit,\
                          Debit_Description,Total_Balance\n\
                          1,2025-05-01,100,Salary,0,,100\n\
                          2,2025-05-02,0,,30,Food|Drink,70\n";

    #[tokio::test]
    async fn test_list_table() {
        let env = TestEnv::new().await;
        env.write_ledger(LEDGER).await;
        let out = list(env.config(), ListArgs::new(OutputFormat::Table))
            .await
            .unwrap();
        let table = out.structure().unwrap().to_string();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("| Transaction_ID | Transaction_Date |"));
        assert_eq!(lines[1], "|---|---|---|---|---|---|---|");
        assert_eq!(lines[3], "| 2 | 2025-05-02 | 0 |  | 30 | Food\\|Drink | 70 |");
        assert_eq!(out.message(), "The ledger has 2 transactions");
    }

    #[tokio::test]
    async fn test_list_csv_matches_file() {
        let env = TestEnv::new().await;
        env.write_ledger(LEDGER).await;
        let out = list(env.config(), ListArgs::new(OutputFormat::Csv))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().to_string(), LEDGER);
    }

    #[tokio::test]
    async fn test_list_json() {
        let env = TestEnv::new().await;
        env.write_ledger(LEDGER).await;
        let out = list(env.config(), ListArgs::new(OutputFormat::Json))
            .await
            .unwrap();
        let Rows::Json(value) = out.structure().unwrap() else {
            panic!("expected json rows");
        };
        assert_eq!(value[0]["credit_description"], "Salary");
        assert_eq!(value[1]["running_balance"], "70");
    }

    #[tokio::test]
    async fn test_list_missing_ledger() {
        let env = TestEnv::new().await;
        let err = list(env.config(), ListArgs::default()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
    }
}
