//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::model::Transaction;
use crate::{Config, Result, Session};

/// Deletes a transaction by ID, recomputes every running balance and saves the ledger. The
/// removed row is returned on success.
///
/// # Errors
///
/// - `ErrorType::NotFound` if no transaction has the ID. The ledger file is not touched.
/// - `ErrorType::Io` if the ledger file cannot be written.
pub async fn delete(config: Config, args: DeleteArgs) -> Result<Out<Transaction>> {
    let mut session = Session::open(config).await;
    let removed = session.delete_transaction(args.transaction_id()).await?;
    let message = format!(
        "Deleted transaction {}. The balance is now {}",
        removed.transaction_id(),
        session.ledger().last_balance().dollars()
    );
    Ok(Out::new(message, removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::test::TestEnv;
    use crate::ErrorType;

    const LEDGER: &str = "Transaction_ID,Transaction_Date,Credit,Credit_Description,Debit,\
                          Debit_Description,Total_Balance\n\
                          1,2025-05-01,100,Salary,0,,100\n\
                          2,2025-05-02,0,,30,Food,70\n\
                          3,2025-05-03,0,,20,Bus,50\n";

    #[tokio::test]
    async fn test_delete_recomputes_balances() {
        let env = TestEnv::new().await;
        env.write_ledger(LEDGER).await;

        let out = delete(env.config(), DeleteArgs::new(1)).await.unwrap();
        assert_eq!(out.structure().unwrap().credit(), Amount::from(100));
        assert!(out.message().contains("-$50.00"));

        let ledger = env.config().store().load().await.unwrap();
        let balances: Vec<Amount> = ledger.data().iter().map(|t| t.running_balance()).collect();
        assert_eq!(balances, vec![Amount::from(-30), Amount::from(-50)]);
        assert_eq!(env.backup_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_id() {
        let env = TestEnv::new().await;
        env.write_ledger(LEDGER).await;

        let err = delete(env.config(), DeleteArgs::new(9)).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
        assert!(err.to_string().contains("No entry found with Transaction ID 9"));
        assert_eq!(env.read_ledger().await, LEDGER);
    }
}
