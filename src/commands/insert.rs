//! Insert command handler.

use crate::args::InsertArgs;
use crate::commands::Out;
use crate::model::{NewTransaction, Transaction};
use crate::{Config, Result, Session};

/// Appends a transaction to the ledger and saves it.
///
/// The transaction ID is the next free ID and the running balance is the ledger's last balance
/// plus the credit minus the debit. The new row is returned on success.
///
/// # Errors
///
/// - `ErrorType::Validation` if the credit or debit is negative. The ledger file is not touched.
/// - `ErrorType::Io` if the ledger file cannot be written.
pub async fn insert(config: Config, args: InsertArgs) -> Result<Out<Transaction>> {
    let mut session = Session::open(config).await;
    let txn = session
        .add_transaction(NewTransaction::from(args))
        .await?;
    let message = format!(
        "Added transaction {}. The balance is now {}",
        txn.transaction_id(),
        txn.running_balance().dollars()
    );
    Ok(Out::new(message, txn))
}
