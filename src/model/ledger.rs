use crate::error::{Error, ErrorType, Res, Result};
use crate::model::{Amount, NewTransaction, Transaction};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// The ordered collection of all recorded transactions.
///
/// Ledger order is insertion order. A backdated transaction is appended at the end like any
/// other, and running balances accumulate in ledger order rather than by date.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    data: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps rows read from storage. The stored running balances are kept as they are; a
    /// mismatch is logged but not corrected.
    pub(crate) fn from_transactions(data: Vec<Transaction>) -> Res<Self> {
        let mut seen = HashSet::with_capacity(data.len());
        for txn in &data {
            if !seen.insert(txn.transaction_id) {
                bail!("Duplicate transaction ID {}", txn.transaction_id);
            }
        }
        check_totals(&data)?;
        let ledger = Self { data };
        if !ledger.is_balanced() {
            warn!("The stored running balances do not match the credits and debits");
        }
        Ok(ledger)
    }

    pub fn data(&self) -> &[Transaction] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, transaction_id: u64) -> Option<&Transaction> {
        self.data
            .iter()
            .find(|t| t.transaction_id == transaction_id)
    }

    /// `max(transaction_id) + 1`, or `1` for an empty ledger. IDs of deleted rows at the end of
    /// the ledger are handed out again.
    pub fn next_id(&self) -> u64 {
        self.data
            .iter()
            .map(|t| t.transaction_id)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// The running balance of the last row, or zero.
    pub fn last_balance(&self) -> Amount {
        self.data
            .last()
            .map_or(Amount::ZERO, |t| t.running_balance)
    }

    /// The running balance a row with these amounts would get if it were inserted now, or `None`
    /// if it does not fit in an amount.
    pub fn preview_balance(&self, credit: Amount, debit: Amount) -> Option<Amount> {
        self.last_balance().checked_add(credit)?.checked_sub(debit)
    }

    /// Appends a transaction, assigning it the next ID and its running balance. Negative amounts
    /// are rejected and leave the ledger unchanged.
    pub fn insert(&mut self, new: NewTransaction) -> Result<Transaction> {
        if new.credit.is_negative() {
            return Err(Error::msg(
                ErrorType::Validation,
                format!("Credit amount cannot be negative: {}", new.credit),
            ));
        }
        if new.debit.is_negative() {
            return Err(Error::msg(
                ErrorType::Validation,
                format!("Debit amount cannot be negative: {}", new.debit),
            ));
        }

        let too_large = || {
            Error::msg(
                ErrorType::Validation,
                "Amount is too large for the ledger's totals",
            )
        };
        // The totals bound every running balance and category sum.
        self.total_credit()
            .checked_add(new.credit)
            .ok_or_else(too_large)?;
        self.total_debit()
            .checked_add(new.debit)
            .ok_or_else(too_large)?;
        let running_balance = self
            .preview_balance(new.credit, new.debit)
            .ok_or_else(too_large)?;

        let txn = Transaction {
            transaction_id: self.next_id(),
            date: new.date,
            running_balance,
            credit: new.credit,
            credit_description: new.credit_description,
            debit: new.debit,
            debit_description: new.debit_description,
        };
        debug!(
            "Inserting transaction {} with balance {}",
            txn.transaction_id, txn.running_balance
        );
        self.data.push(txn.clone());
        Ok(txn)
    }

    /// Removes the transaction with `transaction_id` and recomputes every running balance.
    /// Returns the removed row.
    pub fn delete(&mut self, transaction_id: u64) -> Result<Transaction> {
        let ix = self
            .data
            .iter()
            .position(|t| t.transaction_id == transaction_id)
            .ok_or_else(|| {
                Error::msg(
                    ErrorType::NotFound,
                    format!("No entry found with Transaction ID {transaction_id}"),
                )
            })?;
        let removed = self.data.remove(ix);
        // Every row after `ix` shifts, and the stored balances before it may have been stale, so
        // the whole column is rebuilt.
        self.recompute_balances();
        debug!("Deleted transaction {transaction_id}");
        Ok(removed)
    }

    /// Rebuilds `running_balance` for every row as the cumulative credit minus debit in ledger
    /// order.
    pub fn recompute_balances(&mut self) {
        let mut balance = Amount::ZERO;
        for txn in &mut self.data {
            balance += txn.net();
            txn.running_balance = balance;
        }
    }

    /// Whether every stored running balance equals the cumulative credit minus debit.
    pub fn is_balanced(&self) -> bool {
        let mut balance = Amount::ZERO;
        self.data.iter().all(|t| {
            balance += t.net();
            t.running_balance == balance
        })
    }
}

/// Fails if the credits or the debits of `data` add up to more than an amount can hold.
fn check_totals(data: &[Transaction]) -> Res<()> {
    let mut credit = Amount::ZERO;
    let mut debit = Amount::ZERO;
    for txn in data {
        let overflow = || format!("Amounts overflow at Transaction ID {}", txn.transaction_id);
        credit = credit.checked_add(txn.credit).with_context(overflow)?;
        debit = debit.checked_add(txn.debit).with_context(overflow)?;
    }
    Ok(())
}
