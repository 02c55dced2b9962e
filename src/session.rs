use crate::error::{ErrorType, IntoResult, Result};
use crate::goal::{Goal, Progress};
use crate::model::{Amount, Ledger, NewTransaction, RecentEntry, Side, Transaction};
use crate::store::LedgerStore;
use crate::Config;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The number of rows shown in the recent credits and debits listings by default.
pub const RECENT_ROWS: usize = 10;

/// The state of one user session: the ledger held in memory, the spending goal, and where both
/// are persisted.
///
/// Every mutation works on a copy of the ledger and only replaces the session's ledger once the
/// copy has been written to disk, so a failed insert, delete or save leaves the session as it was.
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    store: LedgerStore,
    ledger: Ledger,
}

impl Session {
    /// Loads the ledger named by `config`. A missing or invalid ledger file is logged and the
    /// session starts with an empty ledger.
    pub async fn open(config: Config) -> Self {
        let store = config.store();
        let ledger = store.load_or_empty().await;
        Self {
            config,
            store,
            ledger,
        }
    }

    /// Loads the ledger named by `config`, failing if it is missing or invalid.
    pub async fn open_strict(config: Config) -> Result<Self> {
        let store = config.store();
        let ledger = store.load().await?;
        Ok(Self {
            config,
            store,
            ledger,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn goal(&self) -> Goal {
        self.config.goal()
    }

    pub fn progress(&self) -> Option<Progress> {
        self.goal().progress(self.ledger.total_debit())
    }

    /// Inserts a transaction and saves the ledger.
    pub async fn add_transaction(&mut self, new: NewTransaction) -> Result<Transaction> {
        let mut next = self.ledger.clone();
        let txn = next.insert(new)?;
        self.persist(next).await?;
        info!(
            "Entry with Transaction ID {} added successfully!",
            txn.transaction_id()
        );
        Ok(txn)
    }

    /// Deletes a transaction, recomputes the running balances and saves the ledger.
    pub async fn delete_transaction(&mut self, transaction_id: u64) -> Result<Transaction> {
        let mut next = self.ledger.clone();
        let removed = next.delete(transaction_id)?;
        self.persist(next).await?;
        info!("Entry with Transaction ID {transaction_id} deleted successfully!");
        Ok(removed)
    }

    /// Sets the spending goal and saves it to the config file.
    pub async fn set_goal(&mut self, target: Amount) -> Result<Goal> {
        let goal = Goal::new(target)?;
        self.config
            .save_goal(goal)
            .await
            .pub_result(ErrorType::Config)?;
        info!("Target spending limit set to {}", target.dollars());
        Ok(goal)
    }

    /// Totals, the category breakdown, the last `recent` credits and debits, and goal progress.
    pub fn summary(&self, recent: usize) -> Summary {
        let total_credit = self.ledger.total_credit();
        let total_debit = self.ledger.total_debit();
        Summary {
            transactions: self.ledger.len(),
            total_credit,
            total_debit,
            balance: self.ledger.last_balance(),
            spending_by_category: self.ledger.spending_by_category(),
            recent_credits: self.ledger.recent(recent, Side::Credit),
            recent_debits: self.ledger.recent(recent, Side::Debit),
            progress: self.goal().progress(total_debit),
        }
    }

    /// Backs up the current ledger file, writes `next` and adopts it.
    async fn persist(&mut self, next: Ledger) -> Result<()> {
        if let Some(path) = self
            .config
            .backup()
            .copy_ledger()
            .await
            .pub_result(ErrorType::Io)?
        {
            debug!("Backed up ledger to {}", path.display());
        }
        self.store.save(&next).await?;
        self.ledger = next;
        Ok(())
    }
}

/// The figures a dashboard shows for a ledger.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Summary {
    pub transactions: usize,
    pub total_credit: Amount,
    pub total_debit: Amount,
    pub balance: Amount,
    pub spending_by_category: BTreeMap<String, Amount>,
    pub recent_credits: Vec<RecentEntry>,
    pub recent_debits: Vec<RecentEntry>,
    pub progress: Option<Progress>,
}
