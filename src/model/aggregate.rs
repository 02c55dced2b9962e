//! Read-only views over a `Ledger`: totals, the spending breakdown by category, the most recent
//! rows of each side, and per-day totals for plotting credit and debit over time.

use crate::model::{Amount, Ledger};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which side of a transaction to look at.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Credit,
    Debit,
}

serde_plain::derive_display_from_serialize!(Side);
serde_plain::derive_fromstr_from_deserialize!(Side);

/// One row of a recent-credits or recent-debits listing.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub date: NaiveDate,
    pub amount: Amount,
    pub description: String,
}

/// Credit and debit summed over one date.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub credit: Amount,
    pub debit: Amount,
}

/// The grouping key for a debit description.
pub fn category_key(description: &str) -> String {
    description.trim().to_lowercase()
}

impl Ledger {
    pub fn total_credit(&self) -> Amount {
        self.data().iter().map(|t| t.credit()).sum()
    }

    pub fn total_debit(&self) -> Amount {
        self.data().iter().map(|t| t.debit()).sum()
    }

    /// Debits summed per category. Descriptions are normalized before grouping, so `"Food"` and
    /// `" food "` land in the same bucket. Rows with a blank debit description have no category
    /// and are left out.
    pub fn spending_by_category(&self) -> BTreeMap<String, Amount> {
        let mut spending = BTreeMap::new();
        for txn in self.data() {
            let key = category_key(txn.debit_description());
            if key.is_empty() {
                continue;
            }
            *spending.entry(key).or_insert(Amount::ZERO) += txn.debit();
        }
        spending
    }

    /// The last `n` rows' date, amount and description for `side`, oldest first.
    pub fn recent(&self, n: usize, side: Side) -> Vec<RecentEntry> {
        let skip = self.len().saturating_sub(n);
        self.data()
            .iter()
            .skip(skip)
            .map(|t| match side {
                Side::Credit => RecentEntry {
                    date: t.date(),
                    amount: t.credit(),
                    description: t.credit_description().to_string(),
                },
                Side::Debit => RecentEntry {
                    date: t.date(),
                    amount: t.debit(),
                    description: t.debit_description().to_string(),
                },
            })
            .collect()
    }

    /// Credit and debit per date, in date order.
    pub fn daily_totals(&self) -> Vec<DailyTotal> {
        let mut days: BTreeMap<NaiveDate, DailyTotal> = BTreeMap::new();
        for txn in self.data() {
            let day = days.entry(txn.date()).or_insert(DailyTotal {
                date: txn.date(),
                credit: Amount::ZERO,
                debit: Amount::ZERO,
            });
            day.credit += txn.credit();
            day.debit += txn.debit();
        }
        days.into_values().collect()
    }
}
