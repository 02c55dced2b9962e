//! Types that represent the core data model, such as `Transaction` and `Ledger`.
mod aggregate;
mod amount;
mod ledger;
mod mapping;
mod transaction;

pub use aggregate::{category_key, DailyTotal, RecentEntry, Side};
pub use amount::{Amount, AmountError};
pub use ledger::Ledger;
pub(crate) use mapping::Mapping;
pub use transaction::{NewTransaction, Transaction, TransactionColumn};
pub(crate) use transaction::parse_date;
