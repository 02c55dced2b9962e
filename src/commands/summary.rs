//! Dashboard commands: the spending summary and the credit and debit trend.

use crate::args::SummaryArgs;
use crate::commands::Out;
use crate::model::DailyTotal;
use crate::{Config, Result, Session, Summary};

/// Reports total credit and debit, the balance, spending per category, the most recent credits
/// and debits, and progress toward the spending goal. A missing or invalid ledger file is logged
/// and summarized as an empty ledger.
pub async fn summary(config: Config, args: SummaryArgs) -> Result<Out<Summary>> {
    let session = Session::open(config).await;
    let summary = session.summary(args.recent());

    let mut lines = vec![
        format!("Total credit: {}", summary.total_credit.dollars()),
        format!("Total debit: {}", summary.total_debit.dollars()),
        format!("Balance: {}", summary.balance.dollars()),
    ];
    if !summary.spending_by_category.is_empty() {
        lines.push(String::from("Spending by category:"));
        for (category, amount) in &summary.spending_by_category {
            lines.push(format!("  {category}: {}", amount.dollars()));
        }
    }
    if let Some(progress) = &summary.progress {
        lines.push(progress.message());
    }
    Ok(Out::new(lines.join("\n"), summary))
}

/// Reports credit and debit summed per date, in date order.
pub async fn trend(config: Config) -> Result<Out<Vec<DailyTotal>>> {
    let session = Session::open(config).await;
    let totals = session.ledger().daily_totals();
    let mut lines = Vec::with_capacity(totals.len() + 1);
    lines.push(format!("Credit and debit over {} days", totals.len()));
    for day in &totals {
        lines.push(format!(
            "  {}: credit {}, debit {}",
            day.date,
            day.credit.dollars(),
            day.debit.dollars()
        ));
    }
    Ok(Out::new(lines.join("\n"), totals))
}
