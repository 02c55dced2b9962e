use crate::args::GoalArgs;
use crate::commands::Out;
use crate::goal::Progress;
use crate::model::Amount;
use crate::{Config, Result, Session};
use serde::Serialize;

/// The spending goal and, when one is set, how the ledger's spending compares to it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GoalReport {
    pub target: Amount,
    pub progress: Option<Progress>,
}

/// Shows the spending goal, or sets it when `args` carries a new value. Setting the goal to zero
/// clears it.
///
/// # Errors
///
/// - `ErrorType::Validation` if the new goal is negative. The config file is not touched.
/// - `ErrorType::Config` if the config file cannot be written.
pub async fn goal(config: Config, args: GoalArgs) -> Result<Out<GoalReport>> {
    let mut session = Session::open(config).await;
    if let Some(target) = args.set() {
        session.set_goal(target).await?;
    }

    let report = GoalReport {
        target: session.goal().target(),
        progress: session.progress(),
    };
    let message = match &report.progress {
        Some(progress) => format!(
            "Target spending limit: {}. {}",
            report.target.dollars(),
            progress.message()
        ),
        None => String::from("No spending limit is set"),
    };
    Ok(Out::new(message, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::Signal;
    use crate::test::TestEnv;
    use crate::ErrorType;

    const LEDGER: &str = "Transaction_ID,Transaction_Date,Credit,Credit_Description,Debit,\
                          Debit_Description,Total_Balance\n\
                          1,2025-05-01,0,,110,Rent,-110\n";

    #[tokio::test]
    async fn test_goal_show_unset() {
        let env = TestEnv::new().await;
        let out = goal(env.config(), GoalArgs::default()).await.unwrap();
        assert_eq!(out.message(), "No spending limit is set");
        assert!(out.structure().unwrap().progress.is_none());
    }

    #[tokio::test]
    async fn test_goal_set_then_show() {
        let env = TestEnv::new().await;
        env.write_ledger(LEDGER).await;

        let out = goal(env.config(), GoalArgs::new(Some(Amount::from(100))))
            .await
            .unwrap();
        let progress = out.structure().unwrap().progress.unwrap();
        assert_eq!(progress.signal, Signal::OverLimit);
        assert!(out.message().contains("You have exceeded your spending limit!"));

        let config = Config::load(env.config().root()).await.unwrap();
        let out = goal(config, GoalArgs::default()).await.unwrap();
        assert_eq!(out.structure().unwrap().target, Amount::from(100));
    }

    #[tokio::test]
    async fn test_goal_negative_rejected() {
        let env = TestEnv::new().await;
        let err = goal(env.config(), GoalArgs::new(Some(Amount::from(-5))))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);

        let config = Config::load(env.config().root()).await.unwrap();
        assert!(!config.goal().is_set());
    }
}
