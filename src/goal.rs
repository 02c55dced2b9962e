//! Spending goal tracking.
//!
//! A goal is a spending limit compared against the ledger's total debit. A goal of zero means
//! no goal has been set and no progress is reported.

use crate::error::{Error, ErrorType, Result};
use crate::model::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How total spending compares to the goal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Spending has reached or exceeded the goal.
    OverLimit,
    /// Spending is at 90% of the goal or more.
    NearLimit,
    WithinBudget,
}

serde_plain::derive_display_from_serialize!(Signal);
serde_plain::derive_fromstr_from_deserialize!(Signal);

/// A spending limit. Never negative.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Goal(Amount);

impl Goal {
    pub fn new(target: Amount) -> Result<Self> {
        if target.is_negative() {
            return Err(Error::msg(
                ErrorType::Validation,
                format!("The spending goal cannot be negative: {target}"),
            ));
        }
        Ok(Self(target))
    }

    pub fn target(&self) -> Amount {
        self.0
    }

    pub fn is_set(&self) -> bool {
        !self.0.is_zero()
    }

    pub fn progress(&self, total_debit: Amount) -> Option<Progress> {
        progress(total_debit, self.0)
    }
}

/// Spending measured against a goal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// `spent / target`, capped at 1.
    pub ratio: Decimal,
    pub spent: Amount,
    pub target: Amount,
    pub signal: Signal,
}

impl Progress {
    /// A line suitable for showing to the user.
    pub fn message(&self) -> String {
        match self.signal {
            Signal::OverLimit => String::from(
                "You have exceeded your spending limit! Consider reducing expenses.",
            ),
            Signal::NearLimit => String::from("You are close to exceeding your spending limit!"),
            Signal::WithinBudget => format!(
                "You have spent {} out of your target {}.",
                self.spent.dollars(),
                self.target.dollars()
            ),
        }
    }
}

/// Compares `total_debit` with `target_goal`. Returns `None` when the goal is zero or negative.
pub fn progress(total_debit: Amount, target_goal: Amount) -> Option<Progress> {
    let spent = total_debit.value();
    let target = target_goal.value();
    if target <= Decimal::ZERO {
        return None;
    }

    // A quotient too large for `Decimal` is far past the limit.
    let ratio = spent
        .checked_div(target)
        .map_or(Decimal::ONE, |r| r.min(Decimal::ONE));
    let signal = if spent >= target {
        Signal::OverLimit
    } else if target.checked_mul(near_limit()).is_some_and(|near| spent >= near) {
        Signal::NearLimit
    } else {
        Signal::WithinBudget
    };

    Some(Progress {
        ratio,
        spent: total_debit,
        target: target_goal,
        signal,
    })
}

/// Spending at or above this fraction of the goal is near the limit.
fn near_limit() -> Decimal {
    Decimal::new(9, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_limit() {
        let p = progress(Amount::from(95), Amount::from(100)).unwrap();
        assert_eq!(p.ratio, Decimal::new(95, 2));
        assert_eq!(p.signal, Signal::NearLimit);
    }

    #[test]
    fn test_over_limit_caps_ratio() {
        let p = progress(Amount::from(110), Amount::from(100)).unwrap();
        assert_eq!(p.ratio, Decimal::ONE);
        assert_eq!(p.signal, Signal::OverLimit);
    }

    #[test]
    fn test_exactly_at_limit() {
        let p = progress(Amount::from(100), Amount::from(100)).unwrap();
        assert_eq!(p.ratio, Decimal::ONE);
        assert_eq!(p.signal, Signal::OverLimit);
    }

    #[test]
    fn test_ninety_percent_is_near() {
        let p = progress(Amount::from(90), Amount::from(100)).unwrap();
        assert_eq!(p.signal, Signal::NearLimit);
        let p = progress(Amount::from(89), Amount::from(100)).unwrap();
        assert_eq!(p.signal, Signal::WithinBudget);
        assert!(p.message().contains("$89.00 out of your target $100.00"));
    }

    #[test]
    fn test_no_goal() {
        assert!(progress(Amount::from(10), Amount::ZERO).is_none());
        assert!(progress(Amount::from(10), Amount::from(-5)).is_none());
        assert!(Goal::default().progress(Amount::from(10)).is_none());
        assert!(!Goal::default().is_set());
    }

    #[test]
    fn test_tiny_goal_does_not_overflow() {
        let tiny = Goal::new("0.0000000000000000000000000001".parse().unwrap()).unwrap();
        assert!(tiny.is_set());
        let p = tiny.progress(Amount::from(100)).unwrap();
        assert_eq!(p.ratio, Decimal::ONE);
        assert_eq!(p.signal, Signal::OverLimit);

        let p = tiny.progress(Amount::ZERO).unwrap();
        assert_eq!(p.ratio, Decimal::ZERO);
        assert_eq!(p.signal, Signal::WithinBudget);
    }

    #[test]
    fn test_negative_goal_rejected() {
        let err = Goal::new(Amount::from(-1)).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(Goal::new(Amount::ZERO).unwrap().target(), Amount::ZERO);
    }
}
