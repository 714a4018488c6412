use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BudgetTransfer, MonthKey};

/// Accumulated budget position for a recipient up to a target month.
///
/// Unlike the monthly forecast engine this walk never floors the running
/// balance: months spent into the red stay visible as negative carryover.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AccumulatedBudget {
    /// Balance after the target month's own movement.
    pub remaining: f64,
    /// Balance as it stood before entering the target month.
    pub carryover: f64,
    /// True if the running balance ever dipped below zero at any month
    /// along the walk.
    pub has_negative_history: bool,
}

/// Walks every month with activity up to and including `target_month`,
/// accumulating transfers received minus amounts spent.
pub fn accumulate(
    transfers: &[BudgetTransfer],
    expenses_by_month: &BTreeMap<MonthKey, f64>,
    target_month: MonthKey,
    recipient: Uuid,
) -> AccumulatedBudget {
    let mut budgets: BTreeMap<MonthKey, f64> = BTreeMap::new();
    for transfer in transfers {
        if transfer.to_user_id != recipient {
            continue;
        }
        *budgets.entry(transfer.month).or_default() += transfer.amount;
    }

    let months: BTreeSet<MonthKey> = budgets
        .keys()
        .chain(expenses_by_month.keys())
        .copied()
        .filter(|month| *month <= target_month)
        .collect();

    let mut running = 0.0;
    let mut carryover = 0.0;
    let mut has_negative_history = false;
    for month in months {
        if month == target_month {
            carryover = running;
        }
        let budget = budgets.get(&month).copied().unwrap_or_default();
        let spent = expenses_by_month.get(&month).copied().unwrap_or_default();
        running += budget - spent;
        if running < 0.0 {
            has_negative_history = true;
        }
        if month < target_month {
            carryover = running;
        }
    }

    AccumulatedBudget {
        remaining: running,
        carryover,
        has_negative_history,
    }
}
