use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendlens_core::{BudgetPeriod, Money, TransactionSet, YearMonth};
use std::fmt;

/// Monthly spending target used when none is configured.
pub const DEFAULT_BUDGET_TARGET: Money = Money::from_units(200_000);

const APPROACHING_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub target: Money,
    #[serde(default)]
    pub period: BudgetPeriod,
}

impl Default for Budget {
    fn default() -> Self {
        Budget {
            target: DEFAULT_BUDGET_TARGET,
            period: BudgetPeriod::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    WithinBudget,
    Approaching,
    OverBudget,
}

impl BudgetStatus {
    pub fn from_percent(percent: Decimal) -> Self {
        if percent >= Decimal::ONE_HUNDRED {
            BudgetStatus::OverBudget
        } else if percent >= APPROACHING_PERCENT {
            BudgetStatus::Approaching
        } else {
            BudgetStatus::WithinBudget
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetStatus::WithinBudget => write!(f, "within budget"),
            BudgetStatus::Approaching => write!(f, "approaching limit"),
            BudgetStatus::OverBudget => write!(f, "over budget"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetReport {
    pub period: BudgetPeriod,
    /// Month measured; `None` for all-time or an empty dataset.
    pub month: Option<YearMonth>,
    pub target: Money,
    pub spent: Money,
    pub remaining: Money,
    pub percent_used: Decimal,
    pub status: BudgetStatus,
}

/// Compares outflows in the budget period against the target.
///
/// Month periods are anchored on the latest transaction date in `set`.
pub fn track_budget(set: &TransactionSet, budget: &Budget) -> BudgetReport {
    let month = set.latest_date().and_then(|latest| budget.period.month(latest));
    let in_period = |date| match budget.period {
        BudgetPeriod::AllTime => true,
        _ => month.is_some_and(|m| m.contains(date)),
    };

    let spent = set
        .iter()
        .filter(|tx| tx.amount().is_outflow() && in_period(tx.date()))
        .map(|tx| tx.amount())
        .sum::<Money>()
        .abs()
        .round_cents();

    let percent_used = percent_of(spent, budget.target);
    tracing::debug!(%spent, target = %budget.target, %percent_used, "tracked budget");

    BudgetReport {
        period: budget.period,
        month,
        target: budget.target,
        spent,
        remaining: (budget.target - spent).round_cents(),
        percent_used,
        status: BudgetStatus::from_percent(percent_used),
    }
}

fn percent_of(spent: Money, target: Money) -> Decimal {
    if target.is_inflow() {
        spent.percent_of(target).unwrap_or(Decimal::MAX)
    } else if spent.is_inflow() {
        Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}
