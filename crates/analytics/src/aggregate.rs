use rust_decimal::Decimal;
use serde::Serialize;
use spendlens_core::{Money, Transaction, TransactionSet, YearMonth, INCOME_CATEGORY};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetFlow {
    /// Sum of inflows.
    pub income: Money,
    /// Absolute sum of outflows.
    pub expenses: Money,
    pub net: Money,
    /// `net / income * 100`, zero without income.
    pub savings_rate: Decimal,
}

pub fn net_flow(set: &TransactionSet) -> NetFlow {
    let income: Money = set.iter().map(Transaction::amount).filter(|a| a.is_inflow()).sum();
    let expenses: Money = set
        .iter()
        .map(Transaction::amount)
        .filter(|a| a.is_outflow())
        .sum::<Money>()
        .abs();
    let net = income - expenses;

    let savings_rate = if income.is_inflow() {
        net.percent_of(income).unwrap_or(if net.is_outflow() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
    } else {
        Decimal::ZERO
    };

    NetFlow {
        income: income.round_cents(),
        expenses: expenses.round_cents(),
        net: net.round_cents(),
        savings_rate,
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    total: Money,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, amount: Money) {
        self.total += amount;
        self.count += 1;
    }

    fn average(&self) -> Money {
        self.total.average(self.count)
    }
}

fn group_by<K, F>(set: &TransactionSet, key: F) -> BTreeMap<K, Accumulator>
where
    K: Ord,
    F: Fn(&Transaction) -> K,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for tx in set {
        groups.entry(key(tx)).or_default().push(tx.amount());
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyStats {
    pub month: YearMonth,
    pub total: Money,
    pub average: Money,
    pub count: usize,
}

/// Per-month totals in ascending calendar order.
pub fn monthly_stats(set: &TransactionSet) -> Vec<MonthlyStats> {
    group_by(set, Transaction::month)
        .into_iter()
        .map(|(month, acc)| MonthlyStats {
            month,
            total: acc.total.round_cents(),
            average: acc.average(),
            count: acc.count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub total: Money,
    pub average: Money,
    pub count: usize,
}

/// Per-category totals ordered by signed total, largest first.
///
/// Income-heavy categories therefore rank above spending. Equal totals stay
/// in alphabetical order.
pub fn category_stats(set: &TransactionSet) -> Vec<CategoryStats> {
    let mut stats: Vec<CategoryStats> = group_by(set, |tx| tx.category().to_string())
        .into_iter()
        .map(|(category, acc)| CategoryStats {
            category,
            total: acc.total.round_cents(),
            average: acc.average(),
            count: acc.count,
        })
        .collect();
    stats.sort_by(|a, b| b.total.cmp(&a.total));
    stats
}

/// [`category_stats`] without the income category.
pub fn spending_breakdown(set: &TransactionSet) -> Vec<CategoryStats> {
    category_stats(set)
        .into_iter()
        .filter(|s| s.category != INCOME_CATEGORY)
        .collect()
}
