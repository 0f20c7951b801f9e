use serde::Serialize;
use spendlens_core::{Money, Transaction, TransactionSet};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopCategory {
    pub category: String,
    /// Absolute value of the category's signed total.
    pub total: Money,
}

/// Headline figures for a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyStats {
    pub transaction_count: usize,
    pub anomaly_count: usize,
    pub top_category: Option<TopCategory>,
    /// Mean of absolute amounts.
    pub average_amount: Money,
    /// Outflows spread over every calendar day the statement covers.
    pub daily_burn: Money,
}

pub fn key_stats(set: &TransactionSet) -> KeyStats {
    let count = set.len();
    let average_amount = set.iter().map(|t| t.amount().abs()).sum::<Money>().average(count);

    let spent = set
        .iter()
        .map(Transaction::amount)
        .filter(|a| a.is_outflow())
        .sum::<Money>()
        .abs();
    let days = set.date_range().map_or(0, |r| r.days().max(0) as usize);

    KeyStats {
        transaction_count: count,
        anomaly_count: set.anomalies().count(),
        top_category: top_category(set),
        average_amount,
        daily_burn: spent.average(days),
    }
}

/// Largest absolute category total; ties go to the alphabetically first name.
fn top_category(set: &TransactionSet) -> Option<TopCategory> {
    let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
    for tx in set {
        *totals.entry(tx.category()).or_default() += tx.amount();
    }

    let mut best: Option<(&str, Money)> = None;
    for (category, total) in totals {
        let total = total.abs();
        if best.map_or(true, |(_, b)| total > b) {
            best = Some((category, total));
        }
    }
    best.map(|(category, total)| TopCategory {
        category: category.to_string(),
        total: total.round_cents(),
    })
}
