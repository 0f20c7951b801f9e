use serde::Serialize;
use spendlens_analytics::{
    category_stats, key_stats, monthly_stats, net_flow, spending_breakdown, track_budget, Budget,
    BudgetReport, CategoryStats, KeyStats, MonthlyStats, NetFlow,
};
use spendlens_core::{DateRange, Transaction, TransactionSet};

/// Every derived view of one statement, ready to print or serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub date_range: Option<DateRange>,
    pub net_flow: NetFlow,
    pub key_stats: KeyStats,
    pub monthly: Vec<MonthlyStats>,
    pub categories: Vec<CategoryStats>,
    pub spending: Vec<CategoryStats>,
    pub budget: BudgetReport,
    pub anomalies: Vec<Transaction>,
}

impl Report {
    pub fn build(set: &TransactionSet, budget: &Budget) -> Self {
        Report {
            date_range: set.date_range(),
            net_flow: net_flow(set),
            key_stats: key_stats(set),
            monthly: monthly_stats(set),
            categories: category_stats(set),
            spending: spending_breakdown(set),
            budget: track_budget(set, budget),
            anomalies: set.anomalies().cloned().collect(),
        }
    }
}
