pub mod aggregate;
pub mod anomaly;
pub mod budget;
pub mod insights;

pub use aggregate::{
    category_stats, monthly_stats, net_flow, spending_breakdown, CategoryStats, MonthlyStats,
    NetFlow,
};
pub use anomaly::{AnomalyDetector, Distribution, DEFAULT_Z_THRESHOLD};
pub use budget::{track_budget, Budget, BudgetReport, BudgetStatus, DEFAULT_BUDGET_TARGET};
pub use insights::{key_stats, KeyStats, TopCategory};
