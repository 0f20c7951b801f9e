pub mod catalog;
pub mod money;
pub mod period;
pub mod transaction;

pub use catalog::{CatalogError, CategoryKeywords, KeywordCatalog, INCOME_CATEGORY, OTHER_CATEGORY};
pub use money::Money;
pub use period::{BudgetPeriod, DateRange, YearMonth};
pub use transaction::{CanonicalTransaction, RowDefect, Transaction, TransactionSet};
