use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::OTHER_CATEGORY;
use super::money::Money;
use super::period::{DateRange, YearMonth};

/// Reasons a mapped statement row is rejected. Never fatal for the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RowDefect {
    #[error("Unparseable date")]
    InvalidDate,
    #[error("Empty description")]
    EmptyDescription,
    #[error("Zero amount")]
    ZeroAmount,
    #[error("Amount out of range")]
    AmountOutOfRange,
}

/// A statement row in the canonical `{date, description, amount}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    date: NaiveDate,
    description: String,
    amount: Money,
}

impl CanonicalTransaction {
    pub fn new(date: NaiveDate, description: &str, amount: Money) -> Result<Self, RowDefect> {
        let description = description.trim();
        if description.is_empty() {
            return Err(RowDefect::EmptyDescription);
        }
        if amount.is_zero() {
            return Err(RowDefect::ZeroAmount);
        }
        Ok(CanonicalTransaction {
            date,
            description: description.to_string(),
            amount,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Money {
        self.amount
    }
}

/// A categorized, anomaly-annotated transaction. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    date: NaiveDate,
    description: String,
    amount: Money,
    category: String,
    is_anomaly: bool,
    month: YearMonth,
}

impl Transaction {
    pub fn new(row: CanonicalTransaction, category: &str, is_anomaly: bool) -> Self {
        let category = if category.is_empty() {
            OTHER_CATEGORY
        } else {
            category
        };
        Transaction {
            month: YearMonth::from_date(row.date),
            date: row.date,
            description: row.description,
            amount: row.amount,
            category: category.to_string(),
            is_anomaly,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_anomaly(&self) -> bool {
        self.is_anomaly
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }
}

/// All transactions produced from one statement, in source order.
///
/// Anomaly flags and every aggregate are relative to the whole set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionSet {
    transactions: Vec<Transaction>,
}

impl TransactionSet {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        TransactionSet { transactions }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn anomalies(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_anomaly)
    }

    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.transactions.iter().map(|t| t.date).min()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.transactions.iter().map(|t| t.date).max()
    }

    /// Span from the earliest to the latest transaction date.
    pub fn date_range(&self) -> Option<DateRange> {
        Some(DateRange::new(self.earliest_date()?, self.latest_date()?))
    }
}

impl<'a> IntoIterator for &'a TransactionSet {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

impl IntoIterator for TransactionSet {
    type Item = Transaction;
    type IntoIter = std::vec::IntoIter<Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(d: NaiveDate, desc: &str, cents: i64) -> CanonicalTransaction {
        CanonicalTransaction::new(d, desc, Money::from_cents(cents)).unwrap()
    }

    #[test]
    fn canonical_rejects_empty_description() {
        let result = CanonicalTransaction::new(date(2024, 1, 15), "   ", Money::from_cents(100));
        assert_eq!(result, Err(RowDefect::EmptyDescription));
    }

    #[test]
    fn canonical_rejects_zero_amount() {
        let result = CanonicalTransaction::new(date(2024, 1, 15), "POS", Money::zero());
        assert_eq!(result, Err(RowDefect::ZeroAmount));
    }

    #[test]
    fn canonical_trims_description() {
        let tx = row(date(2024, 1, 15), "  Uber trip \n", -1500);
        assert_eq!(tx.description(), "Uber trip");
    }

    #[test]
    fn transaction_derives_month() {
        let tx = Transaction::new(row(date(2024, 2, 29), "Fuel", -5000), "Transport", false);
        assert_eq!(tx.month().to_string(), "2024-02");
        assert_eq!(tx.category(), "Transport");
        assert!(!tx.is_anomaly());
    }

    #[test]
    fn transaction_blank_category_defaults_to_other() {
        let tx = Transaction::new(row(date(2024, 2, 1), "Misc", -100), "", false);
        assert_eq!(tx.category(), OTHER_CATEGORY);
    }

    #[test]
    fn set_date_range_and_anomalies() {
        let set = TransactionSet::new(vec![
            Transaction::new(row(date(2024, 3, 10), "A", -100), "Other", false),
            Transaction::new(row(date(2024, 1, 5), "B", 200), "Income", true),
            Transaction::new(row(date(2024, 2, 1), "C", -300), "Other", false),
        ]);
        let range = set.date_range().unwrap();
        assert_eq!(range.start, date(2024, 1, 5));
        assert_eq!(range.end, date(2024, 3, 10));
        assert_eq!(set.anomalies().count(), 1);
    }

    #[test]
    fn empty_set_has_no_range() {
        let set = TransactionSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.date_range(), None);
        assert_eq!(set.latest_date(), None);
    }
}
