use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spendlens_core::{CanonicalTransaction, Money, RowDefect};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::parse::{parse_amount, parse_date};
use crate::table::{is_placeholder_label, Cell, RawTable};

/// Columns every mapped statement must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["date", "description", "amount"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required columns {missing:?}; found {found:?}")]
pub struct SchemaError {
    pub found: Vec<String>,
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingOptions {
    /// Tried before the built-in date layouts.
    pub date_format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Description,
    Date,
    Debit,
    Credit,
    Amount,
}

impl ColumnRole {
    pub fn name(self) -> &'static str {
        match self {
            ColumnRole::Description => "description",
            ColumnRole::Date => "date",
            ColumnRole::Debit => "debit",
            ColumnRole::Credit => "credit",
            ColumnRole::Amount => "amount",
        }
    }
}

type RoleRule = (ColumnRole, fn(&str) -> bool);

/// Evaluated in order; a label takes the first role whose predicate holds.
const ROLE_RULES: &[RoleRule] = &[
    (ColumnRole::Description, is_description),
    (ColumnRole::Date, is_date),
    (ColumnRole::Debit, is_debit),
    (ColumnRole::Credit, is_credit),
    (ColumnRole::Amount, is_amount),
];

fn is_description(label: &str) -> bool {
    ["desc", "narration", "details", "particular"]
        .iter()
        .any(|k| label.contains(k))
}

fn is_date(label: &str) -> bool {
    if label == "date" {
        return true;
    }
    let transaction_date =
        (label.contains("trans") && label.contains("date")) || label.contains("transdate");
    transaction_date && !label.contains("value")
}

fn is_debit(label: &str) -> bool {
    label.contains("debit") && !label.contains("credit")
}

fn is_credit(label: &str) -> bool {
    label.contains("credit") && !label.contains("debit")
}

fn is_amount(label: &str) -> bool {
    label == "amount"
}

/// Assigns a role to a normalized label, ignoring `(`, `)` and `?`.
pub fn classify_label(label: &str) -> Option<ColumnRole> {
    let simplified: String = label.chars().filter(|c| !matches!(c, '(' | ')' | '?')).collect();
    let simplified = simplified.trim();
    ROLE_RULES
        .iter()
        .find(|(_, matches)| matches(simplified))
        .map(|(role, _)| *role)
}

/// Where the signed amount of a row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountSource {
    DebitCredit { debit: usize, credit: usize },
    DebitOnly(usize),
    CreditOnly(usize),
    Signed(usize),
}

impl AmountSource {
    fn resolve(roles: &HashMap<ColumnRole, usize>) -> Option<Self> {
        let debit = roles.get(&ColumnRole::Debit).copied();
        let credit = roles.get(&ColumnRole::Credit).copied();
        match (debit, credit) {
            (Some(debit), Some(credit)) => Some(AmountSource::DebitCredit { debit, credit }),
            (Some(debit), None) => Some(AmountSource::DebitOnly(debit)),
            (None, Some(credit)) => Some(AmountSource::CreditOnly(credit)),
            (None, None) => roles.get(&ColumnRole::Amount).copied().map(AmountSource::Signed),
        }
    }

    fn amount(self, row: &[Cell]) -> Result<Money, RowDefect> {
        let cell = |idx: usize| match row.get(idx) {
            Some(cell) => parse_amount(cell).ok_or(RowDefect::AmountOutOfRange),
            None => Ok(Money::zero()),
        };
        match self {
            AmountSource::DebitCredit { debit, credit } => cell(credit)?
                .checked_sub(cell(debit)?)
                .ok_or(RowDefect::AmountOutOfRange),
            AmountSource::DebitOnly(debit) => Ok(-cell(debit)?),
            AmountSource::CreditOnly(credit) => cell(credit),
            AmountSource::Signed(idx) => cell(idx),
        }
    }
}

/// Maps a header-normalized table onto canonical `{date, description, amount}` rows.
///
/// Fails only when a required column cannot be established. Rows with an
/// unparseable date, an empty description, a zero amount or an amount beyond
/// [`MAX_AMOUNT`](crate::parse::MAX_AMOUNT) are dropped.
pub fn map_columns(
    mut table: RawTable,
    options: &MappingOptions,
) -> Result<Vec<CanonicalTransaction>, SchemaError> {
    table.rename_labels(|label| label.trim().to_lowercase());
    dedupe_labels(&mut table);
    drop_sparse_columns(&mut table);
    drop_row_number_column(&mut table);

    let mut roles: HashMap<ColumnRole, usize> = HashMap::new();
    for (idx, label) in table.labels().iter().enumerate() {
        if let Some(role) = classify_label(label) {
            roles.entry(role).or_insert(idx);
        }
    }

    let description = roles.get(&ColumnRole::Description).copied();
    let date = roles.get(&ColumnRole::Date).copied();
    let amount = AmountSource::resolve(&roles);

    let (Some(date), Some(description), Some(amount)) = (date, description, amount) else {
        let mut missing = Vec::new();
        if date.is_none() {
            missing.push(REQUIRED_COLUMNS[0]);
        }
        if description.is_none() {
            missing.push(REQUIRED_COLUMNS[1]);
        }
        if amount.is_none() {
            missing.push(REQUIRED_COLUMNS[2]);
        }
        return Err(SchemaError {
            found: table.labels().to_vec(),
            missing,
        });
    };
    tracing::debug!(date, description, ?amount, "mapped statement columns");

    let preferred = options.date_format.as_deref();
    let mut defects: HashMap<RowDefect, usize> = HashMap::new();
    let mut rows = Vec::with_capacity(table.row_count());

    for row in table.rows() {
        let text = |idx: usize| row.get(idx).map(Cell::as_text).unwrap_or_default();
        let result = parse_date(&text(date), preferred)
            .ok_or(RowDefect::InvalidDate)
            .and_then(|d: NaiveDate| {
                CanonicalTransaction::new(d, &text(description), amount.amount(row)?)
            });
        match result {
            Ok(tx) => rows.push(tx),
            Err(defect) => *defects.entry(defect).or_default() += 1,
        }
    }

    for (defect, count) in &defects {
        tracing::debug!(%defect, count, "dropped statement rows");
    }
    Ok(rows)
}

/// Later repeats of a label get `.1`, `.2`, ... appended, skipping any
/// suffix another column already carries.
fn dedupe_labels(table: &mut RawTable) {
    let mut taken: HashSet<String> = table.labels().iter().cloned().collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    table.rename_labels(|label| {
        if seen.insert(label.to_string()) {
            return label.to_string();
        }
        let suffix = next_suffix.entry(label.to_string()).or_insert(1);
        loop {
            let candidate = format!("{label}.{suffix}");
            *suffix += 1;
            if taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    });
}

/// Drops empty columns and placeholder columns that are mostly empty.
fn drop_sparse_columns(table: &mut RawTable) {
    let rows = table.row_count();
    let filled: Vec<usize> = (0..table.column_count())
        .map(|idx| table.column(idx).filter(|c| !c.is_empty()).count())
        .collect();

    let before = table.column_count();
    table.retain_columns(|idx, label| {
        let filled = filled[idx];
        if filled == 0 {
            return false;
        }
        !(is_placeholder_label(label) && (filled as f64) < rows as f64 * 0.5)
    });
    if table.column_count() < before {
        tracing::debug!(dropped = before - table.column_count(), "dropped sparse columns");
    }
}

/// A leading placeholder column holding 0, 1, 2, ... is a spreadsheet row index.
fn drop_row_number_column(table: &mut RawTable) {
    let Some(first) = table.labels().first() else {
        return;
    };
    if !is_placeholder_label(first) {
        return;
    }

    let is_row_index = table
        .column(0)
        .filter(|c| !c.is_empty())
        .enumerate()
        .all(|(idx, cell)| cell.as_text().trim().parse::<usize>() == Ok(idx));
    if is_row_index {
        table.retain_columns(|idx, _| idx != 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn map(rows: &[Vec<&str>]) -> Result<Vec<CanonicalTransaction>, SchemaError> {
        map_columns(RawTable::from_text_rows(rows), &MappingOptions::default())
    }

    fn amounts(rows: &[CanonicalTransaction]) -> Vec<Money> {
        rows.iter().map(CanonicalTransaction::amount).collect()
    }

    // ── label roles ──────────────────────────────────────────────────────────

    #[test]
    fn classify_common_bank_labels() {
        assert_eq!(classify_label("trans. date"), Some(ColumnRole::Date));
        assert_eq!(classify_label("transaction date"), Some(ColumnRole::Date));
        assert_eq!(classify_label("transdate"), Some(ColumnRole::Date));
        assert_eq!(classify_label("date"), Some(ColumnRole::Date));
        assert_eq!(classify_label("value date"), None);
        assert_eq!(classify_label("narration"), Some(ColumnRole::Description));
        assert_eq!(classify_label("transaction details"), Some(ColumnRole::Description));
        assert_eq!(classify_label("debit(₦)"), Some(ColumnRole::Debit));
        assert_eq!(classify_label("credit?"), Some(ColumnRole::Credit));
        assert_eq!(classify_label("debit/credit"), None);
        assert_eq!(classify_label("amount"), Some(ColumnRole::Amount));
        assert_eq!(classify_label("balance"), None);
    }

    // ── reconciliation ───────────────────────────────────────────────────────

    #[test]
    fn debit_credit_reconciliation() {
        let rows = map(&[
            vec!["Trans. Date", "Value Date", "Description", "Debit", "Credit"],
            vec!["2024-01-01", "2024-01-01", "Fuel", "1000", "0"],
            vec!["2024-01-02", "2024-01-02", "Salary", "0", "1000"],
            vec!["2024-01-03", "2024-01-03", "Transfer in", "--", "2,500"],
        ])
        .unwrap();
        assert_eq!(
            amounts(&rows),
            vec![
                Money::from_cents(-100000),
                Money::from_cents(100000),
                Money::from_cents(250000)
            ]
        );
    }

    #[test]
    fn debit_only_is_outflow() {
        let rows = map(&[
            vec!["Date", "Narration", "Debit"],
            vec!["2024-01-01", "POS", "300"],
        ])
        .unwrap();
        assert_eq!(amounts(&rows), vec![Money::from_cents(-30000)]);
    }

    #[test]
    fn credit_only_is_inflow() {
        let rows = map(&[
            vec!["Date", "Narration", "Credit"],
            vec!["2024-01-01", "Salary", "300"],
        ])
        .unwrap();
        assert_eq!(amounts(&rows), vec![Money::from_cents(30000)]);
    }

    #[test]
    fn signed_amount_fallback() {
        let rows = map(&[
            vec!["Date", "Description", "Amount"],
            vec!["2024-01-01", "Refund", "12.50"],
            vec!["2024-01-02", "Coffee", "-3.20"],
        ])
        .unwrap();
        assert_eq!(
            amounts(&rows),
            vec![Money::from_cents(1250), Money::from_cents(-320)]
        );
    }

    #[test]
    fn leftmost_label_wins_a_role() {
        let rows = map(&[
            vec!["Date", "Description", "Details", "Amount"],
            vec!["2024-01-01", "first", "second", "5"],
        ])
        .unwrap();
        assert_eq!(rows[0].description(), "first");
    }

    // ── row filtering ────────────────────────────────────────────────────────

    #[test]
    fn drops_invalid_rows() {
        let rows = map(&[
            vec!["Date", "Description", "Amount"],
            vec!["Opening balance", "", "10000"],
            vec!["2024-01-01", "", "5"],
            vec!["2024-01-02", "Zero", "0"],
            vec!["2024-01-03", "Kept", "7"],
        ])
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description(), "Kept");
    }

    #[test]
    fn preferred_date_format_is_used() {
        let options = MappingOptions {
            date_format: Some("%d/%m/%Y".to_string()),
        };
        let table = RawTable::from_text_rows(&[
            vec!["Date", "Description", "Amount"],
            vec!["03/04/2024", "Rent", "-900"],
        ]);
        let rows = map_columns(table, &options).unwrap();
        assert_eq!(rows[0].date(), NaiveDate::from_ymd_opt(2024, 4, 3).unwrap());
    }

    // ── column cleanup ───────────────────────────────────────────────────────

    #[test]
    fn duplicate_labels_get_suffixes() {
        let mut table = RawTable::from_text_rows(&[vec!["date", "x", "date", "date"]]);
        dedupe_labels(&mut table);
        assert_eq!(table.labels(), &["date", "x", "date.1", "date.2"]);
    }

    #[test]
    fn generated_suffix_skips_existing_label() {
        let mut table = RawTable::from_text_rows(&[vec!["amount", "amount.1", "amount"]]);
        dedupe_labels(&mut table);
        assert_eq!(table.labels(), &["amount", "amount.1", "amount.2"]);
    }

    #[test]
    fn sparse_placeholder_columns_are_dropped() {
        let mut table = RawTable::from_text_rows(&[
            vec!["date", "", "empty", ""],
            vec!["2024-01-01", "note", "", "a"],
            vec!["2024-01-02", "", "", "b"],
            vec!["2024-01-03", "", "", "c"],
        ]);
        drop_sparse_columns(&mut table);
        assert_eq!(table.labels(), &["date", "unnamed: 3"]);
    }

    #[test]
    fn row_number_column_is_dropped() {
        let rows = map(&[
            vec!["", "Date", "Description", "Amount"],
            vec!["0", "2024-01-01", "A", "1"],
            vec!["1", "2024-01-02", "B", "2"],
        ])
        .unwrap();
        assert_eq!(rows.len(), 2);

        let mut table = RawTable::from_text_rows(&[
            vec!["", "date"],
            vec!["5", "2024-01-01"],
            vec!["9", "2024-01-02"],
        ]);
        drop_row_number_column(&mut table);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn sub_cent_amount_survives() {
        let rows = map(&[
            vec!["Date", "Description", "Amount"],
            vec!["2024-01-01", "fee", "0.004"],
        ])
        .unwrap();
        assert_eq!(amounts(&rows), vec![Money::from_decimal(Decimal::new(4, 3))]);
    }

    #[test]
    fn oversized_amounts_drop_the_row() {
        let huge = "79228162514264337593543950335";
        let negated = format!("({huge})");
        let rows = map(&[
            vec!["Date", "Description", "Debit", "Credit"],
            vec!["2024-01-01", "overflow", negated.as_str(), huge],
            vec!["2024-01-02", "huge credit", "", huge],
            vec!["2024-01-03", "kept", "10", ""],
        ])
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description(), "kept");
    }

    // ── schema errors ────────────────────────────────────────────────────────

    #[test]
    fn missing_columns_raise_schema_error() {
        let err = map(&[
            vec!["Posted", "Memo", "Balance"],
            vec!["2024-01-01", "x", "1"],
        ])
        .unwrap_err();
        assert_eq!(err.missing, vec!["date", "description", "amount"]);
        assert_eq!(err.found, vec!["posted", "memo", "balance"]);
    }

    #[test]
    fn empty_table_is_schema_error() {
        let err = map_columns(RawTable::default(), &MappingOptions::default()).unwrap_err();
        assert_eq!(err.missing.len(), 3);
        assert!(err.found.is_empty());
    }
}
