use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A single untrusted cell from a statement export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Number(Decimal),
    Text(String),
}

impl Cell {
    /// Blank or whitespace-only text becomes [`Cell::Empty`].
    pub fn from_text(s: &str) -> Self {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(_) => false,
            Cell::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::from_text(s)
    }
}

impl From<Decimal> for Cell {
    fn from(n: Decimal) -> Self {
        Cell::Number(n)
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Label given to a column whose header cell is blank.
pub fn placeholder_label(index: usize) -> String {
    format!("unnamed: {index}")
}

/// Blank labels and generated `unnamed` labels mark columns with no real header.
pub fn is_placeholder_label(label: &str) -> bool {
    let label = label.trim();
    label.is_empty() || label.to_lowercase().starts_with("unnamed")
}

/// Rectangular grid of raw cells under a row of column labels.
///
/// Ragged input is padded: every row has exactly `labels.len()` cells and
/// missing labels become placeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    labels: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(labels: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(labels.len()))
            .max()
            .unwrap_or(0);

        let labels = (0..width)
            .map(|idx| match labels.get(idx) {
                Some(label) if !label.trim().is_empty() => label.clone(),
                _ => placeholder_label(idx),
            })
            .collect();

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();

        RawTable { labels, rows }
    }

    /// Builds a table from text rows, the first row supplying the labels.
    pub fn from_text_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        let mut iter = rows.iter();
        let labels = iter
            .next()
            .map(|r| r.iter().map(|s| s.as_ref().trim().to_string()).collect())
            .unwrap_or_default();
        let rows = iter
            .map(|r| r.iter().map(|s| Cell::from_text(s.as_ref())).collect())
            .collect();
        RawTable::new(labels, rows)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn column(&self, column: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |r| r.get(column).unwrap_or(&EMPTY_CELL))
    }

    /// Makes source line `line` the label row and keeps only the rows below it.
    ///
    /// Line 0 is the current label row, line `n` is data row `n - 1`.
    /// Returns an empty table if `line` is past the end.
    pub fn rebase(self, line: usize) -> RawTable {
        if line == 0 {
            return self;
        }
        let mut rows = self.rows;
        if line > rows.len() {
            return RawTable::default();
        }
        let below = rows.split_off(line);
        let header = rows.pop().unwrap_or_default();
        let labels = header.iter().map(|c| c.as_text().trim().to_string()).collect();
        RawTable::new(labels, below)
    }

    pub fn rename_labels<F: FnMut(&str) -> String>(&mut self, mut f: F) {
        for label in &mut self.labels {
            *label = f(label);
        }
    }

    /// Keeps the columns for which `keep` returns true, preserving order.
    pub fn retain_columns<F: FnMut(usize, &str) -> bool>(&mut self, mut keep: F) {
        let mask: Vec<bool> = self
            .labels
            .iter()
            .enumerate()
            .map(|(idx, label)| keep(idx, label))
            .collect();

        let mut it = mask.iter();
        self.labels.retain(|_| *it.next().unwrap_or(&false));
        for row in &mut self.rows {
            let mut it = mask.iter();
            row.retain(|_| *it.next().unwrap_or(&false));
        }
    }
}
