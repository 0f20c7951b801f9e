use serde::{Deserialize, Serialize};

use crate::table::{is_placeholder_label, RawTable};

/// Data rows examined below the label row when looking for the real header.
pub const HEADER_SCAN_ROWS: usize = 20;

/// Highest source line accepted as an explicit header row.
pub const MAX_HEADER_ROW: usize = 50;

/// Case-folded fragments that mark a column-header row.
pub const HEADER_KEYWORDS: &[&str] =
    &["trans", "date", "description", "debit", "credit", "narration"];

/// How the genuine column-header row of an export is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HeaderStrategy {
    /// Keyword scan over the first rows.
    #[default]
    Detect,
    /// A known source line holds the labels.
    Explicit { row: usize },
}

impl HeaderStrategy {
    pub fn from_config(manual_header: bool, header_row_index: usize) -> Self {
        if manual_header {
            HeaderStrategy::Explicit {
                row: header_row_index,
            }
        } else {
            HeaderStrategy::Detect
        }
    }

    /// Returns a table whose label row is the genuine header.
    pub fn apply(self, table: RawTable) -> RawTable {
        match self {
            HeaderStrategy::Detect => match detect_header_row(&table) {
                Some(line) => {
                    tracing::debug!(line, "detected header row");
                    table.rebase(line)
                }
                None => {
                    tracing::debug!("no header keywords found, keeping table as read");
                    table
                }
            },
            HeaderStrategy::Explicit { row } => {
                if row > table.row_count() {
                    tracing::warn!(
                        row,
                        rows = table.row_count(),
                        "explicit header row is beyond the end of the table"
                    );
                }
                strip_leading_placeholder(table.rebase(row))
            }
        }
    }
}

/// Finds the first source line whose text contains a header keyword.
///
/// Line 0 is the current label row; placeholder labels are ignored there.
pub fn detect_header_row(table: &RawTable) -> Option<usize> {
    let label_text = joined_lowercase(
        table
            .labels()
            .iter()
            .map(String::as_str)
            .filter(|label| !is_placeholder_label(label)),
    );
    if contains_keyword(&label_text) {
        return Some(0);
    }

    table
        .rows()
        .iter()
        .take(HEADER_SCAN_ROWS)
        .position(|row| {
            let text = joined_lowercase(row.iter().map(|c| c.as_text()));
            contains_keyword(&text)
        })
        .map(|idx| idx + 1)
}

fn joined_lowercase<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .filter(|v| !v.as_ref().trim().is_empty())
        .map(|v| v.as_ref().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

fn contains_keyword(text: &str) -> bool {
    HEADER_KEYWORDS.iter().any(|kw| text.contains(kw))
}

fn strip_leading_placeholder(mut table: RawTable) -> RawTable {
    let leading = table.labels().first().is_some_and(|l| is_placeholder_label(l));
    if leading {
        table.retain_columns(|idx, _| idx != 0);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement_with_junk() -> RawTable {
        RawTable::from_text_rows(&[
            vec!["ACME BANK PLC", "", "", "", ""],
            vec!["Account Name", "ADA OBI", "", "", ""],
            vec!["Account Number", "0123456789", "", "", ""],
            vec!["Period", "01 Jan 2024 - 31 Jan 2024", "", "", ""],
            vec!["", "", "", "", ""],
            vec!["Opening Balance", "10,000.00", "", "", ""],
            vec!["", "", "", "", ""],
            vec!["Trans. Date", "Value Date", "Description", "Debit", "Credit"],
            vec!["02-Jan-2024", "02-Jan-2024", "Uber trip", "2,500.00", "--"],
            vec!["03-Jan-2024", "03-Jan-2024", "Salary", "--", "150,000.00"],
        ])
    }

    // ── detection ────────────────────────────────────────────────────────────

    #[test]
    fn detects_header_after_junk_rows() {
        let table = statement_with_junk();
        assert_eq!(detect_header_row(&table), Some(7));

        let normalized = HeaderStrategy::Detect.apply(table);
        assert_eq!(normalized.labels()[0], "Trans. Date");
        assert_eq!(normalized.row_count(), 2);
        assert_eq!(normalized.cell(0, 2).as_text(), "Uber trip");
    }

    #[test]
    fn label_row_match_leaves_table_unchanged() {
        let table = RawTable::from_text_rows(&[
            vec!["Date", "Narration", "Amount"],
            vec!["2024-01-01", "POS", "-5"],
        ]);
        assert_eq!(detect_header_row(&table), Some(0));
        assert_eq!(HeaderStrategy::Detect.apply(table.clone()), table);
    }

    #[test]
    fn placeholder_labels_are_not_scanned() {
        let table = RawTable::new(
            vec!["".to_string(), "".to_string()],
            vec![vec!["Transaction".into(), "Amount".into()]],
        );
        assert_eq!(detect_header_row(&table), Some(1));
    }

    #[test]
    fn no_match_returns_input_unchanged() {
        let table = RawTable::from_text_rows(&[vec!["foo", "bar"], vec!["1", "2"]]);
        assert_eq!(detect_header_row(&table), None);
        assert_eq!(HeaderStrategy::Detect.apply(table.clone()), table);
    }

    #[test]
    fn scan_window_is_bounded() {
        let mut rows = vec![vec!["title".to_string()]];
        rows.extend((0..HEADER_SCAN_ROWS).map(|i| vec![format!("junk {i}")]));
        rows.push(vec!["Description".to_string()]);
        let table = RawTable::from_text_rows(&rows);
        assert_eq!(detect_header_row(&table), None);
    }

    // ── explicit ─────────────────────────────────────────────────────────────

    #[test]
    fn explicit_row_strips_leading_placeholder_column() {
        let table = RawTable::from_text_rows(&[
            vec!["", "Statement", "", ""],
            vec!["", "Date", "Description", "Amount"],
            vec!["0", "2024-01-01", "Fuel", "-40"],
        ]);
        let normalized = HeaderStrategy::from_config(true, 1).apply(table);
        assert_eq!(normalized.labels(), &["Date", "Description", "Amount"]);
        assert_eq!(normalized.cell(0, 0).as_text(), "2024-01-01");
    }

    #[test]
    fn explicit_row_past_end_is_empty() {
        let table = RawTable::from_text_rows(&[vec!["a"], vec!["1"]]);
        let normalized = HeaderStrategy::Explicit { row: 10 }.apply(table);
        assert_eq!(normalized.column_count(), 0);
    }

    #[test]
    fn from_config_selects_strategy() {
        assert_eq!(HeaderStrategy::from_config(false, 6), HeaderStrategy::Detect);
        assert_eq!(
            HeaderStrategy::from_config(true, 6),
            HeaderStrategy::Explicit { row: 6 }
        );
    }
}
