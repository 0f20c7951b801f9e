pub mod classify;
pub mod columns;
pub mod csv;
pub mod header;
pub mod parse;
pub mod table;
pub(crate) mod util;

pub use classify::{categorize, CategoryMatch, Classifier, MATCH_THRESHOLD};
pub use columns::{
    classify_label, map_columns, ColumnRole, MappingOptions, SchemaError, REQUIRED_COLUMNS,
};
pub use csv::{read_raw_table, CsvError};
pub use header::{
    detect_header_row, HeaderStrategy, HEADER_KEYWORDS, HEADER_SCAN_ROWS, MAX_HEADER_ROW,
};
pub use parse::{parse_amount, parse_amount_text, parse_date, MAX_AMOUNT, PLACEHOLDER_TOKEN};
pub use table::{Cell, RawTable};
