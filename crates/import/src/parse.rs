use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use spendlens_core::Money;
use std::str::FromStr;

use crate::table::Cell;

/// Placeholder some banks print in an empty debit or credit cell.
pub const PLACEHOLDER_TOKEN: &str = "--";

const CURRENCY_SYMBOLS: [char; 4] = ['₦', '$', '£', '€'];

/// Four-digit-year layouts first; a two-digit year read through `%Y` lands
/// before 1900 and is rejected, so the `%y` layouts below get their turn.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d-%B-%Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%d.%m.%Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%m-%d-%y",
    "%d-%m-%y",
    "%d-%b-%y",
    "%d %b %y",
    "%d.%m.%y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const MIN_YEAR: i32 = 1900;

/// Largest magnitude accepted for a single cell (10^15). Sums of any
/// realistic number of rows stay far inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Lenient amount parsing. Anything that does not read as a number is zero.
///
/// Returns `None` only for numbers whose magnitude exceeds [`MAX_AMOUNT`].
pub fn parse_amount(cell: &Cell) -> Option<Money> {
    match cell {
        Cell::Empty => Some(Money::zero()),
        Cell::Number(n) => in_range(*n),
        Cell::Text(s) => parse_amount_text(s),
    }
}

pub fn parse_amount_text(s: &str) -> Option<Money> {
    let s = s.trim();
    if s.is_empty() || s == PLACEHOLDER_TOKEN {
        return Some(Money::zero());
    }

    let (negative, s) = match s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };

    let cleaned: String = s
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    let value = Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .unwrap_or(Decimal::ZERO);

    in_range(if negative { -value } else { value })
}

fn in_range(value: Decimal) -> Option<Money> {
    (value.abs() <= MAX_AMOUNT).then(|| Money::from_decimal(value))
}

/// Parses a statement date, discarding any time of day.
///
/// `preferred` is tried before the built-in layouts.
pub fn parse_date(s: &str, preferred: Option<&str>) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(date) = parse_date_only(s, preferred) {
        return Some(date);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return plausible(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return plausible(dt.date_naive());
    }

    let without_time = strip_time(s);
    if without_time.len() < s.len() {
        return parse_date_only(without_time, preferred);
    }
    None
}

fn parse_date_only(s: &str, preferred: Option<&str>) -> Option<NaiveDate> {
    preferred
        .into_iter()
        .chain(DATE_FORMATS.iter().copied())
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(|date| date.year() >= MIN_YEAR)
}

fn plausible(date: NaiveDate) -> Option<NaiveDate> {
    (date.year() >= MIN_YEAR).then_some(date)
}

/// Drops trailing tokens that look like a time of day ("14:03", "2:05 PM").
fn strip_time(s: &str) -> &str {
    let mut end = s.len();
    for token in s.rsplit(char::is_whitespace) {
        let is_time = token.contains(':')
            || token.eq_ignore_ascii_case("am")
            || token.eq_ignore_ascii_case("pm");
        if !is_time {
            break;
        }
        end = end.saturating_sub(token.len());
        end = s[..end].trim_end().len();
    }
    &s[..end]
}
