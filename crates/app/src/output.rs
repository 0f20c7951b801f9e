//! Terminal rendering of a [`Report`].

use std::io::{self, Write};

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, CellAlignment, ContentArrangement, Table};

use crate::report::Report;

/// Print a warning to stderr so JSON on stdout stays parseable
pub fn warning(msg: &str) {
    eprintln!("{}", msg.yellow());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Right-aligns every column from `first` onwards.
fn align_numbers(table: &mut Table, first: usize) {
    for idx in first..table.column_count() {
        if let Some(column) = table.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn print_summary(report: &Report) -> io::Result<()> {
    let stdout = io::stdout();
    write_summary(&mut stdout.lock(), report)
}

pub fn write_summary<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    if let Some(range) = report.date_range {
        writeln!(out, "Statement period: {range}")?;
        writeln!(out)?;
    }

    let flow = &report.net_flow;
    let stats = &report.key_stats;
    let mut overview = create_table();
    overview.add_row(vec!["Income".to_string(), flow.income.to_string()]);
    overview.add_row(vec!["Expenses".to_string(), flow.expenses.to_string()]);
    overview.add_row(vec!["Net".to_string(), flow.net.to_string()]);
    overview.add_row(vec!["Savings rate".to_string(), format!("{}%", flow.savings_rate)]);
    overview.add_row(vec!["Transactions".to_string(), stats.transaction_count.to_string()]);
    overview.add_row(vec!["Anomalies".to_string(), stats.anomaly_count.to_string()]);
    overview.add_row(vec!["Average size".to_string(), stats.average_amount.to_string()]);
    overview.add_row(vec!["Daily burn".to_string(), stats.daily_burn.to_string()]);
    if let Some(top) = &stats.top_category {
        overview.add_row(vec![
            "Top category".to_string(),
            format!("{} ({})", top.category, top.total),
        ]);
    }
    align_numbers(&mut overview, 1);
    writeln!(out, "{overview}")?;

    let budget = &report.budget;
    writeln!(out)?;
    match budget.month {
        Some(month) => writeln!(out, "{}", format!("Budget ({month})").bold())?,
        None => writeln!(out, "{}", format!("Budget ({})", budget.period).bold())?,
    }
    writeln!(
        out,
        "  spent {} of {} ({}%), {} remaining: {}",
        budget.spent, budget.target, budget.percent_used, budget.remaining, budget.status
    )?;

    if !report.monthly.is_empty() {
        let mut table = create_table();
        table.set_header(vec!["Month", "Total", "Average", "Count"]);
        for m in &report.monthly {
            table.add_row(vec![
                m.month.to_string(),
                m.total.to_string(),
                m.average.to_string(),
                m.count.to_string(),
            ]);
        }
        align_numbers(&mut table, 1);
        writeln!(out)?;
        writeln!(out, "{table}")?;
    }

    if !report.categories.is_empty() {
        let mut table = create_table();
        table.set_header(vec!["Category", "Total", "Average", "Count"]);
        for c in &report.categories {
            table.add_row(vec![
                c.category.clone(),
                c.total.to_string(),
                c.average.to_string(),
                c.count.to_string(),
            ]);
        }
        align_numbers(&mut table, 1);
        writeln!(out)?;
        writeln!(out, "{table}")?;
    }

    if !report.anomalies.is_empty() {
        let mut table = create_table();
        table.set_header(vec!["Date", "Amount", "Description", "Category"]);
        for tx in &report.anomalies {
            table.add_row(vec![
                tx.date().to_string(),
                tx.amount().to_string(),
                tx.description().to_string(),
                tx.category().to_string(),
            ]);
        }
        if let Some(column) = table.column_mut(1) {
            column.set_cell_alignment(CellAlignment::Right);
        }
        writeln!(out)?;
        writeln!(out, "{}", "Unusual transactions".bold())?;
        writeln!(out, "{table}")?;
    }

    Ok(())
}
