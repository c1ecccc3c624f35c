use serde::Serialize;

use crate::cli::OutputFormat;
use crate::storage::{DividendRecord, YearAmount};

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Output a success message in the appropriate format
pub fn output_success<T: Serialize + ?Sized>(output_format: &OutputFormat, message: &str, data: &T) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(data),
        OutputFormat::Text => {
            println!("✓ {}", message);
            Ok(())
        }
    }
}

/// History sorted newest first
pub fn years_descending(entries: &[YearAmount]) -> Vec<YearAmount> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.year.cmp(&a.year));
    sorted
}

/// Case-insensitive sector filter
pub fn filter_by_sector(records: Vec<DividendRecord>, sector: Option<&str>) -> Vec<DividendRecord> {
    match sector {
        Some(sector) => records
            .into_iter()
            .filter(|record| record.sector.eq_ignore_ascii_case(sector))
            .collect(),
        None => records,
    }
}

const RECENT_YEARS: usize = 3;

/// Fixed-width table, one record per line
pub fn dividend_table(records: &[DividendRecord]) -> String {
    let headers = ["ID", "TICKER", "COMPANY", "SECTOR", "FREQUENCY", "AMOUNT", "RECENT"];
    let rows: Vec<[String; 7]> = records
        .iter()
        .map(|record| {
            let recent: Vec<String> = years_descending(&record.year_wise_data)
                .iter()
                .take(RECENT_YEARS)
                .map(YearAmount::to_string)
                .collect();
            [
                record.id.to_string(),
                record.ticker.clone(),
                record.company_name.clone(),
                record.sector.clone(),
                record.frequency.to_string(),
                record.dividend_amount.to_string(),
                recent.join(" "),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[&str]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut lines = vec![render(&headers)];
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(render(&cells));
    }
    lines.join("\n")
}

/// Multi-line view of a single record with its full history
pub fn dividend_detail(record: &DividendRecord) -> String {
    let mut lines = vec![
        format!("{} ({})", record.company_name, record.ticker),
        format!("  id:           {}", record.id),
        format!("  sector:       {}", record.sector),
        format!("  established:  {}", record.established),
        format!("  quoted:       {}", record.quoted_date),
        format!("  fy ending:    {}", record.fy_ending),
        format!("  dividend:     {} ({})", record.dividend_amount, record.frequency),
        format!("  last updated: {}", record.last_updated.to_rfc3339()),
    ];

    if record.year_wise_data.is_empty() {
        lines.push("  history:      (none)".to_string());
    } else {
        lines.push("  history:".to_string());
        for entry in years_descending(&record.year_wise_data) {
            lines.push(format!("    {}  {}", entry.year, entry.amount));
        }
    }

    lines.join("\n")
}
