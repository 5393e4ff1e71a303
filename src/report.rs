//! Rendering of reconciliation results for administrators

use crate::version::checker::{ReconciliationResult, SourceReport, SourceStatus};

const HEADERS: [&str; 4] = ["Database", "Local Version", "Remote Version", "Status"];

/// Render the result as a plain-text table
pub fn render_table(result: &ReconciliationResult) -> String {
    let rows: Vec<[String; 4]> = result.reports.iter().map(row).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format!("Dataset: {}\n\n", result.dataset);
    out.push_str(&format_line(&HEADERS.map(String::from), &widths));
    out.push_str(&format_line(&widths.map(|w| "-".repeat(w)), &widths));
    for row in &rows {
        out.push_str(&format_line(row, &widths));
    }

    if result.update_available() {
        out.push_str("\nAn update is available. Re-run the enrichment pipeline to refresh the dataset.\n");
    } else if result.needs_attention() {
        out.push_str("\nSome sources could not be checked.\n");
    }

    out
}

/// Render the result as pretty-printed JSON
pub fn render_json(result: &ReconciliationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

fn row(report: &SourceReport) -> [String; 4] {
    let local = report
        .local_version
        .as_ref()
        .map_or_else(|| "n/a".to_string(), |v| v.to_string());

    let remote = report
        .remote_version
        .as_ref()
        .map_or_else(|| "error".to_string(), |v| v.to_string());

    // Without a remote version the detail is the fetch error
    let status = match (&report.status, &report.detail, &report.remote_version) {
        (SourceStatus::Unknown, Some(detail), None) => format!("ERROR: {}", detail),
        (SourceStatus::Unknown, Some(detail), Some(_)) => {
            format!("{} ({})", SourceStatus::Unknown.label(), detail)
        }
        (status, _, _) => status.label().to_string(),
    };

    [report.source.to_string(), local, remote, status]
}

fn format_line(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{}\n", line.trim_end())
}
