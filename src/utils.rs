use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    management::TableOutcome,
    types::{PersistTableRow, TableCountRow},
};

const SPINNER_TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Steady-ticking spinner for long CLI operations.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars(SPINNER_TICKS));
    }
    pb
}

/// Formats a duration as seconds with two decimals, e.g. `1.25s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

/// Display rows for the outcome of a persistence run.
pub fn persist_rows(outcomes: &[TableOutcome]) -> Vec<PersistTableRow> {
    outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(rows) => PersistTableRow {
                table: outcome.table.to_string(),
                rows: *rows,
                status: "ok".to_string(),
            },
            Err(e) => PersistTableRow {
                table: outcome.table.to_string(),
                rows: 0,
                status: format!("failed: {}", e),
            },
        })
        .collect()
}

/// Sorts summary rows by row count, largest first, then by table name.
pub fn sort_count_rows(rows: &mut [TableCountRow]) {
    rows.sort_by(|a, b| b.rows.cmp(&a.rows).then_with(|| a.table.cmp(&b.table)));
}
