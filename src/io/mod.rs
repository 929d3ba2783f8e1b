use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write;
use std::time::Duration;

use crate::grid::Grid;
use crate::search::SearchResult;

/// Renders each row as `[a, b, c]` on its own line.
pub fn format_grid(grid: &Grid) -> String {
    let mut out = String::new();
    for row in grid.iter_rows() {
        let _ = writeln!(out, "{row:?}");
    }
    out
}

pub fn format_result(result: &SearchResult) -> String {
    match result {
        Some(found) => found.to_string(),
        None => "Not found".to_string(),
    }
}

pub fn create_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
