//! CLI output formatting and progress reporting.
//!
//! Each operation has a `format_*` function (returns lines) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure —
//! no I/O, no side effects.
//!
//! Progress bars go to stderr via indicatif and carry no correctness
//! weight: hiding them changes nothing about a run's result.

use crate::convert::BatchOutcome;
use crate::filmstrip::FilmstripSummary;
use indicatif::ProgressBar;

/// A progress bar over `len` steps, or a hidden one when `enabled` is false
/// (tests, `process` sub-steps that print their own summaries).
pub fn progress_bar(len: u64, enabled: bool) -> ProgressBar {
    if enabled {
        ProgressBar::new(len)
    } else {
        ProgressBar::hidden()
    }
}

/// One-line summary of a conversion batch.
///
/// ```text
/// Converted 4 of 5 files (1 skipped)
/// ```
pub fn format_batch_summary(outcome: &BatchOutcome) -> String {
    if outcome.failed == 0 {
        format!("Converted {} of {} files", outcome.converted(), outcome.total())
    } else {
        format!(
            "Converted {} of {} files ({} skipped)",
            outcome.converted(),
            outcome.total(),
            outcome.failed
        )
    }
}

/// Multi-line summary of a filmstrip build.
///
/// ```text
/// Filmstrip: shots/strip.webp
/// Grid: 4x4 (10 images, 6 empty cells)
/// Canvas: 400x400px
/// File size: 12.34 KB
/// ```
pub fn format_filmstrip_summary(summary: &FilmstripSummary) -> Vec<String> {
    let side = summary.spec.side as usize;
    let empty = side * side - summary.placed;
    vec![
        format!("Filmstrip: {}", summary.output.display()),
        format!(
            "Grid: {}x{} ({} images, {} empty cells)",
            summary.spec.side, summary.spec.side, summary.placed, empty
        ),
        format!(
            "Canvas: {}x{}px",
            summary.spec.canvas_width(),
            summary.spec.canvas_height()
        ),
        format!("File size: {:.2} KB", summary.output_bytes as f64 / 1024.0),
    ]
}

pub fn print_batch_summary(outcome: &BatchOutcome) {
    println!("{}", format_batch_summary(outcome));
}

pub fn print_filmstrip_summary(summary: &FilmstripSummary) {
    for line in format_filmstrip_summary(summary) {
        println!("{line}");
    }
}
