//! CLI command implementations.

pub mod clean;
pub mod export;
pub mod preview;
pub mod profile;
pub mod serve;
pub mod stats;
pub mod validate;

use colored::{ColoredString, Colorize};
use gridlab::QualityStatus;

/// Status word colored green, yellow or red.
pub(crate) fn status_label(status: QualityStatus) -> ColoredString {
    match status {
        QualityStatus::Good => status.label().green(),
        QualityStatus::Fair => status.label().yellow(),
        QualityStatus::Poor => status.label().red(),
    }
}

/// Color a 0-100 score by how close it is to perfect.
pub(crate) fn score_label(score: f64) -> ColoredString {
    let text = format!("{:.1}", score);
    if score >= 90.0 {
        text.green().bold()
    } else if score >= 70.0 {
        text.yellow().bold()
    } else {
        text.red().bold()
    }
}

/// Shorten `text` to at most `width` characters, marking the cut with `…`.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('…');
    out
}
