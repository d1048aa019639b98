//! Small helpers shared by the Markdown renderers.

use chrono::Local;

/// Share of `part` in `total` as a percentage; `0.0` when `total` is zero.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Local wall-clock time as `YYYY-mm-dd HH:MM:SS`.
pub(crate) fn now_display() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// First five keywords joined for a table cell.
pub(crate) fn keyword_cell(keywords: &[String]) -> String {
    keywords
        .iter()
        .take(5)
        .map(|keyword| keyword.replace('|', "\\|"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Relative `<category>/<doc type>` label for a directory.
pub(crate) fn dir_label(category: &str, doc_type: &str) -> String {
    format!("{category}/{doc_type}")
}
