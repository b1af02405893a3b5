//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically; the
//! `display.color = false` setting forces plain output.

use colored::{ColoredString, Colorize};
use itertools::Itertools;

use crate::config::DisplaySettings;
use crate::domain::{Forest, ForestConvert, Totals};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark) to stderr, keeping stdout for data
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Apply the color setting for the rest of the process.
pub fn configure(display: &DisplaySettings) {
    if !display.color {
        colored::control::set_override(false);
    }
}

/// Color a variance percentage: green above zero, red below.
pub fn colored_variance(variance: f64) -> ColoredString {
    let text = format!("{:.2}%", variance);
    if variance > 0.0 {
        text.green()
    } else if variance < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}

/// Grand total line; an undefined variance prints as `NaN%`.
pub fn grand_total_line(totals: &Totals, decimals: usize) -> String {
    format!(
        "{}  {:.*}  [{}]",
        "Grand Total".bold(),
        decimals,
        totals.grand_total,
        colored_variance(totals.variance)
    )
}

/// The whole ledger as text: one tree per root, then the grand total.
pub fn render_tree(forest: &Forest, display: &DisplaySettings) -> String {
    let trees = forest
        .to_tree_string(display.decimals)
        .iter()
        .map(|tree| tree.to_string())
        .join("");
    format!(
        "{}{}\n",
        trees,
        grand_total_line(&forest.totals(), display.decimals)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{demo_seed, ForestBuilder};

    #[test]
    fn given_demo_forest_when_render_tree_then_ends_with_grand_total() {
        colored::control::set_override(false);
        let forest = ForestBuilder::new().build(&demo_seed()).unwrap();
        let text = render_tree(&forest, &DisplaySettings::default());
        assert!(text.contains("Electronics  1500.00  [7.14%]"));
        assert!(text.contains("Chairs  700.00  [0.00%]"));
        assert!(text.trim_end().ends_with("Grand Total  2500.00  [4.17%]"));
    }

    #[test]
    fn given_nan_variance_when_grand_total_line_then_prints_nan() {
        colored::control::set_override(false);
        let totals = Totals {
            grand_total: 0.0,
            original_total: 0.0,
            variance: f64::NAN,
        };
        assert_eq!(grand_total_line(&totals, 2), "Grand Total  0.00  [NaN%]");
    }
}
