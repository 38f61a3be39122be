use console::style;

use passgen::breach::BreachReport;
use passgen::{Strength, StrengthLabel};

const BAR_CELLS: u8 = 10;

/// `Strength: Medium [██████░░░░] 60`, coloured by label.
pub(crate) fn render(strength: Strength) -> String {
    let filled = usize::from(strength.score / (100 / BAR_CELLS));
    let empty = usize::from(BAR_CELLS) - filled;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(empty));
    let bar = match strength.label {
        StrengthLabel::Weak => style(bar).red(),
        StrengthLabel::Medium => style(bar).yellow(),
        StrengthLabel::Strong => style(bar).green(),
    };
    format!("Strength: {} [{}] {}", strength.label, bar, strength.score)
}

pub(crate) fn breach_warning(report: &BreachReport) -> String {
    format!(
        "{} This password was found in a data breach! (seen {} times)",
        style("⚠").yellow().bold(),
        report.count
    )
}
