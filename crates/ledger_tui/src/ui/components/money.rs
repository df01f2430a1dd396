use ledger_view::{Amount, Kind};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// An amount signed and colored by the kind of its record.
#[must_use]
pub fn styled_record_amount(amount: Amount, kind: Kind, theme: &Theme) -> Span<'static> {
    let (color, prefix) = match kind {
        Kind::Income => (theme.positive, "+"),
        Kind::Expense => (theme.negative, "-"),
    };
    Span::styled(format!("{prefix}{amount}"), Style::default().fg(color))
}

/// A signed total (e.g. the balance) colored by its sign.
#[must_use]
pub fn styled_balance(amount: Amount, theme: &Theme) -> Span<'static> {
    let color = if amount.is_positive() {
        theme.positive
    } else if amount.minor() < 0 {
        theme.negative
    } else {
        theme.text
    };
    Span::styled(
        amount.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Share of `part` in `whole` as a whole percentage, 0 when `whole` is empty.
#[must_use]
pub fn percentage(part: Amount, whole: Amount) -> u16 {
    if whole.minor() <= 0 {
        return 0;
    }
    ((part.minor() as f64 / whole.minor() as f64) * 100.0).clamp(0.0, 100.0) as u16
}
