use ledger_view::{CategoryTotal, DayTotals};
use ratatui::{
    Frame,
    layout::{Direction, Rect},
    style::{Color, Modifier, Style},
    widgets::{BarChart, Paragraph, Sparkline},
};

use crate::ui::{components::card::Card, theme::Theme};

/// Whole currency units of the largest categories, for a bar chart.
pub fn category_bars(totals: &[CategoryTotal], limit: usize) -> Vec<(String, u64)> {
    totals
        .iter()
        .take(limit)
        .map(|total| {
            let major = total.total.minor().max(0) as u64 / 100;
            (total.category.clone(), major)
        })
        .collect()
}

/// Per-day income and expense series in whole currency units.
pub fn day_series(days: &[DayTotals]) -> (Vec<u64>, Vec<u64>) {
    days.iter()
        .map(|day| {
            (
                day.income.minor().max(0) as u64 / 100,
                day.expense.minor().max(0) as u64 / 100,
            )
        })
        .unzip()
}

/// Horizontal bar chart inside a card; shows a placeholder when empty.
pub fn render_bar_chart(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    bars: &[(String, u64)],
    theme: &Theme,
) {
    let inner = Card::new(title, theme).render_frame(frame, area);

    if bars.is_empty() {
        frame.render_widget(
            Paragraph::new("Нет данных").style(Style::default().fg(theme.dim)),
            inner,
        );
        return;
    }

    let data: Vec<(&str, u64)> = bars
        .iter()
        .map(|(label, value)| (label.as_str(), *value))
        .collect();
    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .data(data.as_slice())
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(theme.text_muted));
    frame.render_widget(chart, inner);
}

pub fn render_sparkline(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    data: &[u64],
    color: Color,
    theme: &Theme,
) {
    let sparkline = Sparkline::default()
        .data(data)
        .style(Style::default().fg(color));
    Card::new(title, theme).render_with(frame, area, sparkline);
}

/// Text bar such as `████░░░░`, for tables.
#[must_use]
pub fn ascii_bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return "░".repeat(width);
    }

    let ratio = (value as f64 / max as f64).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
