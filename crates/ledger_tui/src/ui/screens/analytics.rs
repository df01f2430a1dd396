use api_types::analytics::Aggregate;
use ledger_view::analytics::{self, format_major};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};

use crate::{
    app::{AppState, Mode, RangeField},
    ui::{
        components::{card::Card, charts::ascii_bar, money::styled_record_amount},
        theme::Theme,
    },
};

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Min(5),
        ])
        .split(area);

    render_period(frame, layout[0], state, &theme);

    let Some(data) = &state.analytics.data else {
        let message = state
            .analytics
            .error
            .as_deref()
            .unwrap_or("Нет данных. Нажмите r, чтобы загрузить.");
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(theme.dim)))
                .alignment(Alignment::Center),
            layout[1],
        );
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);
    match (data.income, data.expense) {
        (None, None) => {
            render_aggregate(frame, layout[1], "Period", data.totals(), theme.accent, &theme)
        }
        (income, expense) => {
            let income = income.unwrap_or_default();
            let expense = expense.unwrap_or_default();
            render_aggregate(frame, cols[0], "Income", income, theme.positive, &theme);
            render_aggregate(frame, cols[1], "Expense", expense, theme.negative, &theme);
        }
    }

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(layout[2]);
    render_categories(frame, bottom[0], state, &theme);
    render_details(frame, bottom[1], state, &theme);
}

fn render_period(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let editing = state.mode == Mode::Period;
    let field = |value: &str, focused: bool| {
        if editing && focused {
            Span::styled(
                format!("{value}_"),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(value.to_string(), Style::default().fg(theme.text))
        }
    };

    let analytics = &state.analytics;
    let line = Line::from(vec![
        Span::styled("From ", Style::default().fg(theme.text_muted)),
        field(&analytics.from, analytics.focus == RangeField::From),
        Span::styled("   To ", Style::default().fg(theme.text_muted)),
        field(&analytics.to, analytics.focus == RangeField::To),
    ]);
    Card::new("Period", theme)
        .active(editing)
        .render_with(frame, area, Paragraph::new(line));
}

fn render_aggregate(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    aggregate: Aggregate,
    color: Color,
    theme: &Theme,
) {
    let label = Style::default().fg(theme.text_muted);
    let row = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name:<10}"), label),
            Span::styled(value, Style::default().fg(color)),
        ])
    };
    let lines = vec![
        row("Sum", format_major(aggregate.sum)),
        row("Average", format_major(aggregate.avg)),
        row("Count", aggregate.count.to_string()),
        row("Median", format_major(aggregate.median)),
        row("P90", format_major(aggregate.percent90)),
    ];
    Card::new(title, theme).render_with(frame, area, Paragraph::new(lines));
}

fn render_categories(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let inner = Card::new("By category", theme).render_frame(frame, area);

    let totals = analytics::by_category(&state.analytics.details);
    let max = totals
        .first()
        .map(|total| total.total.minor().max(0) as u64)
        .unwrap_or(0);
    let bar_width = (inner.width as usize).saturating_sub(30).clamp(4, 20);
    let lines: Vec<Line> = totals
        .iter()
        .take(inner.height as usize)
        .map(|total| {
            Line::from(vec![
                Span::styled(
                    format!("{:<14.14} ", total.category),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    ascii_bar(total.total.minor().max(0) as u64, max, bar_width),
                    Style::default().fg(theme.accent),
                ),
                Span::raw(format!(" {}", total.total)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_details(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("Operations", theme);
    let tz = state.tz();
    let rows = state.analytics.details.iter().map(|record| {
        Row::new(vec![
            Cell::from(record.timestamp.with_timezone(&tz).format(DATE_FORMAT).to_string()),
            Cell::from(record.kind.label()),
            Cell::from(styled_record_amount(record.amount, record.kind, theme)),
            Cell::from(record.category.clone().unwrap_or_default()),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(7),
            Constraint::Length(18),
            Constraint::Min(8),
        ],
    )
    .header(
        Row::new(["Date", "Type", "Amount", "Category"])
            .style(Style::default().fg(theme.text_muted).add_modifier(Modifier::BOLD)),
    )
    .block(card.block());
    frame.render_widget(table, area);
}
