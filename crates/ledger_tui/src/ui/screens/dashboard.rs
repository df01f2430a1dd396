use ledger_view::{Kind, Page, Record, Summary, analytics};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::FigureCard,
            charts::{category_bars, day_series, render_bar_chart, render_sparkline},
            money::{percentage, styled_balance},
        },
        screens::records,
        theme::Theme,
    },
};

const CATEGORY_BARS: usize = 6;

/// Dashboard layout: summary cards and charts over the filtered set, then
/// the same table and pager as the plain layout.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, page: &Page) {
    let theme = Theme::default();
    let visible = state.view.visible_records();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(9),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_summary(frame, layout[0], &visible, &theme);
    render_charts(frame, layout[1], state, &visible, &theme);
    records::render_status(frame, layout[2], state, &theme);
    records::render_table(frame, layout[3], state, page, &theme);
    records::render_pager(frame, layout[4], page, &theme);
}

fn render_summary(frame: &mut Frame<'_>, area: Rect, visible: &[Record], theme: &Theme) {
    let summary = Summary::of(visible);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let income = Span::styled(
        summary.income.to_string(),
        Style::default().fg(theme.positive),
    );
    FigureCard::new("Income", income, theme).render(frame, cols[0]);

    let expense = Span::styled(
        summary.expense.to_string(),
        Style::default().fg(theme.negative),
    );
    let mut expense_card = FigureCard::new("Expense", expense, theme);
    if summary.income.is_positive() {
        expense_card = expense_card.caption(format!(
            "{}% of income",
            percentage(summary.expense, summary.income)
        ));
    }
    expense_card.render(frame, cols[1]);

    FigureCard::new("Balance", styled_balance(summary.balance(), theme), theme)
        .caption(format!("{} records", summary.count))
        .render(frame, cols[2]);
}

fn render_charts(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    visible: &[Record],
    theme: &Theme,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let expenses: Vec<Record> = visible
        .iter()
        .filter(|record| record.kind == Kind::Expense)
        .cloned()
        .collect();
    let bars = category_bars(&analytics::by_category(&expenses), CATEGORY_BARS);
    render_bar_chart(frame, cols[0], "Expenses by category", &bars, theme);

    let (_, daily_expense) = day_series(&analytics::timeline(visible, state.tz()));
    render_sparkline(
        frame,
        cols[1],
        "Expenses per day",
        &daily_expense,
        theme.negative,
        theme,
    );
}
