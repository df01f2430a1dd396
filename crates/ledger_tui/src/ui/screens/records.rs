use ledger_view::{Page, Record};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::{AppState, Mode},
    ui::{components::money::styled_record_amount, theme::Theme},
};

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Plain layout: status line, record table and pager.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, page: &Page) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_status(frame, layout[0], state, &theme);
    render_table(frame, layout[1], state, page, &theme);
    render_pager(frame, layout[2], page, &theme);
}

/// Active filter, search term and sort order in one line.
pub fn render_status(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let label = Style::default().fg(theme.text_muted);
    let criteria = state.view.criteria();

    let mut filters = Vec::new();
    if let Some(kind) = criteria.kind {
        filters.push(kind.label().to_string());
    }
    if let Some(category) = criteria.category.as_deref() {
        filters.push(format!("#{category}"));
    }
    match (criteria.from, criteria.to) {
        (None, None) => {}
        (from, to) => filters.push(format!(
            "{}..{}",
            from.map(|day| day.to_string()).unwrap_or_default(),
            to.map(|day| day.to_string()).unwrap_or_default()
        )),
    }
    let filters = if filters.is_empty() {
        "none".to_string()
    } else {
        filters.join(" ")
    };

    let search = if state.mode == Mode::Search {
        Span::styled(
            format!("{}_", state.search_input),
            Style::default().fg(theme.accent),
        )
    } else if state.view.search_term().is_empty() {
        Span::raw("-")
    } else {
        Span::raw(state.view.search_term().to_string())
    };

    let line = Line::from(vec![
        Span::styled("Filter", label),
        Span::raw(format!(": {filters}   ")),
        Span::styled("Search", label),
        Span::raw(": "),
        search,
        Span::raw("   "),
        Span::styled("Sort", label),
        Span::raw(format!(": {}", state.view.order().label())),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

pub fn render_table(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    page: &Page,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" Records ", Style::default().fg(theme.accent)));

    if page.visible.is_empty() {
        let message = if state.view.is_empty() {
            "Записей нет. Нажмите a, чтобы добавить."
        } else {
            "Ничего не найдено."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(theme.dim))).block(block),
            area,
        );
        return;
    }

    let tz = state.tz();
    let header = Row::new(["ID", "Date", "Type", "Amount", "Category", "Description"])
        .style(Style::default().fg(theme.text_muted).add_modifier(Modifier::BOLD));
    let rows = page
        .visible
        .iter()
        .map(|record| record_row(record, tz, theme));

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(16),
            Constraint::Length(7),
            Constraint::Length(18),
            Constraint::Length(16),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("» ");

    let mut table_state = TableState::default();
    table_state.select(Some(state.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn record_row(record: &Record, tz: chrono_tz::Tz, theme: &Theme) -> Row<'static> {
    Row::new(vec![
        Cell::from(record.id.to_string()),
        Cell::from(record.timestamp.with_timezone(&tz).format(DATE_FORMAT).to_string()),
        Cell::from(record.kind.label()),
        Cell::from(styled_record_amount(record.amount, record.kind, theme)),
        Cell::from(record.category.clone().unwrap_or_default()),
        Cell::from(record.note.clone().unwrap_or_default()),
    ])
}

pub fn render_pager(frame: &mut Frame<'_>, area: Rect, page: &Page, theme: &Theme) {
    let arrow = |enabled: bool, symbol: &'static str| {
        let color = if enabled { theme.accent } else { theme.dim };
        Span::styled(symbol, Style::default().fg(color))
    };
    let first = if page.visible.is_empty() {
        0
    } else {
        page.offset() + 1
    };
    let last = page.offset() + page.visible.len();

    let line = Line::from(vec![
        arrow(page.has_prev(), "◀ "),
        Span::raw(format!("Page {}/{}", page.page_number, page.page_count())),
        arrow(page.has_next(), " ▶"),
        Span::styled(
            format!("   {first}-{last} of {}   {} per page", page.total, page.page_size),
            Style::default().fg(theme.text_muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
