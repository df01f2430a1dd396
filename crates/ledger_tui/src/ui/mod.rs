pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, Mode, Section},
    config,
};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    match state.section {
        Section::Records => {
            let page = state.view.current_page();
            match state.layout {
                config::Layout::Plain => screens::records::render(frame, layout[2], state, &page),
                config::Layout::Dashboard => {
                    screens::dashboard::render(frame, layout[2], state, &page)
                }
            }
        }
        Section::Analytics => screens::analytics::render(frame, layout[2], state),
    }

    render_bottom_bar(frame, layout[3], state, &theme);

    match state.mode {
        Mode::Editor => {
            if let Some(editor) = &state.editor {
                screens::dialogs::render_editor(frame, area, editor, &theme);
            }
        }
        Mode::Filter => screens::dialogs::render_filter(
            frame,
            area,
            &state.filter,
            &state.view.categories(),
            &theme,
        ),
        Mode::ConfirmDelete => screens::dialogs::render_confirm_delete(frame, area, state, &theme),
        Mode::Browse | Mode::Search | Mode::Period => {}
    }

    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|at| at.with_timezone(&state.tz()).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let (status, status_style) = if state.connected {
        ("OK", Style::default().fg(theme.positive))
    } else {
        ("ERR", Style::default().fg(theme.error))
    };
    let muted = Style::default().fg(theme.text_muted);

    let line = Line::from(vec![
        Span::styled("Server", muted),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Records", muted),
        Span::raw(format!(": {}  ", state.view.len())),
        Span::styled("Layout", muted),
        Span::raw(format!(": {}  ", state.layout.label())),
        Span::styled("Refresh", muted),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let hints = components::hints::for_state(state);
    let bar = Paragraph::new(Line::from(components::hints::hints_to_spans(&hints, theme)));
    frame.render_widget(bar, area);
}
