use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{app::Section, ui::theme::Theme};

pub fn render_tabs(frame: &mut Frame<'_>, area: Rect, active: Section, theme: &Theme) {
    let mut spans = vec![Span::raw(" ")];

    for (i, section) in Section::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }

        let label = format!("{} {}", i + 1, section.label());
        if *section == active {
            let style = Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD);
            spans.push(Span::styled(format!("[{label}]"), style));
        } else {
            spans.push(Span::styled(label, Style::default().fg(theme.text_muted)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
