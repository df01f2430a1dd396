use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{ToastLevel, ToastState},
    ui::theme::Theme,
};

/// Draws the current toast in the bottom-right corner, above the key bar.
pub fn render(frame: &mut Frame<'_>, area: Rect, toast: Option<&ToastState>, theme: &Theme) {
    let Some(toast) = toast else {
        return;
    };
    let text_width = toast.message.chars().count() as u16;
    let width = text_width.saturating_add(4).min(area.width);
    let height = 3u16.min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width),
        y: area.y + area.height.saturating_sub(height + 1),
        width,
        height,
    };

    let color = match toast.level {
        ToastLevel::Info => theme.text,
        ToastLevel::Success => theme.positive,
        ToastLevel::Warning => theme.warning,
        ToastLevel::Error => theme.error,
    };
    let style = Style::default().fg(color);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(Line::from(toast.message.as_str()))
            .style(style)
            .block(block),
        rect,
    );
}
