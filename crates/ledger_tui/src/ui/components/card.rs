use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::ui::theme::Theme;

/// How strongly a card stands out from its neighbours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Emphasis {
    #[default]
    Normal,
    /// The card currently takes keyboard input.
    Active,
    /// Drawn over other content; clears what is underneath.
    Modal,
}

/// Rounded panel with an accent title.
pub struct Card<'a> {
    title: &'a str,
    theme: &'a Theme,
    emphasis: Emphasis,
}

impl<'a> Card<'a> {
    pub fn new(title: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            theme,
            emphasis: Emphasis::Normal,
        }
    }

    pub fn modal(title: &'a str, theme: &'a Theme) -> Self {
        Self {
            emphasis: Emphasis::Modal,
            ..Self::new(title, theme)
        }
    }

    pub fn active(mut self, active: bool) -> Self {
        if active && self.emphasis == Emphasis::Normal {
            self.emphasis = Emphasis::Active;
        }
        self
    }

    pub fn block(&self) -> Block<'a> {
        let (border, title) = match self.emphasis {
            Emphasis::Normal => (self.theme.border, Style::default().fg(self.theme.accent)),
            Emphasis::Active | Emphasis::Modal => (
                self.theme.border_focused,
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        };

        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(Span::styled(format!(" {} ", self.title), title))
            .style(Style::default().bg(self.theme.surface))
    }

    /// Draws the empty panel and returns the area left for its content.
    pub fn render_frame(&self, frame: &mut Frame<'_>, area: Rect) -> Rect {
        if self.emphasis == Emphasis::Modal {
            frame.render_widget(Clear, area);
        }
        let block = self.block();
        let inner = block.inner(area);
        frame.render_widget(block, area);
        inner
    }

    pub fn render_with<W: Widget>(&self, frame: &mut Frame<'_>, area: Rect, content: W) {
        let inner = self.render_frame(frame, area);
        frame.render_widget(content, inner);
    }
}

/// One headline figure with an optional caption under it.
pub struct FigureCard<'a> {
    title: &'a str,
    value: Span<'static>,
    caption: Option<String>,
    theme: &'a Theme,
}

impl<'a> FigureCard<'a> {
    pub fn new(title: &'a str, value: Span<'static>, theme: &'a Theme) -> Self {
        Self {
            title,
            value,
            caption: None,
            theme,
        }
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn render(self, frame: &mut Frame<'_>, area: Rect) {
        let value = Span::styled(
            self.value.content,
            self.value.style.add_modifier(Modifier::BOLD),
        );
        let mut lines = vec![Line::from(value)];
        if let Some(caption) = self.caption {
            lines.push(Line::styled(caption, Style::default().fg(self.theme.dim)));
        }

        let body = Paragraph::new(lines).alignment(Alignment::Center);
        Card::new(self.title, self.theme).render_with(frame, area, body);
    }
}
