use ratatui::{style::Style, text::Span};

use crate::{
    app::{AppState, Mode, Section},
    ui::theme::Theme,
};

/// A key and what it does, shown in the bottom bar.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

const fn hint(key: &'static str, action: &'static str) -> KeyHint {
    KeyHint { key, action }
}

const RECORDS: &[KeyHint] = &[
    hint("←→", "page"),
    hint("↑↓", "select"),
    hint("a", "add"),
    hint("e", "edit"),
    hint("d", "delete"),
    hint("/", "search"),
    hint("f", "filter"),
    hint("c", "clear"),
    hint("s", "sort"),
    hint("+/-", "rows"),
    hint("x", "export"),
    hint("r", "reload"),
];

const ANALYTICS: &[KeyHint] = &[
    hint("f", "period"),
    hint("t", "today"),
    hint("r", "refresh"),
    hint("x", "export"),
    hint("o", "report"),
];

const SEARCH: &[KeyHint] = &[hint("Enter", "done"), hint("Esc", "close")];

const FILTER: &[KeyHint] = &[
    hint("Tab", "next"),
    hint("←→", "choose"),
    hint("Enter", "apply"),
    hint("Esc", "cancel"),
];

const EDITOR: &[KeyHint] = &[
    hint("Tab", "next"),
    hint("Space", "type"),
    hint("Enter", "save"),
    hint("Esc", "cancel"),
];

const CONFIRM: &[KeyHint] = &[hint("y", "delete"), hint("n", "keep")];

const PERIOD: &[KeyHint] = &[
    hint("Tab", "from/to"),
    hint("Enter", "load"),
    hint("Esc", "cancel"),
];

const GLOBAL: &[KeyHint] = &[hint("1/2", "nav"), hint("l", "layout"), hint("q", "quit")];

/// Hints of the current mode, then the global ones while browsing.
pub fn for_state(state: &AppState) -> Vec<KeyHint> {
    let context = match state.mode {
        Mode::Browse => match state.section {
            Section::Records => RECORDS,
            Section::Analytics => ANALYTICS,
        },
        Mode::Search => SEARCH,
        Mode::Filter => FILTER,
        Mode::Editor => EDITOR,
        Mode::ConfirmDelete => CONFIRM,
        Mode::Period => PERIOD,
    };

    let mut hints = context.to_vec();
    if state.mode == Mode::Browse {
        hints.extend_from_slice(GLOBAL);
    }
    hints
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}
