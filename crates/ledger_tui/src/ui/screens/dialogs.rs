use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::{AppState, DraftField, EditorState, FilterField, FilterForm},
    ui::{
        components::{card::Card, money::styled_record_amount, popup::centered},
        theme::Theme,
    },
};

pub fn render_editor(frame: &mut Frame<'_>, area: Rect, editor: &EditorState, theme: &Theme) {
    let rect = centered(area, 60, 11);
    let mut lines: Vec<Line> = DraftField::ALL
        .iter()
        .map(|field| {
            form_line(
                field.label(),
                editor.value(*field),
                editor.focus == *field,
                theme,
            )
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(error_or_hint(
        editor.error.as_deref(),
        "Дата: ГГГГ-ММ-ДД ЧЧ:ММ, сумма: 1234,50",
        theme,
    ));

    Card::modal(&editor.title(), theme).render_with(frame, rect, Paragraph::new(lines).wrap(Wrap { trim: false }));
}

pub fn render_filter(
    frame: &mut Frame<'_>,
    area: Rect,
    form: &FilterForm,
    categories: &[String],
    theme: &Theme,
) {
    let rect = centered(area, 60, 10);
    let kind = form.kind.map(|kind| kind.label()).unwrap_or("все");
    let category_hint = if categories.is_empty() {
        String::new()
    } else {
        format!("  ({} known)", categories.len())
    };

    let lines = vec![
        form_line("Тип", kind, form.focus == FilterField::Kind, theme),
        form_line(
            "Категория",
            &format!("{}{category_hint}", form.category),
            form.focus == FilterField::Category,
            theme,
        ),
        form_line("С", &form.from, form.focus == FilterField::From, theme),
        form_line("По", &form.to, form.focus == FilterField::To, theme),
        form_line(
            "Период",
            form.period.label(),
            form.focus == FilterField::Period,
            theme,
        ),
        Line::from(""),
        error_or_hint(form.error.as_deref(), "Даты: ГГГГ-ММ-ДД, пусто = без границы", theme),
    ];

    Card::modal("Filter", theme).render_with(frame, rect, Paragraph::new(lines));
}

pub fn render_confirm_delete(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(record) = &state.pending_delete else {
        return;
    };
    let rect = centered(area, 56, 7);
    let date = record
        .timestamp
        .with_timezone(&state.tz())
        .format("%d.%m.%Y %H:%M")
        .to_string();

    let lines = vec![
        Line::from(format!("Удалить запись #{}?", record.id)),
        Line::from(vec![
            Span::raw(format!("{date}  ")),
            styled_record_amount(record.amount, record.kind, theme),
            Span::raw(format!("  {}", record.category.as_deref().unwrap_or(""))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.accent)),
            Span::raw(" удалить   "),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" отмена"),
        ]),
    ];

    Card::modal("Delete", theme).render_with(frame, rect, Paragraph::new(lines));
}

fn form_line(label: &str, value: &str, focused: bool, theme: &Theme) -> Line<'static> {
    let label = Span::styled(
        format!("{label:<10} "),
        Style::default().fg(theme.text_muted),
    );
    let value = if focused {
        Span::styled(
            format!("{value}_"),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(value.to_string(), Style::default().fg(theme.text))
    };
    Line::from(vec![label, value])
}

fn error_or_hint(error: Option<&str>, hint: &'static str, theme: &Theme) -> Line<'static> {
    match error {
        Some(error) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(theme.error),
        )),
        None => Line::from(Span::styled(hint, Style::default().fg(theme.dim))),
    }
}
