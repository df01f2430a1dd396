use std::time::{Duration, Instant};

use api_types::{analytics::Analytics, item::Item};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use ledger_view::{
    DateRange, DraftError, Effect, FilterCriteria, Intent, Kind, Period, Record, RecordDraft,
    RecordError, RecordView,
    draft::{self, DATETIME_INPUT_FORMAT},
};

use crate::{
    app::messages,
    client::ClientError,
    config::{AppConfig, Layout},
};

const TOAST_TTL: Duration = Duration::from_secs(4);
const PAGE_SIZE_STEP: usize = 5;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Records,
    Analytics,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Records, Section::Analytics];

    pub fn label(self) -> &'static str {
        match self {
            Self::Records => "Records",
            Self::Analytics => "Analytics",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Records => Self::Analytics,
            Self::Analytics => Self::Records,
        }
    }
}

/// What keyboard input currently goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Search,
    Filter,
    Editor,
    ConfirmDelete,
    Period,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub level: ToastLevel,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterField {
    #[default]
    Kind,
    Category,
    From,
    To,
    Period,
}

impl FilterField {
    pub fn next(self) -> Self {
        match self {
            Self::Kind => Self::Category,
            Self::Category => Self::From,
            Self::From => Self::To,
            Self::To => Self::Period,
            Self::Period => Self::Kind,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Kind => Self::Period,
            Self::Category => Self::Kind,
            Self::From => Self::Category,
            Self::To => Self::From,
            Self::Period => Self::To,
        }
    }
}

/// Raw inputs of the filter bar.
#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    pub kind: Option<Kind>,
    pub category: String,
    pub from: String,
    pub to: String,
    pub period: Period,
    pub focus: FilterField,
    pub error: Option<String>,
}

impl FilterForm {
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            kind: criteria.kind,
            category: criteria.category.clone().unwrap_or_default(),
            from: criteria.from.map(|day| day.to_string()).unwrap_or_default(),
            to: criteria.to.map(|day| day.to_string()).unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn input(&mut self, ch: char) {
        match self.focus {
            FilterField::Category => self.category.push(ch),
            FilterField::From => self.from.push(ch),
            FilterField::To => self.to.push(ch),
            FilterField::Kind | FilterField::Period => {
                if ch == ' ' {
                    self.cycle(true, &[]);
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FilterField::Category => {
                self.category.pop();
            }
            FilterField::From => {
                self.from.pop();
            }
            FilterField::To => {
                self.to.pop();
            }
            FilterField::Kind => self.kind = None,
            FilterField::Period => self.period = Period::All,
        }
    }

    /// Steps the focused choice field; on the category field walks the known
    /// categories.
    pub fn cycle(&mut self, forward: bool, categories: &[String]) {
        match self.focus {
            FilterField::Kind => {
                self.kind = match (self.kind, forward) {
                    (None, true) | (Some(Kind::Expense), false) => Some(Kind::Income),
                    (Some(Kind::Income), true) | (None, false) => Some(Kind::Expense),
                    (Some(Kind::Expense), true) | (Some(Kind::Income), false) => None,
                };
            }
            FilterField::Category => self.cycle_category(forward, categories),
            FilterField::Period => self.period = self.period.next(),
            FilterField::From | FilterField::To => {}
        }
    }

    fn cycle_category(&mut self, forward: bool, categories: &[String]) {
        if categories.is_empty() {
            return;
        }
        let last = categories.len() - 1;
        let current = categories.iter().position(|c| *c == self.category);
        let next = match (current, forward) {
            (None, true) => Some(0),
            (None, false) => Some(last),
            (Some(i), true) => (i < last).then_some(i + 1),
            (Some(0), false) => None,
            (Some(i), false) => Some(i - 1),
        };
        self.category = next
            .and_then(|i| categories.get(i).cloned())
            .unwrap_or_default();
    }

    /// Criteria described by the form; a period preset replaces both typed
    /// day bounds.
    pub fn criteria(&self, now: DateTime<Utc>, tz: Tz) -> Result<FilterCriteria, DraftError> {
        let criteria = FilterCriteria {
            kind: self.kind,
            category: Some(self.category.trim().to_string()).filter(|c| !c.is_empty()),
            from: draft::parse_day(&self.from)?,
            to: draft::parse_day(&self.to)?,
        };
        Ok(match self.period {
            Period::All => criteria,
            period => period.apply(&criteria, now, tz),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Kind,
    Amount,
    Date,
    Category,
    Note,
}

impl DraftField {
    pub const ALL: [DraftField; 5] = [
        DraftField::Kind,
        DraftField::Amount,
        DraftField::Date,
        DraftField::Category,
        DraftField::Note,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Kind => "Тип",
            Self::Amount => "Сумма",
            Self::Date => "Дата",
            Self::Category => "Категория",
            Self::Note => "Описание",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Kind => Self::Amount,
            Self::Amount => Self::Date,
            Self::Date => Self::Category,
            Self::Category => Self::Note,
            Self::Note => Self::Kind,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Kind => Self::Note,
            Self::Amount => Self::Kind,
            Self::Date => Self::Amount,
            Self::Category => Self::Date,
            Self::Note => Self::Category,
        }
    }
}

/// The create/edit modal.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub draft: RecordDraft,
    /// Id of the record being edited, `None` when creating.
    pub editing: Option<i64>,
    pub focus: DraftField,
    pub error: Option<String>,
}

impl EditorState {
    pub fn create(now: DateTime<Utc>, tz: Tz) -> Self {
        Self {
            draft: RecordDraft::new(now, tz),
            editing: None,
            focus: DraftField::Amount,
            error: None,
        }
    }

    pub fn edit(record: &Record, tz: Tz) -> Self {
        Self {
            draft: RecordDraft::from_record(record, tz),
            editing: Some(record.id),
            focus: DraftField::Amount,
            error: None,
        }
    }

    pub fn title(&self) -> String {
        match self.editing {
            Some(id) => format!("Запись #{id}"),
            None => "Новая запись".to_string(),
        }
    }

    pub fn value(&self, field: DraftField) -> &str {
        match field {
            DraftField::Kind => Kind::parse(&self.draft.kind)
                .map(Kind::label)
                .unwrap_or(self.draft.kind.as_str()),
            DraftField::Amount => &self.draft.amount,
            DraftField::Date => &self.draft.date,
            DraftField::Category => &self.draft.category,
            DraftField::Note => &self.draft.note,
        }
    }

    pub fn input(&mut self, ch: char) {
        if self.focus == DraftField::Kind {
            match ch {
                '+' => self.draft.kind = Kind::Income.code().to_string(),
                '-' => self.draft.kind = Kind::Expense.code().to_string(),
                ' ' => self.toggle_kind(),
                _ => {}
            }
            return;
        }
        if let Some(field) = self.text_field_mut() {
            field.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.text_field_mut() {
            field.pop();
        }
    }

    pub fn toggle_kind(&mut self) {
        let kind = Kind::parse(&self.draft.kind)
            .map(Kind::toggled)
            .unwrap_or(Kind::Expense);
        self.draft.kind = kind.code().to_string();
    }

    fn text_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            DraftField::Kind => None,
            DraftField::Amount => Some(&mut self.draft.amount),
            DraftField::Date => Some(&mut self.draft.date),
            DraftField::Category => Some(&mut self.draft.category),
            DraftField::Note => Some(&mut self.draft.note),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    From,
    To,
}

#[derive(Debug, Clone)]
pub struct AnalyticsState {
    pub from: String,
    pub to: String,
    pub focus: RangeField,
    /// Period of `data`, once loaded.
    pub range: Option<DateRange>,
    pub data: Option<Analytics>,
    pub details: Vec<Record>,
    pub error: Option<String>,
}

impl AnalyticsState {
    pub fn new(now: DateTime<Utc>, tz: Tz) -> Self {
        let mut state = Self {
            from: String::new(),
            to: String::new(),
            focus: RangeField::From,
            range: None,
            data: None,
            details: Vec::new(),
            error: None,
        };
        state.set_inputs(DateRange::today(now, tz), tz);
        state
    }

    pub fn set_inputs(&mut self, range: DateRange, tz: Tz) {
        self.from = range
            .from
            .with_timezone(&tz)
            .format(DATETIME_INPUT_FORMAT)
            .to_string();
        self.to = range
            .to
            .with_timezone(&tz)
            .format(DATETIME_INPUT_FORMAT)
            .to_string();
    }

    pub fn parse_range(&self, tz: Tz) -> Result<DateRange, DraftError> {
        DateRange::parse(&self.from, &self.to, tz)
    }

    pub fn input(&mut self, ch: char) {
        self.field_mut().push(ch);
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            RangeField::From => RangeField::To,
            RangeField::To => RangeField::From,
        };
    }

    /// Stores a fresh answer for `range`; detail items that are not valid
    /// records are returned and left out.
    pub fn loaded(&mut self, range: DateRange, analytics: Analytics) -> Vec<RecordError> {
        let (details, skipped) = Record::from_items(analytics.details.clone());
        self.details = details;
        self.data = Some(analytics);
        self.range = Some(range);
        self.error = None;
        skipped
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            RangeField::From => &mut self.from,
            RangeField::To => &mut self.to,
        }
    }
}

/// Everything the screens render.
#[derive(Debug)]
pub struct AppState {
    pub view: RecordView,
    pub section: Section,
    pub mode: Mode,
    pub layout: Layout,
    /// Row of the current page under the cursor.
    pub selected: usize,
    pub search_input: String,
    pub filter: FilterForm,
    pub editor: Option<EditorState>,
    pub pending_delete: Option<Record>,
    pub analytics: AnalyticsState,
    pub toast: Option<ToastState>,
    pub connected: bool,
    pub last_refresh: Option<DateTime<Utc>>,
    pub base_url: String,
}

impl AppState {
    pub fn new(config: &AppConfig, tz: Tz, now: DateTime<Utc>) -> Self {
        Self {
            view: RecordView::new(config.page_size, tz),
            section: Section::Records,
            mode: Mode::Browse,
            layout: config.layout,
            selected: 0,
            search_input: String::new(),
            filter: FilterForm::default(),
            editor: None,
            pending_delete: None,
            analytics: AnalyticsState::new(now, tz),
            toast: None,
            connected: false,
            last_refresh: None,
            base_url: config.base_url.clone(),
        }
    }

    pub fn tz(&self) -> Tz {
        self.view.time_zone()
    }

    /// Forwards a presentation intent to the view and keeps the cursor on
    /// the page.
    pub fn dispatch(&mut self, intent: Intent) -> Option<Effect> {
        let effect = self.view.handle(intent);
        self.clamp_selection();
        effect
    }

    /// Handles the effects that need no store round trip. Returns `true`
    /// when the caller has to reload the working set.
    pub fn apply_effect(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::OpenEditor(record) => {
                self.editor = Some(EditorState::edit(&record, self.tz()));
                self.mode = Mode::Editor;
                false
            }
            Effect::ConfirmDelete(record) => {
                self.pending_delete = Some(record);
                self.mode = Mode::ConfirmDelete;
                false
            }
            Effect::Reload => true,
        }
    }

    /// Replaces the working set with a fresh server answer.
    pub fn load_items(&mut self, items: Vec<Item>, now: DateTime<Utc>) -> Vec<RecordError> {
        let (records, skipped) = Record::from_items(items);
        self.view.load(records);
        self.selected = 0;
        self.connected = true;
        self.last_refresh = Some(now);
        if !skipped.is_empty() {
            self.notify(ToastLevel::Warning, messages::skipped_message(&skipped));
        }
        skipped
    }

    /// A failed load keeps the previous working set on screen.
    pub fn load_failed(&mut self, err: &ClientError) {
        if matches!(err, ClientError::Transport(_)) {
            self.connected = false;
        }
        self.notify(ToastLevel::Error, messages::client_message(err));
    }

    pub fn selected_record(&self) -> Option<Record> {
        self.view.current_page().visible.get(self.selected).cloned()
    }

    pub fn select_next(&mut self) {
        let rows = self.view.current_page().visible.len();
        if rows > 0 {
            self.selected = (self.selected + 1).min(rows - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let rows = self.view.current_page().visible.len();
        self.selected = self.selected.min(rows.saturating_sub(1));
    }

    pub fn begin_search(&mut self) {
        self.search_input = self.view.search_term().to_string();
        self.mode = Mode::Search;
    }

    pub fn search_input(&mut self, ch: char) {
        self.search_input.push(ch);
        self.dispatch(Intent::Search(self.search_input.clone()));
    }

    pub fn search_backspace(&mut self) {
        self.search_input.pop();
        self.dispatch(Intent::Search(self.search_input.clone()));
    }

    pub fn begin_filter(&mut self) {
        let period = self.filter.period;
        self.filter = FilterForm {
            period,
            ..FilterForm::from_criteria(self.view.criteria())
        };
        self.mode = Mode::Filter;
    }

    /// Applies the filter form; on invalid input the form stays open with
    /// the error.
    pub fn submit_filter(&mut self, now: DateTime<Utc>) -> bool {
        match self.filter.criteria(now, self.tz()) {
            Ok(criteria) => {
                self.filter.error = None;
                self.dispatch(Intent::Filter(criteria));
                self.mode = Mode::Browse;
                true
            }
            Err(err) => {
                self.filter.error = Some(messages::draft_message(&err));
                false
            }
        }
    }

    pub fn reset_filters(&mut self) {
        self.dispatch(Intent::ResetFilters);
        self.filter = FilterForm::default();
        self.search_input.clear();
    }

    pub fn change_page_size(&mut self, grow: bool) {
        let current = self.view.page_size();
        let size = if grow {
            (current + PAGE_SIZE_STEP).min(MAX_PAGE_SIZE)
        } else {
            current.saturating_sub(PAGE_SIZE_STEP).max(PAGE_SIZE_STEP)
        };
        self.view.set_page_size(size);
        self.clamp_selection();
    }

    pub fn open_creator(&mut self, now: DateTime<Utc>) {
        self.editor = Some(EditorState::create(now, self.tz()));
        self.mode = Mode::Editor;
    }

    pub fn close_dialogs(&mut self) {
        self.editor = None;
        self.pending_delete = None;
        self.mode = Mode::Browse;
    }

    pub fn toggle_layout(&mut self) {
        self.layout = self.layout.toggled();
    }

    pub fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use api_types::item::ItemKind;
    use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn item(id: i64, kind: ItemKind, amount: f64, category: &str) -> Item {
        Item {
            id,
            kind,
            amount,
            date: now() - ChronoDuration::days(id),
            category: Some(category.to_string()),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn state_with(items: Vec<Item>) -> AppState {
        let config = AppConfig {
            page_size: 2,
            timezone: "UTC".to_string(),
            ..Default::default()
        };
        let mut state = AppState::new(&config, chrono_tz::UTC, now());
        state.load_items(items, now());
        state
    }

    #[test]
    fn invalid_items_are_skipped_with_a_warning() {
        let state = state_with(vec![
            item(1, ItemKind::Income, 100.0, "Salary"),
            item(2, ItemKind::Expense, -5.0, "Food"),
        ]);
        assert_eq!(state.view.len(), 1);
        assert!(state.connected);
        let toast = state.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Warning);
    }

    #[test]
    fn failed_load_keeps_the_working_set() {
        let mut state = state_with(vec![item(1, ItemKind::Income, 100.0, "Salary")]);
        state.load_failed(&ClientError::Server {
            status: 500,
            message: "internal".to_string(),
        });
        assert_eq!(state.view.len(), 1);
        assert_eq!(state.toast.as_ref().unwrap().level, ToastLevel::Error);
    }

    #[test]
    fn selection_follows_paging() {
        let mut state = state_with(vec![
            item(1, ItemKind::Expense, 10.0, "Food"),
            item(2, ItemKind::Expense, 20.0, "Food"),
            item(3, ItemKind::Expense, 30.0, "Food"),
        ]);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
        assert_eq!(state.selected_record().unwrap().id, 2);

        state.dispatch(Intent::NextPage);
        assert_eq!(state.selected, 0);
        assert_eq!(state.selected_record().unwrap().id, 3);
    }

    #[test]
    fn typing_a_search_term_applies_it_from_three_chars() {
        let mut state = state_with(vec![
            item(1, ItemKind::Expense, 10.0, "Food"),
            item(2, ItemKind::Expense, 20.0, "Rent"),
        ]);
        state.begin_search();
        state.search_input('f');
        state.search_input('o');
        assert_eq!(state.view.visible_records().len(), 2);
        state.search_input('o');
        assert_eq!(state.view.visible_records().len(), 1);

        state.reset_filters();
        assert_eq!(state.search_input, "");
        assert_eq!(state.view.visible_records().len(), 2);
    }

    #[test]
    fn filter_form_builds_criteria() {
        let mut form = FilterForm::default();
        form.cycle(true, &[]);
        assert_eq!(form.kind, Some(Kind::Income));
        form.focus = FilterField::Category;
        let categories = vec!["Food".to_string(), "Rent".to_string()];
        form.cycle(true, &categories);
        form.cycle(true, &categories);
        assert_eq!(form.category, "Rent");
        form.cycle(true, &categories);
        assert_eq!(form.category, "");

        form.from = "2024-03-01".to_string();
        let criteria = form.criteria(now(), chrono_tz::UTC).unwrap();
        assert_eq!(criteria.from, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(criteria.category, None);

        form.period = Period::Week;
        let criteria = form.criteria(now(), chrono_tz::UTC).unwrap();
        assert_eq!(criteria.from, NaiveDate::from_ymd_opt(2024, 3, 8));

        form.to = "March".to_string();
        assert!(form.criteria(now(), chrono_tz::UTC).is_err());
    }

    #[test]
    fn invalid_filter_keeps_the_form_open() {
        let mut state = state_with(vec![item(1, ItemKind::Income, 100.0, "Salary")]);
        state.begin_filter();
        state.filter.from = "yesterday".to_string();
        assert!(!state.submit_filter(now()));
        assert_eq!(state.mode, Mode::Filter);
        assert!(state.filter.error.is_some());
    }

    #[test]
    fn editor_toggles_kind_and_edits_fields() {
        let mut editor = EditorState::create(now(), chrono_tz::UTC);
        assert_eq!(editor.draft.kind, "expense");
        editor.focus = DraftField::Kind;
        editor.input(' ');
        assert_eq!(editor.value(DraftField::Kind), "Доход");
        editor.input('x');
        assert_eq!(editor.draft.kind, "income");

        editor.focus = DraftField::Amount;
        for ch in "12,5".chars() {
            editor.input(ch);
        }
        editor.backspace();
        assert_eq!(editor.draft.amount, "12,");
    }

    #[test]
    fn effects_open_dialogs() {
        let mut state = state_with(vec![item(1, ItemKind::Income, 100.0, "Salary")]);
        let effect = state.dispatch(Intent::Edit(1)).unwrap();
        assert!(!state.apply_effect(effect));
        assert_eq!(state.mode, Mode::Editor);
        assert_eq!(state.editor.as_ref().unwrap().editing, Some(1));

        state.close_dialogs();
        let effect = state.dispatch(Intent::Delete(1)).unwrap();
        assert!(!state.apply_effect(effect));
        assert_eq!(state.mode, Mode::ConfirmDelete);

        let effect = state.dispatch(Intent::Reload).unwrap();
        assert!(state.apply_effect(effect));
    }

    #[test]
    fn toast_expires() {
        let mut state = state_with(Vec::new());
        state.notify(ToastLevel::Info, "hello");
        state.expire_toast(Instant::now());
        assert!(state.toast.is_some());
        state.expire_toast(Instant::now() + TOAST_TTL);
        assert!(state.toast.is_none());
    }
}
