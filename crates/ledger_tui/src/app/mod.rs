mod messages;
mod state;

use std::{
    path::Path,
    time::{Duration, Instant},
};

use api_types::analytics::PeriodQuery;
use chrono::{NaiveDate, Utc};
use crossterm::event::{self, Event, KeyEvent};
use ledger_view::{
    DateRange, ExportError, Intent,
    export::{self, ExportKind},
};

use crate::{
    client::{Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use state::{
    AnalyticsState, AppState, DraftField, EditorState, FilterField, FilterForm, Mode, RangeField,
    Section, ToastLevel, ToastState,
};

pub struct App {
    config: AppConfig,
    client: Client,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let tz = config.time_zone()?;
        let client = Client::new(&config.base_url)?;
        let state = AppState::new(&config, tz, Utc::now());

        Ok(Self {
            config,
            client,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        self.load_records().await;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key).await;
            }
            self.state.expire_toast(Instant::now());
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        match self.state.mode {
            Mode::Browse => match self.state.section {
                Section::Records => self.records_key(action).await,
                Section::Analytics => self.analytics_key(action).await,
            },
            Mode::Search => self.search_key(action),
            Mode::Filter => self.filter_key(action),
            Mode::Editor => self.editor_key(action).await,
            Mode::ConfirmDelete => self.confirm_key(action).await,
            Mode::Period => self.period_key(action).await,
        }
    }

    /// Keys shared by both sections while browsing. Returns `true` when the
    /// key was consumed.
    async fn global_key(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::Input('q') => self.should_quit = true,
            AppAction::Input('1') => self.state.section = Section::Records,
            AppAction::Input('2') => self.show_analytics().await,
            AppAction::NextField => match self.state.section.next() {
                Section::Records => self.state.section = Section::Records,
                Section::Analytics => self.show_analytics().await,
            },
            AppAction::Input('l') => self.state.toggle_layout(),
            _ => return false,
        }
        true
    }

    async fn records_key(&mut self, action: AppAction) {
        if self.global_key(action).await {
            return;
        }

        let intent = match action {
            AppAction::Up | AppAction::Input('k') => {
                self.state.select_prev();
                None
            }
            AppAction::Down | AppAction::Input('j') => {
                self.state.select_next();
                None
            }
            AppAction::Right | AppAction::PageDown | AppAction::Input('n') => {
                Some(Intent::NextPage)
            }
            AppAction::Left | AppAction::PageUp | AppAction::Input('p') => Some(Intent::PrevPage),
            AppAction::Home => Some(Intent::GoToPage(1)),
            AppAction::End => Some(Intent::GoToPage(usize::MAX)),
            AppAction::Input('s') => Some(Intent::Sort(self.state.view.order().next())),
            AppAction::Input('r') => Some(Intent::Reload),
            AppAction::Input('e') | AppAction::Submit => {
                self.state.selected_record().map(|record| Intent::Edit(record.id))
            }
            AppAction::Input('d') => self
                .state
                .selected_record()
                .map(|record| Intent::Delete(record.id)),
            AppAction::Input('/') => {
                self.state.begin_search();
                None
            }
            AppAction::Input('f') => {
                self.state.begin_filter();
                None
            }
            AppAction::Input('c') => {
                self.state.reset_filters();
                None
            }
            AppAction::Input('a') => {
                self.state.open_creator(Utc::now());
                None
            }
            AppAction::Input('+') => {
                self.state.change_page_size(true);
                None
            }
            AppAction::Input('-') => {
                self.state.change_page_size(false);
                None
            }
            AppAction::Input('x') => {
                self.export_records().await;
                None
            }
            _ => None,
        };

        if let Some(intent) = intent {
            self.dispatch(intent).await;
        }
    }

    async fn dispatch(&mut self, intent: Intent) {
        let Some(effect) = self.state.dispatch(intent) else {
            return;
        };
        if self.state.apply_effect(effect) {
            self.load_records().await;
        }
    }

    fn search_key(&mut self, action: AppAction) {
        match action {
            AppAction::Input(ch) => self.state.search_input(ch),
            AppAction::Backspace => self.state.search_backspace(),
            AppAction::Submit | AppAction::Cancel => self.state.mode = Mode::Browse,
            _ => {}
        }
    }

    fn filter_key(&mut self, action: AppAction) {
        let categories = self.state.view.categories();
        let form = &mut self.state.filter;
        match action {
            AppAction::NextField | AppAction::Down => form.focus = form.focus.next(),
            AppAction::PrevField | AppAction::Up => form.focus = form.focus.prev(),
            AppAction::Right => form.cycle(true, &categories),
            AppAction::Left => form.cycle(false, &categories),
            AppAction::Input(ch) => form.input(ch),
            AppAction::Backspace => form.backspace(),
            AppAction::Cancel => self.state.mode = Mode::Browse,
            AppAction::Submit => {
                if self.state.submit_filter(Utc::now()) {
                    tracing::debug!(criteria = ?self.state.view.criteria(), "filter applied");
                }
            }
            _ => {}
        }
    }

    async fn editor_key(&mut self, action: AppAction) {
        let Some(editor) = self.state.editor.as_mut() else {
            self.state.mode = Mode::Browse;
            return;
        };
        match action {
            AppAction::NextField | AppAction::Down => editor.focus = editor.focus.next(),
            AppAction::PrevField | AppAction::Up => editor.focus = editor.focus.prev(),
            AppAction::Left | AppAction::Right if editor.focus == DraftField::Kind => {
                editor.toggle_kind()
            }
            AppAction::Input(ch) => editor.input(ch),
            AppAction::Backspace => editor.backspace(),
            AppAction::Cancel => self.state.close_dialogs(),
            AppAction::Submit => self.submit_editor().await,
            _ => {}
        }
    }

    async fn confirm_key(&mut self, action: AppAction) {
        match action {
            AppAction::Input('y') | AppAction::Input('Y') | AppAction::Submit => {
                self.confirm_delete().await
            }
            AppAction::Input('n') | AppAction::Input('N') | AppAction::Cancel => {
                self.state.close_dialogs()
            }
            _ => {}
        }
    }

    async fn analytics_key(&mut self, action: AppAction) {
        if self.global_key(action).await {
            return;
        }

        match action {
            AppAction::Input('f') | AppAction::Submit => self.state.mode = Mode::Period,
            AppAction::Input('t') => {
                let tz = self.state.tz();
                self.state
                    .analytics
                    .set_inputs(DateRange::today(Utc::now(), tz), tz);
                self.submit_period().await;
            }
            AppAction::Input('r') => self.submit_period().await,
            AppAction::Input('x') => self.export_analytics().await,
            AppAction::Input('o') => self.export_report().await,
            _ => {}
        }
    }

    async fn period_key(&mut self, action: AppAction) {
        let analytics = &mut self.state.analytics;
        match action {
            AppAction::NextField | AppAction::PrevField => analytics.toggle_focus(),
            AppAction::Input(ch) => analytics.input(ch),
            AppAction::Backspace => analytics.backspace(),
            AppAction::Cancel => self.state.mode = Mode::Browse,
            AppAction::Submit => {
                self.state.mode = Mode::Browse;
                self.submit_period().await;
            }
            _ => {}
        }
    }

    async fn show_analytics(&mut self) {
        self.state.section = Section::Analytics;
        if self.state.analytics.data.is_none() {
            self.submit_period().await;
        }
    }

    async fn load_records(&mut self) {
        match self.client.list_items().await {
            Ok(items) => {
                let count = items.len();
                let skipped = self.state.load_items(items, Utc::now());
                for err in &skipped {
                    tracing::warn!("skipped item: {err}");
                }
                tracing::info!(count, skipped = skipped.len(), "records loaded");
            }
            Err(err) => {
                tracing::error!("failed to load records: {err}");
                self.state.load_failed(&err);
            }
        }
    }

    async fn submit_editor(&mut self) {
        let tz = self.state.tz();
        let Some(editor) = self.state.editor.as_mut() else {
            return;
        };
        let payload = match editor.draft.validate(tz) {
            Ok(payload) => payload,
            Err(err) => {
                editor.error = Some(messages::draft_message(&err));
                return;
            }
        };

        let editing = editor.editing;
        let result = match editing {
            Some(id) => self.client.update_item(id, &payload).await.map(|()| id),
            None => self.client.create_item(&payload).await,
        };

        match result {
            Ok(id) => {
                tracing::info!(id, updated = editing.is_some(), "record saved");
                self.state.close_dialogs();
                let message = if editing.is_some() {
                    "Запись обновлена."
                } else {
                    "Запись добавлена."
                };
                self.state.notify(ToastLevel::Success, message);
                self.load_records().await;
            }
            Err(err) => {
                tracing::error!("failed to save record: {err}");
                let message = messages::client_message(&err);
                if let Some(editor) = self.state.editor.as_mut() {
                    editor.error = Some(message.clone());
                }
                self.state.notify(ToastLevel::Error, message);
            }
        }
    }

    async fn confirm_delete(&mut self) {
        let Some(record) = self.state.pending_delete.take() else {
            self.state.close_dialogs();
            return;
        };
        self.state.close_dialogs();

        match self.client.delete_item(record.id).await {
            Ok(()) => {
                tracing::info!(id = record.id, "record deleted");
                self.state.notify(ToastLevel::Success, "Запись удалена.");
                self.load_records().await;
            }
            Err(ClientError::NotFound) => {
                tracing::warn!(id = record.id, "record already gone");
                self.state
                    .notify(ToastLevel::Warning, messages::client_message(&ClientError::NotFound));
                self.load_records().await;
            }
            Err(err) => {
                tracing::error!("failed to delete record {}: {err}", record.id);
                self.state
                    .notify(ToastLevel::Error, messages::client_message(&err));
            }
        }
    }

    async fn submit_period(&mut self) {
        let tz = self.state.tz();
        let range = match self.state.analytics.parse_range(tz) {
            Ok(range) => range,
            Err(err) => {
                let message = messages::draft_message(&err);
                self.state.analytics.error = Some(message.clone());
                self.state.notify(ToastLevel::Error, message);
                return;
            }
        };

        let query = PeriodQuery {
            from: range.from,
            to: range.to,
        };
        match self.client.analytics(query).await {
            Ok(analytics) => {
                let skipped = self.state.analytics.loaded(range, analytics);
                for err in &skipped {
                    tracing::warn!("skipped analytics detail: {err}");
                }
                tracing::info!(
                    from = %range.from,
                    to = %range.to,
                    details = self.state.analytics.details.len(),
                    "analytics loaded"
                );
            }
            Err(err) => {
                tracing::error!("failed to load analytics: {err}");
                let message = messages::client_message(&err);
                self.state.analytics.error = Some(message.clone());
                self.state.notify(ToastLevel::Error, message);
            }
        }
    }

    async fn export_records(&mut self) {
        let records = self.state.view.visible_records();
        let bytes = export::records_csv(&records, self.state.tz());
        self.finish_export(ExportKind::Records, None, bytes).await;
    }

    async fn export_analytics(&mut self) {
        let bytes = export::analytics_csv(&self.state.analytics.details, self.state.tz());
        self.finish_export(ExportKind::Analytics, None, bytes).await;
    }

    /// Saves the report rendered by the server; servers without the report
    /// endpoint get one rendered locally from the loaded analytics.
    async fn export_report(&mut self) {
        let tz = self.state.tz();
        let range = match self.state.analytics.parse_range(tz) {
            Ok(range) => range,
            Err(err) => {
                self.state
                    .notify(ToastLevel::Error, messages::draft_message(&err));
                return;
            }
        };
        let days = Some(range.local_days(tz));
        let query = PeriodQuery {
            from: range.from,
            to: range.to,
        };

        let bytes = match self.client.export_report(query).await {
            Ok(bytes) => Ok(bytes),
            Err(ClientError::NotFound) => {
                tracing::info!("report endpoint missing, rendering locally");
                let analytics = &self.state.analytics;
                let loaded = analytics
                    .data
                    .as_ref()
                    .filter(|_| analytics.range == Some(range));
                match loaded {
                    Some(data) => export::report_csv(data, &analytics.details, range, tz),
                    None => {
                        self.state.notify(
                            ToastLevel::Info,
                            "Сначала загрузите аналитику за этот период.",
                        );
                        return;
                    }
                }
            }
            Err(err) => {
                tracing::error!("failed to fetch report: {err}");
                self.state
                    .notify(ToastLevel::Error, messages::client_message(&err));
                return;
            }
        };
        self.finish_export(ExportKind::Report, days, bytes).await;
    }

    async fn finish_export(
        &mut self,
        kind: ExportKind,
        days: Option<(NaiveDate, NaiveDate)>,
        bytes: std::result::Result<Vec<u8>, ExportError>,
    ) {
        let bytes = match bytes {
            Ok(bytes) => bytes,
            Err(err) => {
                let level = if matches!(err, ExportError::Empty) {
                    ToastLevel::Warning
                } else {
                    ToastLevel::Error
                };
                self.state.notify(level, messages::export_message(&err));
                return;
            }
        };

        let today = Utc::now().with_timezone(&self.state.tz()).date_naive();
        let path = self
            .config
            .export_dir
            .join(export::file_name(kind, today, days));
        match write_file(&path, &bytes).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), bytes = bytes.len(), "export written");
                self.state.notify(
                    ToastLevel::Success,
                    format!("Сохранено: {}", path.display()),
                );
            }
            Err(err) => {
                tracing::error!("failed to write {}: {err}", path.display());
                self.state.notify(
                    ToastLevel::Error,
                    messages::export_message(&ExportError::Io(err)),
                );
            }
        }
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(path, bytes).await
}
