use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::{mpsc::Sender, Arc};
use std::time::{Duration, Instant};

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, StatefulWidget};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

pub mod cache;
pub mod cli;
pub mod config;
pub mod error_display;
pub mod fetch;
pub mod filter;
pub mod pagination;
pub mod record;
pub mod selection;
pub mod sort;
pub mod view;
pub mod widgets;

pub use cache::CacheManager;
pub use cli::Args;
pub use config::{AppConfig, ColorParser, ConfigManager, Theme};
pub use fetch::{FetchError, FetchTracker, FileSource, HttpSource, RecordSource};
pub use filter::{FilterError, FilterMode};
pub use record::{DeviceStatus, Record};
pub use sort::{SortDirection, SortField};
pub use view::{TableController, TableView, ViewAction, ViewState};

use error_display::{user_message_from_fetch, user_message_from_filter};
use widgets::controls::Controls;
use widgets::datatable::{DeviceTable, DeviceTableState};
use widgets::debug::DebugState;
use widgets::filter_bar::FilterBar;
use widgets::help::HelpOverlay;
use widgets::pagination::PaginationBar;

pub const APP_NAME: &str = "sensortui";

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Start a new fetch from the configured source
    Fetch,
    /// A background fetch finished
    Fetched {
        request: u64,
        result: std::result::Result<Vec<Record>, FetchError>,
    },
    Exit,
    Crash(String),
    Resize(u16, u16), // resized (width, height)
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum InputMode {
    #[default]
    Normal,
    Filtering,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading {
        request: u64,
    },
    Loaded {
        count: usize,
    },
    Failed {
        message: String,
    },
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading { .. })
    }
}

/// Initial view state from the display settings.
pub fn initial_view_state(config: &AppConfig) -> ViewState {
    ViewState::default()
        .with_page_size(config.display.page_size)
        .with_dense(config.display.dense)
}

/// Send log output to `<cache_dir>/sensortui.log`. The terminal belongs to
/// the UI, so nothing is ever logged to stdout or stderr.
pub fn init_logging(config: &AppConfig, cache: &CacheManager) -> Result<PathBuf> {
    let level = config
        .debug
        .level_filter()
        .unwrap_or(log::LevelFilter::Info);
    cache.ensure_cache_dir()?;
    let path = cache.log_file();
    let file = std::fs::File::create(&path)?;
    simplelog::WriteLogger::init(level, simplelog::Config::default(), file)?;
    Ok(path)
}

pub struct App {
    events: Sender<AppEvent>,
    source: Arc<dyn RecordSource>,
    controller: TableController,
    tracker: FetchTracker,
    table_state: DeviceTableState,
    debug: DebugState,
    input: String,
    pub input_mode: InputMode,
    show_help: bool,
    loading_state: LoadingState,
    last_fetch: Option<Instant>,
    config: AppConfig,
    theme: Theme,
}

impl App {
    pub fn new(events: Sender<AppEvent>, source: Arc<dyn RecordSource>) -> App {
        let theme = Theme::from_config(&AppConfig::default().theme).unwrap_or_default();
        Self::new_with_config(events, source, theme, AppConfig::default())
    }

    pub fn new_with_config(
        events: Sender<AppEvent>,
        source: Arc<dyn RecordSource>,
        theme: Theme,
        config: AppConfig,
    ) -> App {
        let controller = TableController::new(initial_view_state(&config), config.filter.mode);
        let debug = DebugState {
            enabled: config.debug.enabled,
            ..Default::default()
        };
        Self {
            events,
            source,
            controller,
            tracker: FetchTracker::new(),
            table_state: DeviceTableState::default(),
            debug,
            input: String::new(),
            input_mode: InputMode::Normal,
            show_help: false,
            loading_state: LoadingState::Idle,
            last_fetch: None,
            config,
            theme,
        }
    }

    pub fn send_event(&mut self, event: AppEvent) -> Result<()> {
        self.events.send(event)?;
        Ok(())
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    pub fn controller(&self) -> &TableController {
        &self.controller
    }

    pub fn view(&mut self) -> &TableView {
        self.controller.view()
    }

    pub fn view_state(&self) -> &ViewState {
        self.controller.state()
    }

    pub fn loading_state(&self) -> &LoadingState {
        &self.loading_state
    }

    pub fn cursor(&self) -> usize {
        self.table_state.cursor()
    }

    pub fn filter_input(&self) -> &str {
        &self.input
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Replace the filter text as if it had been typed.
    pub fn set_filter_text(&mut self, text: &str) {
        self.input = text.to_string();
        self.dispatch(ViewAction::SetFilterText(self.input.clone()), "set_filter");
    }

    /// True when auto refresh is on and the interval has elapsed since the
    /// last fetch was issued. Before the first fetch nothing is due.
    pub fn refresh_due(&self, now: Instant) -> bool {
        let interval = self.config.source.refresh_interval_secs;
        if interval == 0 || self.tracker.is_loading() {
            return false;
        }
        match self.last_fetch {
            Some(at) => now.saturating_duration_since(at) >= Duration::from_secs(interval),
            None => false,
        }
    }

    fn color(&self, name: &str) -> Color {
        self.theme.get(name)
    }

    fn cursor_record_id(&mut self) -> Option<i64> {
        let cursor = self.table_state.cursor();
        self.controller
            .view()
            .rows
            .get(cursor)
            .map(|row| row.record.id)
    }

    fn dispatch(&mut self, action: ViewAction, name: &str) {
        self.debug.last_action = name.to_string();
        debug!("{}: {:?}", name, action);
        let moves_page = matches!(
            action,
            ViewAction::ChangePage(_)
                | ViewAction::ChangeRowsPerPage(_)
                | ViewAction::SetFilterText(_)
        );
        let filter_changed = matches!(action, ViewAction::SetFilterText(_));
        self.controller.dispatch(action);
        if moves_page {
            self.table_state.reset();
        }
        let view = self.controller.view();
        let rows = view.rows.len();
        if filter_changed {
            if let Some(notice) = &view.notice {
                warn!("{}", notice);
            }
        }
        self.table_state.clamp(rows);
    }

    fn start_fetch(&mut self) {
        let request = self.tracker.issue();
        self.debug.fetches_issued += 1;
        self.last_fetch = Some(Instant::now());
        self.loading_state = LoadingState::Loading { request };
        fetch::spawn_fetch(self.source.clone(), request, self.events.clone());
    }

    fn fetched(&mut self, request: u64, result: &std::result::Result<Vec<Record>, FetchError>) {
        if !self.tracker.accept(request) {
            self.debug.stale_fetches += 1;
            info!(
                "dropping stale fetch #{} (latest is #{})",
                request,
                self.tracker.latest()
            );
            return;
        }
        match result {
            Ok(records) => {
                info!("fetch #{} returned {} records", request, records.len());
                self.controller.replace_records(records.clone());
                self.loading_state = LoadingState::Loaded {
                    count: records.len(),
                };
                let rows = self.controller.view().rows.len();
                self.table_state.clamp(rows);
            }
            Err(e) => {
                warn!("fetch #{} failed: {}", request, e);
                self.loading_state = LoadingState::Failed {
                    message: user_message_from_fetch(e),
                };
            }
        }
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        self.debug.on_key(event);

        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Exit);
        }

        if self.show_help {
            if matches!(event.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return None;
        }

        match self.input_mode {
            InputMode::Filtering => self.filter_key(event),
            InputMode::Normal => self.normal_key(event),
        }
    }

    fn filter_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        match event.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.debug.last_action = "leave_filter".to_string();
            }
            KeyCode::Backspace => {
                if self.input.pop().is_some() {
                    self.dispatch(ViewAction::SetFilterText(self.input.clone()), "filter_backspace");
                }
            }
            KeyCode::Char('u') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                self.dispatch(ViewAction::SetFilterText(String::new()), "filter_clear");
            }
            KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
                self.dispatch(ViewAction::SetFilterText(self.input.clone()), "filter_type");
            }
            _ => {}
        }
        None
    }

    fn normal_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(AppEvent::Exit),
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Filtering;
                self.debug.last_action = "edit_filter".to_string();
            }
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                if let Some(field) = SortField::from_index(index) {
                    self.dispatch(ViewAction::RequestSort(field), "sort");
                }
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_record_id() {
                    self.dispatch(ViewAction::ToggleSelect(id), "toggle_select");
                }
            }
            KeyCode::Char('a') => {
                let all = self.controller.view().all_selected();
                self.dispatch(ViewAction::SelectAll(!all), "select_all");
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(id) = self.cursor_record_id() {
                    self.dispatch(ViewAction::ToggleExpand(id), "toggle_expand");
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                let page = self.controller.state().page;
                if page > 0 {
                    self.dispatch(ViewAction::ChangePage(page - 1), "previous_page");
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let page = self.controller.state().page;
                if page + 1 < self.controller.view().page_count() {
                    self.dispatch(ViewAction::ChangePage(page + 1), "next_page");
                }
            }
            KeyCode::Char('p') => {
                let next = self
                    .controller
                    .state()
                    .next_page_size(&self.config.display.page_size_options);
                if let Some(size) = next {
                    self.dispatch(ViewAction::ChangeRowsPerPage(size), "page_size");
                }
            }
            KeyCode::Char('d') => {
                let dense = self.controller.state().dense;
                self.dispatch(ViewAction::SetDense(!dense), "toggle_dense");
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let rows = self.controller.view().rows.len();
                self.table_state.select_next(rows);
                self.debug.last_action = "cursor_down".to_string();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.table_state.select_previous();
                self.debug.last_action = "cursor_up".to_string();
            }
            KeyCode::Char('r') => return Some(AppEvent::Fetch),
            _ => {}
        }
        None
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.debug.num_events += 1;
        match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Fetch => {
                self.start_fetch();
                None
            }
            AppEvent::Fetched { request, result } => {
                self.fetched(*request, result);
                None
            }
            AppEvent::Resize(_, _) | AppEvent::Exit | AppEvent::Crash(_) => None,
        }
    }

    fn render_title(&self, selected: usize, area: Rect, buf: &mut Buffer) {
        let title = Line::from(vec![
            Span::styled(
                format!(" {} ", APP_NAME),
                Style::default()
                    .fg(self.color("primary"))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                self.source.describe(),
                Style::default().fg(self.color("text_secondary")),
            ),
        ]);
        Paragraph::new(title).render(area, buf);

        let (status, color) = match &self.loading_state {
            LoadingState::Idle => (String::new(), self.color("dimmed")),
            LoadingState::Loading { .. } => ("Loading...".to_string(), self.color("warning")),
            LoadingState::Loaded { count } => {
                (format!("{} devices", count), self.color("text_secondary"))
            }
            LoadingState::Failed { message } => (message.clone(), self.color("unhealthy")),
        };
        let status = if selected > 0 {
            format!("{} selected   {} ", selected, status)
        } else {
            format!("{} ", status)
        };
        Paragraph::new(Span::styled(status, Style::default().fg(color)))
            .right_aligned()
            .render(area, buf);
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.debug.num_frames += 1;

        let mut constraints = vec![
            Constraint::Length(1), // title
            Constraint::Length(3), // filter
            Constraint::Fill(1),   // table
            Constraint::Length(1), // pagination
            Constraint::Length(1), // controls
        ];
        if self.debug.enabled {
            constraints.push(Constraint::Length(1));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let selected = self.controller.state().selected.len();
        self.render_title(selected, layout[0], buf);

        let border = self.color("modal_border");
        let error = self.color("modal_border_error");
        let controls_bg = self.color("controls_bg");
        let filtering = self.input_mode == InputMode::Filtering;
        let loading = self.loading_state.is_loading();
        let mode = self.controller.filter_mode();

        let view = self.controller.view();
        let notice = view.notice.as_ref().map(user_message_from_filter);
        FilterBar::new(&self.input, mode)
            .with_active(filtering)
            .with_notice(notice)
            .with_colors(border, error)
            .render(layout[1], buf);

        DeviceTable::new(view, &self.theme)
            .with_loading(loading)
            .render(layout[2], buf, &mut self.table_state);

        PaginationBar::new(view, &self.config.display.page_size_options)
            .with_accent(self.theme.get("text_secondary"))
            .render(layout[3], buf);

        let controls = Controls::new()
            .with_row_count(view.total_filtered)
            .with_filtering(filtering)
            .with_dimmed(self.show_help)
            .with_bg(controls_bg);
        controls.render(layout[4], buf);

        if self.debug.enabled {
            self.debug.render(layout[5], buf);
        }

        if self.show_help {
            HelpOverlay::new(border).render(layout[2], buf);
        }
    }
}
