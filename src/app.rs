//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! App is intentionally lean - it coordinates between components but
//! does not contain business logic itself.

use crate::action::Action;
use crate::component::Component;
use crate::components::sidebar::APP_TITLE;
use crate::components::{
    centered_popup, draw_dashboard, ConfirmDialog, DashboardComponent, DashboardRenderContext,
    DateEntryMode, DateInput, HelpDialog, RecordListDialog, SetupComponent,
};
use crate::config::Config;
use crate::model::domain::DomainState;
use crate::model::modal::{Modal, ModalStack};
use crate::model::ui::AppMode;
use crate::model::{LayoutMode, Session};
use crate::services::{RecordStore, RefreshWorker};
use crate::theme::{Theme, ThemeName};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::sync::Arc;

const REPORTING_DATE_LABEL: &str = "Reporting date";
const REPORTING_DATE_PLACEHOLDER: &str = "This month";

fn reporting_date_input(mode: DateEntryMode, theme: Theme) -> DateInput {
    DateInput::new(REPORTING_DATE_LABEL, mode.strategy(), theme)
        .with_placeholder(REPORTING_DATE_PLACEHOLDER)
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Current application mode
    pub mode: AppMode,

    /// Domain state (business data)
    pub domain: DomainState,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Background refresh worker; `None` when the store could not be opened
    pub worker: Option<RefreshWorker>,

    /// Signed-in user
    pub session: Option<Session>,

    pub layout: LayoutMode,
    pub theme_name: ThemeName,
    pub theme: Theme,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,

    /// Current config, written back on sign-out and layout changes
    pub config: Option<Config>,

    /// Whether config changes are written to disk
    persist_config: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub dashboard: DashboardComponent,
    pub reporting_date: DateInput,
    pub record_list: RecordListDialog,
    pub quit_dialog: ConfirmDialog,
    pub sign_out_dialog: ConfirmDialog,
    pub help_dialog: HelpDialog,
    pub setup: SetupComponent,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create a new App instance
    pub fn new() -> App {
        let mut app = Self::create_app();
        app.persist_config = true;

        // Try to load existing config; otherwise the setup wizard runs first
        if let Some(config) = Config::load() {
            app.load_config(config);
        }
        app
    }

    fn create_app() -> App {
        let theme = Theme::default();
        App {
            mode: AppMode::Setup,
            domain: DomainState::new(),
            modals: ModalStack::new(),
            worker: None,
            session: None,
            layout: LayoutMode::default(),
            theme_name: ThemeName::default(),
            theme,
            should_quit: false,
            error: None,
            config: None,
            persist_config: false,
            // Components
            dashboard: DashboardComponent::new(),
            reporting_date: reporting_date_input(DateEntryMode::detect(), theme),
            record_list: RecordListDialog::new(),
            quit_dialog: ConfirmDialog::quit(),
            sign_out_dialog: ConfirmDialog::sign_out(),
            help_dialog: HelpDialog::default(),
            setup: SetupComponent::new(),
        }
    }

    /// Open the configured store and take on the config's session
    fn load_config(&mut self, config: Config) {
        let store = match config.backend.connect(config.session.as_ref()) {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!(error = %e, "could not open record store");
                self.error = Some(format!("Could not open record store: {}", e));
                None
            }
        };
        self.install(config, store);
    }

    fn install(&mut self, config: Config, store: Option<Arc<dyn RecordStore>>) {
        if store.is_some() {
            self.error = None;
        }
        self.worker = store.map(RefreshWorker::new);

        self.layout.show_sidebar = config.show_sidebar;
        self.theme_name = config.theme;
        let date_mode = config.date_entry.unwrap_or_else(DateEntryMode::detect);
        self.reporting_date = reporting_date_input(date_mode, self.theme);
        self.apply_theme();

        let session = config.session.clone();
        self.config = Some(config);

        // A fresh worker needs a fresh fetch even for the same user
        self.session = None;
        self.set_session(session);
    }

    /// Switch to `session`, refetching when the user changes
    fn set_session(&mut self, session: Option<Session>) {
        let changed =
            self.session.as_ref().map(|s| &s.user_id) != session.as_ref().map(|s| &s.user_id);
        self.session = session;
        self.mode = if self.session.is_some() {
            AppMode::Running
        } else {
            AppMode::SignedOut
        };

        if changed {
            if let Some(worker) = self.worker.as_mut() {
                worker.invalidate();
            }
            self.domain.clear();
            self.reporting_date.set_value(None);
            self.refresh();
        }
    }

    /// Start a refresh for the signed-in user
    fn refresh(&mut self) {
        let Some(session) = self.session.as_ref() else {
            tracing::debug!("no session, refresh skipped");
            return;
        };
        match self.worker.as_mut() {
            Some(worker) => {
                let generation = worker.spawn(&session.user_id);
                tracing::debug!(generation, user = %session.user_id, "refresh started");
            }
            None => tracing::warn!("no record store, refresh skipped"),
        }
    }

    fn sign_out(&mut self) {
        self.modals.clear();
        if let Some(config) = self.config.as_mut() {
            config.session = None;
        }
        self.save_config();
        self.set_session(None);
        tracing::info!("signed out");
    }

    fn apply_theme(&mut self) {
        self.theme = Theme::named(self.theme_name);
        self.reporting_date.set_theme(self.theme);
        self.record_list.theme = self.theme;
        self.quit_dialog.theme = self.theme;
        self.sign_out_dialog.theme = self.theme;
        self.help_dialog.theme = self.theme;
        self.setup.theme = self.theme;
    }

    fn save_config(&self) {
        if !self.persist_config {
            return;
        }
        if let Some(config) = &self.config {
            if let Err(e) = config.save() {
                tracing::warn!(error = %e, "could not save config");
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        match self.mode {
            AppMode::Setup => self.setup.handle_key_event(key),
            AppMode::SignedOut => self.handle_signed_out_key_event(key),
            AppMode::Running => {
                if let Some(modal) = self.modals.top().copied() {
                    self.handle_modal_key_event(modal, key)
                } else {
                    self.dashboard.handle_key_event(key)
                }
            }
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                // Poll background refreshes
                if let Some(snapshot) = self.worker.as_mut().and_then(|w| w.poll()) {
                    self.domain.replace_snapshot(snapshot, Local::now());
                }
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Scrolling (record list when open, activity list otherwise)
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown => {
                if matches!(self.modals.top(), Some(Modal::RecordList { .. })) {
                    self.record_list.update(action)?;
                } else {
                    self.dashboard.update(action)?;
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenSignOut => {
                self.modals.push(Modal::SignOutConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::OpenRecordList(collection) => {
                self.record_list
                    .set_records(collection, &self.domain.snapshot);
                self.modals.push(Modal::RecordList { collection });
            }
            Action::CloseModal => {
                if matches!(self.modals.top(), Some(Modal::DatePicker)) {
                    self.reporting_date.cancel();
                }
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if let Some(modal) = self.modals.top().copied() {
                    match modal {
                        Modal::QuitConfirm => {
                            self.should_quit = true;
                        }
                        Modal::SignOutConfirm => {
                            self.modals.pop();
                            return Ok(Some(Action::SignOut));
                        }
                        _ => {}
                    }
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Dashboard
            // ─────────────────────────────────────────────────────────────────
            Action::Refresh => self.refresh(),
            Action::OpenDatePicker => {
                if self.reporting_date.open(Local::now().date_naive()) {
                    self.modals.push(Modal::DatePicker);
                }
            }
            Action::DateConfirmed(date) => {
                self.domain.set_reporting_date(Some(date), Local::now());
                if matches!(self.modals.top(), Some(Modal::DatePicker)) {
                    self.modals.pop();
                }
            }
            Action::ClearReportingDate => {
                self.reporting_date.set_value(None);
                self.domain.set_reporting_date(None, Local::now());
            }

            // ─────────────────────────────────────────────────────────────────
            // Layout & Session
            // ─────────────────────────────────────────────────────────────────
            Action::ToggleSidebar => {
                self.layout.toggle_sidebar();
                if let Some(config) = self.config.as_mut() {
                    config.show_sidebar = self.layout.show_sidebar;
                }
                self.save_config();
            }
            Action::ToggleTheme => {
                self.theme_name = match self.theme_name {
                    ThemeName::Dark => ThemeName::Light,
                    ThemeName::Light => ThemeName::Dark,
                };
                self.apply_theme();
                if let Some(config) = self.config.as_mut() {
                    config.theme = self.theme_name;
                }
                self.save_config();
            }
            Action::SignOut => self.sign_out(),

            // ─────────────────────────────────────────────────────────────────
            // Setup
            // ─────────────────────────────────────────────────────────────────
            Action::SetupConfirm => {
                // Setup complete, load the config and switch to the dashboard
                if let Some(config) = self.setup.get_config() {
                    self.load_config(config.clone());
                }
            }
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.mode {
            AppMode::Setup => self.setup.draw(frame, area)?,
            AppMode::SignedOut => self.draw_signed_out(frame, area),
            AppMode::Running => {
                let store = self.worker.as_ref().map(|w| w.store_description());
                let ctx = DashboardRenderContext {
                    domain: &self.domain,
                    session: self.session.as_ref(),
                    layout: self.layout,
                    theme: &self.theme,
                    refreshing: self.worker.as_ref().is_some_and(|w| w.is_refreshing()),
                    store: store.as_deref(),
                    error: self.error.as_deref(),
                    reporting_date: &self.reporting_date,
                };

                draw_dashboard(frame, area, &mut self.dashboard, &ctx)?;

                // Draw modal overlay if active
                if let Some(modal) = self.modals.top().copied() {
                    self.draw_modal(frame, area, modal)?;
                }
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::SignOutConfirm => self.sign_out_dialog.handle_key_event(key),
            Modal::DatePicker => self.reporting_date.handle_key_event(key),
            Modal::RecordList { .. } => self.record_list.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn handle_signed_out_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Enter => {
                let mut setup = match &self.config {
                    Some(config) => SetupComponent::sign_in(config),
                    None => SetupComponent::new(),
                };
                setup.theme = self.theme;
                self.setup = setup;
                self.mode = AppMode::Setup;
                Ok(None)
            }
            KeyCode::Char('q') | KeyCode::Esc => Ok(Some(Action::ForceQuit)),
            _ => Ok(None),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::SignOutConfirm => self.sign_out_dialog.draw(frame, area)?,
            Modal::DatePicker => self.reporting_date.draw(frame, area)?,
            Modal::RecordList { .. } => self.record_list.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }

    fn draw_signed_out(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        let popup_area = centered_popup(area, 44, 8);

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                "You are signed out.",
                Style::default()
                    .fg(self.theme.text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Enter ", self.theme.key_hint()),
                Span::raw("Sign in  "),
                Span::styled(" q ", self.theme.key_hint()),
                Span::raw("Quit"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", APP_TITLE))
                    .title_style(self.theme.title())
                    .border_style(Style::default().fg(self.theme.primary)),
            )
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup_area);
    }
}
