//! Setup wizard component
//!
//! Interactive first-run configuration: where records come from and who is
//! signed in. After a sign-out the wizard reopens at the account step with
//! the data source kept.

use crate::action::Action;
use crate::component::Component;
use crate::config::{Backend, Config};
use crate::model::Session;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::path::Path;

/// Setup wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Welcome,
    DataSource,
    ApiKey,
    UserId,
    Email,
    Confirm,
}

impl SetupStep {
    fn title(&self) -> &str {
        match self {
            SetupStep::Welcome => "Welcome",
            SetupStep::DataSource => "Data Source",
            SetupStep::ApiKey => "API Key",
            SetupStep::UserId => "Account",
            SetupStep::Email => "Email",
            SetupStep::Confirm => "Confirm",
        }
    }

    fn step_number(&self) -> usize {
        match self {
            SetupStep::Welcome => 1,
            SetupStep::DataSource => 2,
            SetupStep::ApiKey => 3,
            SetupStep::UserId => 4,
            SetupStep::Email => 5,
            SetupStep::Confirm => 6,
        }
    }

    const COUNT: usize = 6;
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => Path::new(&home).join(rest).to_string_lossy().to_string(),
        _ => path.to_string(),
    }
}

/// Setup wizard component
pub struct SetupComponent {
    /// Current step
    pub step: SetupStep,
    /// Config being built
    pub config: Config,
    /// Current input text
    pub input: String,
    /// Error message to display
    pub error: Option<String>,
    /// Whether setup is complete
    pub complete: bool,
    pub theme: Theme,

    source: String,
    api_key: String,
    user_id: String,
    email: String,
}

impl Default for SetupComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupComponent {
    pub fn new() -> Self {
        Self {
            step: SetupStep::Welcome,
            config: Config::default(),
            input: String::new(),
            error: None,
            complete: false,
            theme: Theme::default(),
            source: String::new(),
            api_key: String::new(),
            user_id: String::new(),
            email: String::new(),
        }
    }

    /// Wizard for signing back in: the data source is kept and the wizard
    /// starts at the account step.
    pub fn sign_in(config: &Config) -> Self {
        let mut setup = Self::new();
        setup.config = config.clone();
        setup.config.session = None;
        match &config.backend {
            Backend::Rest { url, api_key } => {
                setup.source = url.clone();
                setup.api_key = api_key.clone();
            }
            Backend::File { path } => setup.source = path.clone(),
        }
        setup.step = SetupStep::UserId;
        setup
    }

    /// Get the saved config if setup completed successfully
    pub fn get_config(&self) -> Option<&Config> {
        if self.complete {
            Some(&self.config)
        } else {
            None
        }
    }

    fn next_step(&self) -> Option<SetupStep> {
        match self.step {
            SetupStep::Welcome => Some(SetupStep::DataSource),
            SetupStep::DataSource if is_url(&self.source) => Some(SetupStep::ApiKey),
            SetupStep::DataSource => Some(SetupStep::UserId),
            SetupStep::ApiKey => Some(SetupStep::UserId),
            SetupStep::UserId => Some(SetupStep::Email),
            SetupStep::Email => Some(SetupStep::Confirm),
            SetupStep::Confirm => None,
        }
    }

    fn prev_step(&self) -> Option<SetupStep> {
        match self.step {
            SetupStep::Welcome => None,
            SetupStep::DataSource => Some(SetupStep::Welcome),
            SetupStep::ApiKey => Some(SetupStep::DataSource),
            SetupStep::UserId if is_url(&self.source) => Some(SetupStep::ApiKey),
            SetupStep::UserId => Some(SetupStep::DataSource),
            SetupStep::Email => Some(SetupStep::UserId),
            SetupStep::Confirm => Some(SetupStep::Email),
        }
    }

    fn field_value(&self, step: SetupStep) -> String {
        match step {
            SetupStep::DataSource => self.source.clone(),
            SetupStep::ApiKey => self.api_key.clone(),
            SetupStep::UserId => self.user_id.clone(),
            SetupStep::Email => self.email.clone(),
            SetupStep::Welcome | SetupStep::Confirm => String::new(),
        }
    }

    fn validate_current_step(&mut self) -> bool {
        self.error = None;
        let value = self.input.trim().to_string();

        match self.step {
            SetupStep::Welcome | SetupStep::Confirm => true,
            SetupStep::DataSource => {
                let value = if is_url(&value) { value } else { expand_home(&value) };
                if value.is_empty() {
                    self.error = Some("A database URL or snapshot file is required".to_string());
                    return false;
                }
                if !is_url(&value) && !Path::new(&value).is_file() {
                    self.error = Some(format!("File does not exist: {}", value));
                    return false;
                }
                self.source = value;
                true
            }
            SetupStep::ApiKey => {
                if value.is_empty() {
                    self.error = Some("API key is required".to_string());
                    return false;
                }
                self.api_key = value;
                true
            }
            SetupStep::UserId => {
                if value.is_empty() {
                    self.error = Some("User id is required".to_string());
                    return false;
                }
                self.user_id = value;
                true
            }
            SetupStep::Email => {
                if !value.contains('@') {
                    self.error = Some("Enter a valid email address".to_string());
                    return false;
                }
                self.email = value;
                true
            }
        }
    }

    fn advance_step(&mut self) {
        if self.validate_current_step() {
            if let Some(next) = self.next_step() {
                self.step = next;
                self.input = self.field_value(next);
                if next == SetupStep::Confirm {
                    self.build_config();
                }
            } else {
                // On confirm step, save the config
                self.save_config();
            }
        }
    }

    fn go_back(&mut self) {
        if let Some(prev) = self.prev_step() {
            self.step = prev;
            self.error = None;
            self.input = self.field_value(prev);
        }
    }

    fn build_config(&mut self) {
        self.config.backend = if is_url(&self.source) {
            Backend::Rest {
                url: self.source.clone(),
                api_key: self.api_key.clone(),
            }
        } else {
            Backend::File {
                path: self.source.clone(),
            }
        };
        self.config.session = Some(Session {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            display_name: None,
            access_token: None,
        });
    }

    fn save_config(&mut self) {
        match self.config.save() {
            Ok(()) => {
                tracing::info!("setup saved");
                self.complete = true;
            }
            Err(e) => {
                self.error = Some(format!("Failed to save config: {}", e));
            }
        }
    }
}

impl Component for SetupComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.step {
            SetupStep::Welcome => match key.code {
                KeyCode::Enter => {
                    self.advance_step();
                    Ok(None)
                }
                KeyCode::Esc => Ok(Some(Action::ForceQuit)),
                _ => Ok(None),
            },
            SetupStep::DataSource | SetupStep::ApiKey | SetupStep::UserId | SetupStep::Email => {
                match key.code {
                    KeyCode::Enter => {
                        self.advance_step();
                        Ok(None)
                    }
                    KeyCode::Esc => match self.prev_step() {
                        Some(_) => {
                            self.go_back();
                            Ok(None)
                        }
                        None => Ok(Some(Action::ForceQuit)),
                    },
                    KeyCode::Backspace => {
                        self.input.pop();
                        self.error = None;
                        Ok(None)
                    }
                    KeyCode::Char(c) => {
                        self.input.push(c);
                        self.error = None;
                        Ok(None)
                    }
                    _ => Ok(None),
                }
            }
            SetupStep::Confirm => match key.code {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.save_config();
                    if self.complete {
                        Ok(Some(Action::SetupConfirm))
                    } else {
                        Ok(None)
                    }
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Backspace => {
                    self.go_back();
                    Ok(None)
                }
                _ => Ok(None),
            },
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);

        let margin = 4;
        let content_area = Rect::new(
            area.x + margin,
            area.y + margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(2), // Progress
                Constraint::Min(10),   // Content
                Constraint::Length(3), // Help
            ])
            .split(content_area);

        let title = Paragraph::new(Line::from(Span::styled(
            " Business Dashboard Setup ",
            self.theme.title(),
        )))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let progress = format!(
            "Step {} of {}: {}",
            self.step.step_number(),
            SetupStep::COUNT,
            self.step.title()
        );
        frame.render_widget(
            Paragraph::new(Span::styled(progress, self.theme.muted_text())),
            chunks[1],
        );

        let (heading, lines) = self.step_content();
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", heading))
                .border_style(Style::default().fg(self.theme.primary)),
        );
        frame.render_widget(paragraph, chunks[2]);

        let help_text = match self.step {
            SetupStep::Welcome => " Enter  Continue   Esc  Quit",
            SetupStep::Confirm => " Enter/y  Save & Continue   Esc/n  Go Back",
            _ => " Enter  Continue   Esc  Back   Type to edit",
        };
        let help = Paragraph::new(Span::styled(help_text, self.theme.muted_text()))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);

        Ok(())
    }
}

impl SetupComponent {
    fn prompt_lines(&self, prompt: &str, hint: &str) -> Vec<Line<'static>> {
        let masked = self.step == SetupStep::ApiKey;
        let shown = if masked {
            "•".repeat(self.input.chars().count())
        } else {
            self.input.clone()
        };

        vec![
            Line::from(""),
            Line::from(prompt.to_string()),
            Line::from(Span::styled(hint.to_string(), self.theme.muted_text())),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(self.theme.primary)),
                Span::styled(
                    format!("{}_", shown),
                    Style::default()
                        .fg(self.theme.text)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ]
    }

    fn step_content(&self) -> (&'static str, Vec<Line<'static>>) {
        let (heading, mut lines) = match self.step {
            SetupStep::Welcome => (
                "Welcome",
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "Welcome to the business dashboard!",
                        Style::default()
                            .fg(self.theme.success)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from("You will need to provide:"),
                    Line::from(Span::styled(
                        "  1. Your database URL, or a JSON snapshot file",
                        Style::default().fg(self.theme.primary),
                    )),
                    Line::from(Span::styled(
                        "  2. The account whose records to show",
                        Style::default().fg(self.theme.primary),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Press Enter to begin...",
                        Style::default().fg(self.theme.warning),
                    )),
                ],
            ),
            SetupStep::DataSource => (
                "Data Source",
                self.prompt_lines(
                    "Enter your database URL or the path to a snapshot file:",
                    "(e.g. https://xyz.example.co or ~/records.json)",
                ),
            ),
            SetupStep::ApiKey => (
                "API Key",
                self.prompt_lines("Enter the API key for the database:", "(the public anon key)"),
            ),
            SetupStep::UserId => (
                "Account",
                self.prompt_lines("Enter your user id:", "(records are filtered by this id)"),
            ),
            SetupStep::Email => (
                "Email",
                self.prompt_lines("Enter your email address:", ""),
            ),
            SetupStep::Confirm => ("Confirm Configuration", self.confirm_lines()),
        };

        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Error: {}", error),
                Style::default().fg(self.theme.danger),
            )));
        }

        (heading, lines)
    }

    fn confirm_lines(&self) -> Vec<Line<'static>> {
        let config_dir = Config::config_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.bizdash".to_string());
        let label = Style::default().fg(self.theme.primary);

        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Review your configuration:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Data source: ", label),
                Span::raw(self.source.clone()),
            ]),
            Line::from(vec![
                Span::styled("User id:     ", label),
                Span::raw(self.user_id.clone()),
            ]),
            Line::from(vec![
                Span::styled("Email:       ", label),
                Span::raw(self.email.clone()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Config will be saved to: ", self.theme.muted_text()),
                Span::raw(format!("{}/config.json", config_dir)),
            ]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(setup: &mut SetupComponent, code: KeyCode) -> Option<Action> {
        setup
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn type_and_enter(setup: &mut SetupComponent, text: &str) {
        setup.input.clear();
        for c in text.chars() {
            press(setup, KeyCode::Char(c));
        }
        press(setup, KeyCode::Enter);
    }

    #[test]
    fn test_rest_source_asks_for_api_key() {
        let mut setup = SetupComponent::new();
        press(&mut setup, KeyCode::Enter);
        assert_eq!(setup.step, SetupStep::DataSource);

        type_and_enter(&mut setup, "https://db.example.com");
        assert_eq!(setup.step, SetupStep::ApiKey);

        type_and_enter(&mut setup, "anon-key");
        type_and_enter(&mut setup, "user-1");
        type_and_enter(&mut setup, "jane@example.com");
        assert_eq!(setup.step, SetupStep::Confirm);

        assert_eq!(
            setup.config.backend,
            Backend::Rest {
                url: "https://db.example.com".to_string(),
                api_key: "anon-key".to_string(),
            }
        );
        assert_eq!(setup.config.session.as_ref().unwrap().user_id, "user-1");
    }

    #[test]
    fn test_file_source_skips_api_key() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut setup = SetupComponent::new();
        press(&mut setup, KeyCode::Enter);
        type_and_enter(&mut setup, &file.path().to_string_lossy());
        assert_eq!(setup.step, SetupStep::UserId);

        press(&mut setup, KeyCode::Esc);
        assert_eq!(setup.step, SetupStep::DataSource);
    }

    #[test]
    fn test_validation_errors_keep_step() {
        let mut setup = SetupComponent::new();
        press(&mut setup, KeyCode::Enter);
        type_and_enter(&mut setup, "/definitely/not/here.json");
        assert_eq!(setup.step, SetupStep::DataSource);
        assert!(setup.error.as_deref().unwrap().contains("does not exist"));

        setup.step = SetupStep::Email;
        type_and_enter(&mut setup, "not-an-email");
        assert_eq!(setup.step, SetupStep::Email);
        assert!(setup.error.is_some());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path.json"), "/abs/path.json");
        if let Ok(home) = std::env::var("HOME") {
            assert_eq!(
                expand_home("~/records.json"),
                Path::new(&home).join("records.json").to_string_lossy()
            );
        }
    }

    #[test]
    fn test_sign_in_keeps_backend() {
        let config = Config {
            backend: Backend::Rest {
                url: "https://db.example.com".to_string(),
                api_key: "anon".to_string(),
            },
            ..Default::default()
        };
        let mut setup = SetupComponent::sign_in(&config);
        assert_eq!(setup.step, SetupStep::UserId);

        type_and_enter(&mut setup, "user-2");
        type_and_enter(&mut setup, "sam@example.com");
        assert_eq!(setup.step, SetupStep::Confirm);
        assert_eq!(setup.config.backend, config.backend);
        assert_eq!(
            setup.config.session.as_ref().unwrap().email,
            "sam@example.com"
        );
    }
}
