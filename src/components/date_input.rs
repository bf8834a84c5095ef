//! Date input component
//!
//! A button showing the committed date, plus a modal that edits a tentative
//! date. The tentative date only reaches the owner on confirmation, as
//! `Action::DateConfirmed`; cancelling restores the committed value.
//!
//! Editing is delegated to a `DateEntryStrategy`:
//! - `CalendarEntry` - month grid driven by arrow keys, Enter selects and commits
//! - `TextEntry` - free `YYYY-MM-DD` text, parsed after every edit

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::theme::Theme;
use anyhow::Result;
use chrono::{Datelike, Duration, Months, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use serde::{Deserialize, Serialize};

const TEXT_MAX_LEN: usize = 10;
const TEXT_FORMAT: &str = "%Y-%m-%d";

/// Render a date as `Mon D, YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Entry Strategies
// ═══════════════════════════════════════════════════════════════════════════════

/// Which entry strategy a date input uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateEntryMode {
    Calendar,
    Text,
}

impl DateEntryMode {
    /// Pick a mode for the running terminal
    pub fn detect() -> Self {
        Self::for_term(std::env::var("TERM").ok().as_deref())
    }

    fn for_term(term: Option<&str>) -> Self {
        match term {
            None | Some("") | Some("dumb") => DateEntryMode::Text,
            Some(_) => DateEntryMode::Calendar,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateEntryMode::Calendar => "calendar",
            DateEntryMode::Text => "text",
        }
    }

    pub fn strategy(&self) -> Box<dyn DateEntryStrategy> {
        match self {
            DateEntryMode::Calendar => Box::new(CalendarEntry),
            DateEntryMode::Text => Box::new(TextEntry::default()),
        }
    }
}

/// Result of feeding one key to an entry strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    Editing,
    Commit,
    Cancel,
}

/// How the tentative date is edited while the modal is open
pub trait DateEntryStrategy {
    fn mode(&self) -> DateEntryMode;

    /// Reset any local editing state when the modal opens
    fn begin(&mut self, tentative: NaiveDate);

    /// Apply a key to the tentative date
    fn handle_key(&mut self, key: KeyEvent, tentative: &mut NaiveDate) -> EntryOutcome;

    /// Body lines of the modal
    fn body(&self, tentative: NaiveDate, theme: &Theme) -> Vec<Line<'static>>;

    /// Key hints shown under the body
    fn hints(&self) -> &'static [(&'static str, &'static str)];
}

/// Month grid; selecting a day commits immediately
pub struct CalendarEntry;

fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    let next = shift_months(first, 1);
    if next == first {
        // Last representable month
        return 31;
    }
    (next - first).num_days() as u32
}

impl DateEntryStrategy for CalendarEntry {
    fn mode(&self) -> DateEntryMode {
        DateEntryMode::Calendar
    }

    fn begin(&mut self, _tentative: NaiveDate) {}

    fn handle_key(&mut self, key: KeyEvent, tentative: &mut NaiveDate) -> EntryOutcome {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => *tentative = shift_days(*tentative, -1),
            KeyCode::Right | KeyCode::Char('l') => *tentative = shift_days(*tentative, 1),
            KeyCode::Up | KeyCode::Char('k') => *tentative = shift_days(*tentative, -7),
            KeyCode::Down | KeyCode::Char('j') => *tentative = shift_days(*tentative, 7),
            KeyCode::PageUp => *tentative = shift_months(*tentative, -1),
            KeyCode::PageDown => *tentative = shift_months(*tentative, 1),
            KeyCode::Enter | KeyCode::Char(' ') => return EntryOutcome::Commit,
            KeyCode::Esc => return EntryOutcome::Cancel,
            _ => {}
        }
        EntryOutcome::Editing
    }

    fn body(&self, tentative: NaiveDate, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                tentative.format("%B %Y").to_string(),
                theme.title(),
            )),
            Line::from(Span::styled(
                "Mo Tu We Th Fr Sa Su",
                theme.muted_text(),
            )),
        ];

        let first = tentative.with_day(1).unwrap_or(tentative);
        let offset = first.weekday().num_days_from_monday() as usize;
        let mut cells: Vec<Option<u32>> = vec![None; offset];
        cells.extend((1..=days_in_month(tentative)).map(Some));

        for week in cells.chunks(7) {
            let mut spans = Vec::with_capacity(week.len() * 2);
            for (i, cell) in week.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(" "));
                }
                match cell {
                    Some(day) if *day == tentative.day() => spans.push(Span::styled(
                        format!("{:>2}", day),
                        Style::default()
                            .fg(theme.background)
                            .bg(theme.primary)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Some(day) => spans.push(Span::styled(
                        format!("{:>2}", day),
                        Style::default().fg(theme.text),
                    )),
                    None => spans.push(Span::raw("  ")),
                }
            }
            // Pad short weeks so centered rows line up
            for _ in week.len()..7 {
                spans.push(Span::raw("   "));
            }
            lines.push(Line::from(spans));
        }

        lines
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("←→↑↓", "Move"),
            ("PgUp/PgDn", "Month"),
            ("Enter", "Select"),
            ("Esc", "Cancel"),
        ]
    }
}

/// Free-text `YYYY-MM-DD` field
///
/// Unparsable text never raises an error; it just leaves the tentative
/// date where it was.
#[derive(Debug, Default)]
pub struct TextEntry {
    buffer: String,
}

impl TextEntry {
    #[cfg(test)]
    fn buffer(&self) -> &str {
        &self.buffer
    }

    fn reparse(&self, tentative: &mut NaiveDate) {
        if let Ok(date) = NaiveDate::parse_from_str(self.buffer.trim(), TEXT_FORMAT) {
            *tentative = date;
        }
    }
}

impl DateEntryStrategy for TextEntry {
    fn mode(&self) -> DateEntryMode {
        DateEntryMode::Text
    }

    fn begin(&mut self, tentative: NaiveDate) {
        self.buffer = tentative.format(TEXT_FORMAT).to_string();
    }

    fn handle_key(&mut self, key: KeyEvent, tentative: &mut NaiveDate) -> EntryOutcome {
        match key.code {
            KeyCode::Enter => return EntryOutcome::Commit,
            KeyCode::Esc => return EntryOutcome::Cancel,
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.buffer.clear();
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                self.reparse(tentative);
            }
            KeyCode::Char(_)
                if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Char(c) if self.buffer.chars().count() < TEXT_MAX_LEN => {
                self.buffer.push(c);
                self.reparse(tentative);
            }
            _ => {}
        }
        EntryOutcome::Editing
    }

    fn body(&self, tentative: NaiveDate, theme: &Theme) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled("Date (YYYY-MM-DD)", theme.muted_text())),
            Line::from(Span::styled(
                format!("> {}_", self.buffer),
                Style::default().fg(theme.primary),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Selected: ", theme.muted_text()),
                Span::styled(
                    format_date(tentative),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ),
            ]),
        ]
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("Enter", "Confirm"), ("Ctrl-U", "Clear"), ("Esc", "Cancel")]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Date Input
// ═══════════════════════════════════════════════════════════════════════════════

/// Date input with a committed value and a tentative edit
pub struct DateInput {
    pub label: String,
    pub placeholder: String,
    pub disabled: bool,
    value: Option<NaiveDate>,
    tentative: NaiveDate,
    open: bool,
    strategy: Box<dyn DateEntryStrategy>,
    theme: Theme,
}

impl DateInput {
    pub fn new(label: &str, strategy: Box<dyn DateEntryStrategy>, theme: Theme) -> Self {
        Self {
            label: label.to_string(),
            placeholder: "Select date".to_string(),
            disabled: false,
            value: None,
            tentative: NaiveDate::default(),
            open: false,
            strategy,
            theme,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    #[cfg(test)]
    pub fn value(&self) -> Option<NaiveDate> {
        self.value
    }

    /// Replace the committed value from the owner's side.
    ///
    /// Does not emit a change.
    pub fn set_value(&mut self, value: Option<NaiveDate>) {
        self.value = value;
        if let Some(date) = value {
            self.tentative = date;
        }
    }

    #[cfg(test)]
    pub fn tentative(&self) -> NaiveDate {
        self.tentative
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> DateEntryMode {
        self.strategy.mode()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Committed date as `Mon D, YYYY`, or the placeholder
    pub fn display_text(&self) -> String {
        match self.value {
            Some(date) => format_date(date),
            None => self.placeholder.clone(),
        }
    }

    /// Open the editor, seeding the tentative date from the committed value
    /// or from `today`. Returns false when disabled.
    pub fn open(&mut self, today: NaiveDate) -> bool {
        if self.disabled {
            return false;
        }
        self.tentative = self.value.unwrap_or(today);
        self.strategy.begin(self.tentative);
        self.open = true;
        true
    }

    /// Commit the tentative date and close, returning the new value
    pub fn confirm(&mut self) -> Option<NaiveDate> {
        if !self.open {
            return None;
        }
        self.open = false;
        self.value = Some(self.tentative);
        self.value
    }

    /// Discard the tentative date and close
    pub fn cancel(&mut self) {
        self.open = false;
        if let Some(date) = self.value {
            self.tentative = date;
        }
    }

    /// Draw the closed-state button into `area`
    pub fn draw_button(&self, frame: &mut Frame, area: Rect) {
        let value_style = if self.disabled {
            self.theme.muted_text()
        } else if self.value.is_some() {
            Style::default().fg(self.theme.text)
        } else {
            self.theme.muted_text()
        };

        let line = Line::from(vec![
            Span::styled(format!("{}: ", self.label), self.theme.muted_text()),
            Span::styled(format!("[ {} ]", self.display_text()), value_style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl Component for DateInput {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if !self.open {
            return Ok(None);
        }

        let action = match self.strategy.handle_key(key, &mut self.tentative) {
            EntryOutcome::Editing => None,
            EntryOutcome::Commit => self.confirm().map(Action::DateConfirmed),
            EntryOutcome::Cancel => {
                self.cancel();
                Some(Action::CloseModal)
            }
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let body = self.strategy.body(self.tentative, &self.theme);
        let height = body.len() as u16 + 6;
        let popup_area = centered_popup(area, 36, height);

        frame.render_widget(Clear, popup_area);

        let mut content = vec![Line::from("")];
        content.extend(body);
        content.push(Line::from(""));

        let mut hints = Vec::new();
        for (key, label) in self.strategy.hints() {
            hints.push(Span::styled(format!(" {} ", key), self.theme.key_hint()));
            hints.push(Span::raw(format!("{} ", label)));
        }
        content.push(Line::from(hints));

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.primary))
                    .title(format!(" {} ({}) ", self.label, self.mode().label()))
                    .title_style(self.theme.title()),
            )
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(mode: DateEntryMode) -> DateInput {
        DateInput::new("Due date", mode.strategy(), Theme::default())
    }

    /// Feed keys and collect every emitted DateConfirmed
    fn send(input: &mut DateInput, keys: &[KeyEvent]) -> Vec<Action> {
        keys.iter()
            .filter_map(|k| input.handle_key_event(*k).unwrap())
            .collect()
    }

    fn type_text(input: &mut DateInput, text: &str) -> Vec<Action> {
        let keys: Vec<KeyEvent> = text.chars().map(|c| key(KeyCode::Char(c))).collect();
        send(input, &keys)
    }

    fn clear_text(input: &mut DateInput) {
        send(input, &[KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)]);
    }

    fn changes(actions: &[Action]) -> Vec<NaiveDate> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::DateConfirmed(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date(2024, 3, 15)), "Mar 15, 2024");
        assert_eq!(format_date(date(2024, 1, 5)), "Jan 5, 2024");
    }

    #[test]
    fn test_placeholder_without_value() {
        let input = input(DateEntryMode::Calendar).with_placeholder("Pick a day");
        assert_eq!(input.display_text(), "Pick a day");
        assert!(!input.is_open());
    }

    #[test]
    fn test_open_refused_when_disabled() {
        let mut input = input(DateEntryMode::Calendar);
        input.disabled = true;
        assert!(!input.open(date(2024, 3, 1)));
        assert!(!input.is_open());
    }

    #[test]
    fn test_open_seeds_tentative_from_value_or_today() {
        let mut input = input(DateEntryMode::Calendar);
        input.open(date(2024, 6, 1));
        assert_eq!(input.tentative(), date(2024, 6, 1));
        input.cancel();

        input.set_value(Some(date(2023, 12, 24)));
        input.open(date(2024, 6, 1));
        assert_eq!(input.tentative(), date(2023, 12, 24));
    }

    #[test]
    fn test_confirm_text_entry_emits_once_and_displays() {
        let mut input = input(DateEntryMode::Text);
        input.set_value(Some(date(2024, 1, 1)));
        input.open(date(2024, 1, 1));

        clear_text(&mut input);
        let mut actions = type_text(&mut input, "2024-03-15");
        actions.extend(send(&mut input, &[key(KeyCode::Enter)]));

        assert_eq!(changes(&actions), vec![date(2024, 3, 15)]);
        assert!(!input.is_open());
        assert_eq!(input.value(), Some(date(2024, 3, 15)));
        assert_eq!(input.display_text(), "Mar 15, 2024");

        // Closed widget swallows further keys
        assert!(send(&mut input, &[key(KeyCode::Enter)]).is_empty());
    }

    #[test]
    fn test_cancel_after_edit_emits_nothing_and_restores() {
        let mut input = input(DateEntryMode::Calendar);
        input.set_value(Some(date(2024, 3, 15)));
        let before = input.display_text();

        input.open(date(2024, 5, 5));
        let mut actions = send(
            &mut input,
            &[key(KeyCode::Right), key(KeyCode::Down), key(KeyCode::PageDown)],
        );
        assert_ne!(input.tentative(), date(2024, 3, 15));

        actions.extend(send(&mut input, &[key(KeyCode::Esc)]));
        assert!(changes(&actions).is_empty());
        assert_eq!(actions, vec![Action::CloseModal]);
        assert_eq!(input.display_text(), before);
        assert_eq!(input.tentative(), date(2024, 3, 15));
        assert!(!input.is_open());
    }

    #[test]
    fn test_text_entry_ignores_unparsable_text() {
        let mut input = input(DateEntryMode::Text);
        input.set_value(Some(date(2024, 3, 15)));
        input.open(date(2024, 3, 15));

        clear_text(&mut input);
        let before = input.tentative();
        let actions = type_text(&mut input, "not-a-date");

        assert!(actions.is_empty());
        assert_eq!(input.tentative(), before);
        assert!(input.is_open());
    }

    #[test]
    fn test_text_entry_limits_length() {
        let mut entry = TextEntry::default();
        let mut tentative = date(2024, 3, 15);
        entry.begin(tentative);
        entry.handle_key(key(KeyCode::Char('9')), &mut tentative);
        assert_eq!(entry.buffer(), "2024-03-15");
        assert_eq!(tentative, date(2024, 3, 15));
    }

    #[test]
    fn test_text_entry_ignores_control_and_alt_chars() {
        let mut entry = TextEntry::default();
        let mut tentative = date(2024, 3, 15);
        entry.begin(tentative);
        entry.handle_key(key(KeyCode::Backspace), &mut tentative);
        entry.handle_key(
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL),
            &mut tentative,
        );
        entry.handle_key(
            KeyEvent::new(KeyCode::Char('4'), KeyModifiers::ALT),
            &mut tentative,
        );
        assert_eq!(entry.buffer(), "2024-03-1");

        entry.handle_key(
            KeyEvent::new(KeyCode::Char('6'), KeyModifiers::SHIFT),
            &mut tentative,
        );
        assert_eq!(entry.buffer(), "2024-03-16");
        assert_eq!(tentative, date(2024, 3, 16));
    }

    #[test]
    fn test_calendar_navigation_and_select_commits() {
        let mut input = input(DateEntryMode::Calendar);
        input.open(date(2024, 1, 31));

        send(&mut input, &[key(KeyCode::Right)]);
        assert_eq!(input.tentative(), date(2024, 2, 1));
        send(&mut input, &[key(KeyCode::Up)]);
        assert_eq!(input.tentative(), date(2024, 1, 25));
        send(&mut input, &[key(KeyCode::PageDown)]);
        assert_eq!(input.tentative(), date(2024, 2, 25));

        let actions = send(&mut input, &[key(KeyCode::Enter)]);
        assert_eq!(changes(&actions), vec![date(2024, 2, 25)]);
        assert!(!input.is_open());
    }

    #[test]
    fn test_shift_months_clamps_to_month_end() {
        assert_eq!(shift_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_months(date(2024, 3, 31), -1), date(2024, 2, 29));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(date(2024, 2, 10)), 29);
        assert_eq!(days_in_month(date(2023, 2, 10)), 28);
        assert_eq!(days_in_month(date(2024, 12, 1)), 31);
    }

    #[test]
    fn test_mode_for_term() {
        assert_eq!(DateEntryMode::for_term(None), DateEntryMode::Text);
        assert_eq!(DateEntryMode::for_term(Some("dumb")), DateEntryMode::Text);
        assert_eq!(
            DateEntryMode::for_term(Some("xterm-256color")),
            DateEntryMode::Calendar
        );
    }

    #[test]
    fn test_button_renders_committed_date() {
        let mut input = input(DateEntryMode::Calendar);
        input.set_value(Some(date(2024, 3, 15)));

        let mut terminal = Terminal::new(TestBackend::new(40, 1)).unwrap();
        terminal
            .draw(|frame| input.draw_button(frame, frame.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..40)
            .map(|x| buffer.cell((x, 0)).map(|c| c.symbol()).unwrap_or(" "))
            .collect();
        assert!(row.contains("Mar 15, 2024"), "row was: {}", row);
    }

    #[test]
    fn test_modal_title_names_entry_mode() {
        let mut input = input(DateEntryMode::Text);
        input.open(date(2024, 3, 15));

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|frame| {
                input.draw(frame, frame.area()).unwrap();
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = (0..20)
            .flat_map(|y| (0..60).map(move |x| (x, y)))
            .map(|pos| buffer.cell(pos).map(|c| c.symbol()).unwrap_or(" "))
            .collect();
        assert!(screen.contains("Due date (text)"), "screen was: {}", screen);
    }
}
