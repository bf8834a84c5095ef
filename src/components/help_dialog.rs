//! Help dialog component
//!
//! Lists every keyboard shortcut of the dashboard.

use crate::action::Action;
use crate::component::Component;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
    pub theme: Theme,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);

        let margin = 4;
        let dialog_area = Rect::new(
            area.x + margin,
            area.y + margin / 2,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin),
        );

        let content = build_help_content(&self.theme);
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(self.theme.title())
                    .border_style(Style::default().fg(self.theme.primary)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(max_scroll).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

fn build_help_content(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            theme.key_hint(),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.len() + 2)),
            theme.muted_text(),
        )));
    };

    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:12}", key),
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(theme.text)),
        ]));
    };

    add_section(&mut lines, "Dashboard");
    add_shortcut(&mut lines, "r", "Refresh data");
    add_shortcut(&mut lines, "d", "Pick reporting date");
    add_shortcut(&mut lines, "D", "Back to the current month");

    add_section(&mut lines, "Quick Actions");
    for (i, collection) in crate::model::Collection::quick_actions().iter().enumerate() {
        add_shortcut(
            &mut lines,
            &(i + 1).to_string(),
            &format!("Browse {}", collection.title().to_lowercase()),
        );
    }

    add_section(&mut lines, "Layout");
    add_shortcut(&mut lines, "b", "Toggle sidebar");
    add_shortcut(&mut lines, "t", "Switch light/dark theme");

    add_section(&mut lines, "Date Picker");
    add_shortcut(&mut lines, "←→↑↓", "Move by day / week");
    add_shortcut(&mut lines, "PgUp/PgDn", "Move by month");
    add_shortcut(&mut lines, "Enter", "Select / Confirm");
    add_shortcut(&mut lines, "Esc", "Cancel");

    add_section(&mut lines, "Session");
    add_shortcut(&mut lines, "s", "Sign out");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit");

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        theme.muted_text(),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_quick_actions() {
        let text: Vec<String> = build_help_content(&Theme::default())
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text.iter().any(|l| l.contains("Browse invoices")));
        assert!(text.iter().any(|l| l.contains("Sign out")));
    }
}
