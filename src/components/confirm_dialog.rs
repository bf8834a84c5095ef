//! Yes/no confirmation dialog, used for quitting and signing out

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Confirmation dialog
pub struct ConfirmDialog {
    title: &'static str,
    question: &'static str,
    yes_label: &'static str,
    pub theme: Theme,
}

impl ConfirmDialog {
    pub fn quit() -> Self {
        Self {
            title: " Quit? ",
            question: "Are you sure you want to quit?",
            yes_label: "Yes, quit",
            theme: Theme::default(),
        }
    }

    pub fn sign_out() -> Self {
        Self {
            title: " Sign out? ",
            question: "Sign out of this account?",
            yes_label: "Yes, sign out",
            theme: Theme::default(),
        }
    }
}

impl Component for ConfirmDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmModal),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_area = centered_popup(area, 44, 7);

        frame.render_widget(Clear, popup_area);

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.question,
                Style::default()
                    .fg(self.theme.text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " y ",
                    Style::default()
                        .fg(self.theme.success)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{}  ", self.yes_label)),
                Span::styled(
                    " n/Esc ",
                    Style::default()
                        .fg(self.theme.danger)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("No, cancel"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.warning))
                    .title(self.title)
                    .title_style(self.theme.key_hint()),
            )
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_confirm_dialog_keys() {
        let mut dialog = ConfirmDialog::sign_out();
        let yes = dialog
            .handle_key_event(KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(yes, Some(Action::ConfirmModal));

        let esc = dialog
            .handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(esc, Some(Action::CloseModal));

        let other = dialog
            .handle_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(other, None);
    }
}
