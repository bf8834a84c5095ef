//! Navigation sidebar
//!
//! Shown when the layout mode asks for it. It carries the navigation entries
//! and the signed-in user block, which is why the dashboard drops its own
//! header while the sidebar is on screen.

use crate::model::{Collection, Session};
use crate::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const APP_TITLE: &str = "Business Dashboard";

fn navigation_lines(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(format!(" {}", APP_TITLE), theme.title())),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                " ▶ ",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "Dashboard",
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    for (i, collection) in Collection::quick_actions().iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!(" {}  ", i + 1), theme.key_hint()),
            Span::styled(collection.title(), Style::default().fg(theme.text)),
        ]));
    }

    lines
}

fn user_lines(session: Option<&Session>, theme: &Theme) -> Vec<Line<'static>> {
    match session {
        Some(session) => vec![
            Line::from(Span::styled(
                format!(" {}", session.greeting_name()),
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(" {}", session.email),
                theme.muted_text(),
            )),
            Line::from(vec![
                Span::styled(" s ", theme.key_hint()),
                Span::raw("Sign out"),
            ]),
        ],
        None => vec![Line::from(Span::styled(" Not signed in", theme.muted_text()))],
    }
}

/// Draw the sidebar into `area`
pub fn render_sidebar(frame: &mut Frame, area: Rect, session: Option<&Session>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(inner);

    frame.render_widget(Paragraph::new(navigation_lines(theme)), chunks[0]);

    let user = Paragraph::new(user_lines(session, theme)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(user, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_navigation_lists_quick_actions() {
        let lines = text(&navigation_lines(&Theme::default()));
        assert!(lines.iter().any(|l| l.contains("Dashboard")));
        assert!(lines.iter().any(|l| l.contains("4  Team")));
    }

    #[test]
    fn test_user_block_shows_identity() {
        let session = Session {
            user_id: "u1".to_string(),
            email: "jane@example.com".to_string(),
            display_name: Some("Jane".to_string()),
            access_token: None,
        };
        let lines = text(&user_lines(Some(&session), &Theme::default()));
        assert!(lines[0].contains("Jane"));
        assert!(lines[1].contains("jane@example.com"));

        let anonymous = text(&user_lines(None, &Theme::default()));
        assert!(anonymous[0].contains("Not signed in"));
    }
}
