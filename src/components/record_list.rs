//! Record list dialog
//!
//! Read-only table of one collection from the last snapshot, opened from
//! the dashboard's quick actions.

use crate::action::Action;
use crate::component::Component;
use crate::components::date_input::format_date;
use crate::model::{format_currency, Collection, Snapshot};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MAX_COLUMN_WIDTH: usize = 40;

/// Table dialog for a single collection
pub struct RecordListDialog {
    collection: Collection,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    scroll: usize,
    pub theme: Theme,
}

impl Default for RecordListDialog {
    fn default() -> Self {
        Self::new()
    }
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "—".to_string(),
    }
}

/// Cut `text` to `width` display columns, marking the cut with `…`
fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn pad_to_width(text: &str, width: usize) -> String {
    let mut out = text.to_string();
    for _ in text.width()..width {
        out.push(' ');
    }
    out
}

impl RecordListDialog {
    pub fn new() -> Self {
        Self {
            collection: Collection::Projects,
            headers: Vec::new(),
            rows: Vec::new(),
            scroll: 0,
            theme: Theme::default(),
        }
    }

    #[cfg(test)]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Fill the table from `snapshot`
    pub fn set_records(&mut self, collection: Collection, snapshot: &Snapshot) {
        self.collection = collection;
        self.scroll = 0;

        let (headers, rows): (&[&str], Vec<Vec<String>>) = match collection {
            Collection::Projects => (
                &["Name", "Status", "Created"][..],
                snapshot
                    .projects
                    .iter()
                    .map(|p| {
                        vec![
                            or_dash(p.name.as_deref()),
                            p.status.label().to_string(),
                            p.created_at
                                .map(|t| format_date(t.date_naive()))
                                .unwrap_or_else(|| "—".to_string()),
                        ]
                    })
                    .collect(),
            ),
            Collection::Clients => (
                &["Name", "Company", "Email"][..],
                snapshot
                    .clients
                    .iter()
                    .map(|c| {
                        vec![
                            or_dash(c.name.as_deref()),
                            or_dash(c.company.as_deref()),
                            or_dash(c.email.as_deref()),
                        ]
                    })
                    .collect(),
            ),
            Collection::Invoices => (
                &["Number", "Status", "Total", "Created", "Due"][..],
                snapshot
                    .invoices
                    .iter()
                    .map(|i| {
                        vec![
                            or_dash(i.invoice_number.as_deref()),
                            i.status.label().to_string(),
                            format_currency(i.total),
                            format_date(i.created_at.date_naive()),
                            i.due_date.map(format_date).unwrap_or_else(|| "—".to_string()),
                        ]
                    })
                    .collect(),
            ),
            Collection::Employees => (
                &["Name", "Role"][..],
                snapshot
                    .employees
                    .iter()
                    .map(|e| vec![or_dash(e.name.as_deref()), or_dash(e.role.as_deref())])
                    .collect(),
            ),
            Collection::Activities => (
                &["When", "Activity"][..],
                snapshot
                    .activities
                    .iter()
                    .map(|a| {
                        vec![
                            format_date(a.created_at.date_naive()),
                            a.description.clone(),
                        ]
                    })
                    .collect(),
            ),
        };

        self.headers = headers.iter().map(|h| h.to_string()).collect();
        self.rows = rows;
    }

    fn build_table_lines(&self) -> Vec<Line<'static>> {
        if self.rows.is_empty() {
            return vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("  No {} yet", self.collection.title().to_lowercase()),
                    self.theme.muted_text(),
                )),
            ];
        }

        let mut col_widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = col_widths.get_mut(i) {
                    *width = (*width).max(cell.width());
                }
            }
        }
        for width in &mut col_widths {
            *width = (*width).min(MAX_COLUMN_WIDTH);
        }

        let render_row = |cells: &[String], style: Style| -> Line<'static> {
            let spans: Vec<Span<'static>> = cells
                .iter()
                .enumerate()
                .flat_map(|(i, cell)| {
                    let width = col_widths.get(i).copied().unwrap_or(10);
                    vec![
                        Span::styled(pad_to_width(&truncate_to_width(cell, width), width), style),
                        Span::raw(" │ "),
                    ]
                })
                .collect();
            Line::from(spans)
        };

        let mut lines = vec![render_row(
            &self.headers,
            Style::default()
                .fg(self.theme.primary)
                .add_modifier(Modifier::BOLD),
        )];

        let separator = col_widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        lines.push(Line::from(Span::styled(separator, self.theme.muted_text())));

        for row in &self.rows {
            lines.push(render_row(row, Style::default().fg(self.theme.text)));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Total: {}", self.rows.len()),
            Style::default().fg(self.theme.warning),
        )));

        lines
    }
}

impl Component for RecordListDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageDown)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageUp)
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let max_scroll = self.rows.len().saturating_sub(1);
        match action {
            Action::ScrollDown => {
                if self.scroll < max_scroll {
                    self.scroll += 1;
                }
            }
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            Action::PageDown => {
                self.scroll = (self.scroll + 10).min(max_scroll);
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);

        let margin = 2;
        let overlay_area = Rect::new(
            area.x + margin,
            area.y + margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let content = self.build_table_lines();
        let total = content.len();
        let visible_height = overlay_area.height.saturating_sub(2) as usize;

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.collection.title()))
                    .title_style(self.theme.title())
                    .border_style(Style::default().fg(self.theme.primary)),
            )
            .scroll((self.scroll as u16, 0));

        frame.render_widget(paragraph, overlay_area);

        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                overlay_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::records::{Invoice, InvoiceStatus};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn test_invoice_rows_show_currency() {
        let snapshot = Snapshot {
            invoices: vec![Invoice {
                id: "i1".to_string(),
                user_id: "u1".to_string(),
                status: InvoiceStatus::Overdue,
                total: 1234.5,
                created_at: "2024-03-15T10:00:00Z".parse().unwrap(),
                invoice_number: Some("INV-042".to_string()),
                due_date: None,
            }],
            ..Default::default()
        };

        let mut dialog = RecordListDialog::new();
        dialog.set_records(Collection::Invoices, &snapshot);
        assert_eq!(dialog.row_count(), 1);

        let lines: Vec<String> = dialog.build_table_lines().iter().map(line_text).collect();
        assert!(lines[0].contains("Number"));
        assert!(lines[2].contains("INV-042"));
        assert!(lines[2].contains("$1,234.50"));
        assert!(lines[2].contains("Overdue"));
        assert!(lines[2].contains("Mar 15, 2024"));
    }

    #[test]
    fn test_empty_collection_message() {
        let mut dialog = RecordListDialog::new();
        dialog.set_records(Collection::Employees, &Snapshot::default());
        let lines: Vec<String> = dialog.build_table_lines().iter().map(line_text).collect();
        assert!(lines.iter().any(|l| l.contains("No team yet")));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut dialog = RecordListDialog::new();
        dialog.set_records(Collection::Clients, &Snapshot::default());
        dialog.update(Action::ScrollDown).unwrap();
        dialog.update(Action::PageDown).unwrap();
        assert_eq!(dialog.scroll, 0);
    }
}
