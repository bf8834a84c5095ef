//! Dashboard component - Main application screen
//!
//! Stat cards, the project status chart, recent activity, and quick actions,
//! all drawn from the aggregates of the last applied snapshot.

use crate::action::Action;
use crate::component::Component;
use crate::components::date_input::DateInput;
use crate::components::layout::calculate_dashboard_layout;
use crate::components::sidebar::{render_sidebar, APP_TITLE};
use crate::model::domain::DomainState;
use crate::model::{format_currency, Collection, DashboardAggregates, LayoutMode, Session};
use crate::theme::Theme;
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub const EMPTY_ACTIVITY: &str = "No recent activity";

// ═══════════════════════════════════════════════════════════════════════════════
// Dashboard Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Keyboard entry point of the dashboard screen.
///
/// Holds only view state; the data it draws is passed in through
/// [`DashboardRenderContext`].
#[derive(Default)]
pub struct DashboardComponent {
    /// Selection in the recent activity list
    pub activity_state: ListState,

    /// Number of entries in the activity list at the last draw
    activity_len: usize,
}

impl DashboardComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn select_next(&mut self) {
        if self.activity_len == 0 {
            self.activity_state.select(None);
            return;
        }
        let next = match self.activity_state.selected() {
            Some(i) if i + 1 < self.activity_len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.activity_state.select(Some(next));
    }

    fn select_previous(&mut self) {
        if self.activity_len == 0 {
            self.activity_state.select(None);
            return;
        }
        let prev = self
            .activity_state
            .selected()
            .map(|i| i.saturating_sub(1))
            .unwrap_or(0);
        self.activity_state.select(Some(prev));
    }
}

impl Component for DashboardComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('d') => Some(Action::OpenDatePicker),
            KeyCode::Char('D') => Some(Action::ClearReportingDate),

            // Quick actions
            KeyCode::Char(c @ '1'..='4') => {
                let index = (c as usize) - ('1' as usize);
                Collection::quick_actions()
                    .get(index)
                    .copied()
                    .map(Action::OpenRecordList)
            }

            // Activity list
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),

            // Layout
            KeyCode::Char('b') => Some(Action::ToggleSidebar),
            KeyCode::Char('t') => Some(Action::ToggleTheme),

            // Modals
            KeyCode::Char('s') => Some(Action::OpenSignOut),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),

            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ScrollDown => self.select_next(),
            Action::ScrollUp => self.select_previous(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing goes through draw_dashboard, which takes the full context
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the dashboard
pub struct DashboardRenderContext<'a> {
    pub domain: &'a DomainState,
    pub session: Option<&'a Session>,
    pub layout: LayoutMode,
    pub theme: &'a Theme,
    pub refreshing: bool,
    pub store: Option<&'a str>,
    pub error: Option<&'a str>,
    pub reporting_date: &'a DateInput,
}

/// Draw the dashboard screen
pub fn draw_dashboard(
    frame: &mut Frame,
    area: Rect,
    dashboard: &mut DashboardComponent,
    ctx: &DashboardRenderContext,
) -> Result<()> {
    let layout = calculate_dashboard_layout(area, ctx.layout);
    let aggregates = &ctx.domain.aggregates;

    if let Some(sidebar_area) = layout.sidebar {
        render_sidebar(frame, sidebar_area, ctx.session, ctx.theme);
    }
    if let Some(header_area) = layout.header {
        render_header(frame, header_area, ctx.session, ctx.theme);
    }

    for (card, area) in stat_cards(aggregates).iter().zip(layout.cards.iter()) {
        render_stat_card(frame, *area, card, ctx.theme);
    }

    render_status_chart(frame, layout.chart, aggregates, ctx.theme);

    dashboard.activity_len = aggregates.recent_activity.len();
    render_activity(frame, layout.activity, dashboard, aggregates, ctx.theme);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)])
        .split(layout.quick_actions);
    render_quick_actions(frame, bottom[0], ctx.theme);
    let date_area = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ctx.theme.border));
    let date_inner = date_area.inner(bottom[1]);
    frame.render_widget(date_area, bottom[1]);
    ctx.reporting_date.draw_button(frame, date_inner);

    render_status_line(frame, layout.status, ctx);
    render_help_bar(frame, layout.help, ctx.theme);

    Ok(())
}

fn render_header(frame: &mut Frame, area: Rect, session: Option<&Session>, theme: &Theme) {
    let greeting = session
        .map(|s| format!("Welcome back, {}", s.greeting_name()))
        .unwrap_or_default();

    let left = Line::from(vec![
        Span::styled(format!(" {} ", APP_TITLE), theme.title()),
        Span::styled(greeting, Style::default().fg(theme.text)),
    ]);
    let right = Line::from(vec![
        Span::styled(" s ", theme.key_hint()),
        Span::raw("Sign out "),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(left), inner);
    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), inner);
}

/// One stat card: title, headline value, detail line
struct StatCard {
    title: &'static str,
    value: String,
    detail: String,
}

fn stat_cards(aggregates: &DashboardAggregates) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Projects",
            value: aggregates.total_projects.to_string(),
            detail: format!(
                "{} active · {} done",
                aggregates.active_projects, aggregates.completed_projects
            ),
        },
        StatCard {
            title: "Clients",
            value: aggregates.total_clients.to_string(),
            detail: "total".to_string(),
        },
        StatCard {
            title: "Invoices",
            value: aggregates.pending_invoices.to_string(),
            detail: format!("pending · {} overdue", aggregates.overdue_invoices),
        },
        StatCard {
            title: "Revenue",
            value: format_currency(aggregates.total_revenue),
            detail: format!("{} this month", format_currency(aggregates.monthly_revenue)),
        },
        StatCard {
            title: "Team",
            value: aggregates.team_members.to_string(),
            detail: "members".to_string(),
        },
    ]
}

fn render_stat_card(frame: &mut Frame, area: Rect, card: &StatCard, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled(
            card.value.clone(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(card.detail.clone(), theme.muted_text())),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", card.title))
            .title_style(theme.title())
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(paragraph, area);
}

fn render_status_chart(frame: &mut Frame, area: Rect, aggregates: &DashboardAggregates, theme: &Theme) {
    let breakdown = aggregates.status_breakdown;
    let bars = [
        ("Not started", breakdown.todo, theme.muted),
        ("In progress", breakdown.in_progress, theme.warning),
        ("Completed", breakdown.completed, theme.success),
    ]
    .into_iter()
    .map(|(label, value, color)| {
        Bar::default()
            .value(value as u64)
            .label(Line::from(label))
            .style(Style::default().fg(color))
            .value_style(Style::default().fg(theme.text).bg(color))
    })
    .collect::<Vec<_>>();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Project Status ")
                .title_style(theme.title())
                .border_style(Style::default().fg(theme.border)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(11)
        .bar_gap(2);

    frame.render_widget(chart, area);
}

fn render_activity(
    frame: &mut Frame,
    area: Rect,
    dashboard: &mut DashboardComponent,
    aggregates: &DashboardAggregates,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Recent Activity ")
        .title_style(theme.title())
        .border_style(Style::default().fg(theme.border));

    if aggregates.recent_activity.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(EMPTY_ACTIVITY, theme.muted_text())),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = aggregates
        .recent_activity
        .iter()
        .map(|activity| {
            let when = activity
                .created_at
                .with_timezone(&Local)
                .format("%b %-d, %H:%M")
                .to_string();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", activity.icon()),
                    Style::default().fg(theme.accent),
                ),
                Span::styled(activity.description.clone(), Style::default().fg(theme.text)),
                Span::styled(format!("  {}", when), theme.muted_text()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut dashboard.activity_state);
}

fn render_quick_actions(frame: &mut Frame, area: Rect, theme: &Theme) {
    let mut spans = vec![];
    for (i, collection) in Collection::quick_actions().iter().enumerate() {
        spans.push(Span::styled(format!(" {} ", i + 1), theme.key_hint()));
        spans.push(Span::raw(format!("{}  ", collection.title())));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Quick Actions ")
            .title_style(theme.title())
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(paragraph, area);
}

fn status_spans<'a>(ctx: &DashboardRenderContext<'a>) -> Vec<Span<'static>> {
    let theme = ctx.theme;
    let mut spans = vec![];

    if let Some(store) = ctx.store {
        spans.push(Span::styled(
            format!(" {} ", store),
            Style::default()
                .fg(theme.background)
                .bg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    match ctx.domain.last_refreshed {
        Some(at) => spans.push(Span::styled(
            format!("Updated {}", at.format("%H:%M:%S")),
            theme.muted_text(),
        )),
        None => spans.push(Span::styled("Not loaded yet", theme.muted_text())),
    }

    if ctx.refreshing {
        spans.push(Span::styled(
            "  refreshing…",
            Style::default().fg(theme.warning),
        ));
    }

    if let Some(error) = ctx.error {
        spans.push(Span::styled(
            format!("  Error: {}", error),
            Style::default().fg(theme.danger),
        ));
    }

    spans
}

fn render_status_line(frame: &mut Frame, area: Rect, ctx: &DashboardRenderContext) {
    frame.render_widget(Paragraph::new(Line::from(status_spans(ctx))), area);
}

fn render_help_bar(frame: &mut Frame, area: Rect, theme: &Theme) {
    let key = |k: &str| {
        Span::styled(
            format!(" {} ", k),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )
    };

    let help_spans = vec![
        Span::styled(" q ", theme.key_hint()),
        Span::raw("Quit "),
        key("r"),
        Span::raw("Refresh "),
        key("d"),
        Span::raw("Date "),
        key("1-4"),
        Span::raw("Lists "),
        key("b"),
        Span::raw("Sidebar "),
        key("t"),
        Span::raw("Theme "),
        key("?"),
        Span::raw("Help"),
    ];

    let paragraph = Paragraph::new(Line::from(help_spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::date_input::DateEntryMode;
    use crate::model::{Activity, Snapshot};
    use chrono::TimeZone;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn session() -> Session {
        Session {
            user_id: "u1".to_string(),
            email: "jane@example.com".to_string(),
            display_name: Some("Jane".to_string()),
            access_token: None,
        }
    }

    fn date_input() -> DateInput {
        DateInput::new(
            "Reporting date",
            DateEntryMode::Text.strategy(),
            Theme::default(),
        )
        .with_placeholder("This month")
    }

    fn render(domain: &DomainState, layout: LayoutMode, session: Option<&Session>) -> String {
        let theme = Theme::default();
        let reporting = date_input();
        let mut dashboard = DashboardComponent::new();
        let ctx = DashboardRenderContext {
            domain,
            session,
            layout,
            theme: &theme,
            refreshing: false,
            store: Some("memory"),
            error: None,
            reporting_date: &reporting,
        };

        let (width, height) = (140, 40);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                draw_dashboard(frame, frame.area(), &mut dashboard, &ctx).unwrap();
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_empty_activity_shows_message() {
        let screen = render(&DomainState::new(), LayoutMode::default(), Some(&session()));
        assert!(screen.contains(EMPTY_ACTIVITY));
        assert!(screen.contains("Not loaded yet"));
    }

    #[test]
    fn test_activity_replaces_empty_state() {
        let mut domain = DomainState::new();
        let now = Local.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        domain.replace_snapshot(
            Snapshot {
                activities: vec![Activity {
                    id: "a1".to_string(),
                    user_id: "u1".to_string(),
                    created_at: "2024-03-19T09:00:00Z".parse().unwrap(),
                    description: "Sent invoice INV-7".to_string(),
                    kind: Some("invoice".to_string()),
                }],
                ..Default::default()
            },
            now,
        );

        let screen = render(&domain, LayoutMode::default(), Some(&session()));
        assert!(screen.contains("Sent invoice INV-7"));
        assert!(!screen.contains(EMPTY_ACTIVITY));
    }

    #[test]
    fn test_header_only_when_sidebar_hidden() {
        let domain = DomainState::new();

        let without_sidebar = render(&domain, LayoutMode { show_sidebar: false }, Some(&session()));
        assert!(without_sidebar.contains("Welcome back, Jane"));

        let with_sidebar = render(&domain, LayoutMode { show_sidebar: true }, Some(&session()));
        assert!(!with_sidebar.contains("Welcome back"));
        assert!(with_sidebar.contains("jane@example.com"));
    }

    #[test]
    fn test_stat_cards_use_aggregates() {
        let aggregates = DashboardAggregates {
            total_revenue: 1500.0,
            monthly_revenue: 250.0,
            overdue_invoices: 2,
            ..Default::default()
        };
        let cards = stat_cards(&aggregates);
        let revenue = cards.iter().find(|c| c.title == "Revenue").unwrap();
        assert_eq!(revenue.value, "$1,500.00");
        assert!(revenue.detail.contains("$250.00"));
        let invoices = cards.iter().find(|c| c.title == "Invoices").unwrap();
        assert!(invoices.detail.contains("2 overdue"));
    }

    #[test]
    fn test_quick_action_keys() {
        let mut dashboard = DashboardComponent::new();
        let action = dashboard
            .handle_key_event(KeyEvent::new(KeyCode::Char('3'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(action, Some(Action::OpenRecordList(Collection::Invoices)));

        let none = dashboard
            .handle_key_event(KeyEvent::new(KeyCode::Char('5'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(none, None);
    }

    #[test]
    fn test_activity_selection_without_items() {
        let mut dashboard = DashboardComponent::new();
        dashboard.update(Action::ScrollDown).unwrap();
        assert_eq!(dashboard.activity_state.selected(), None);
    }
}
