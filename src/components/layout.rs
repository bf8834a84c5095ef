//! Layout calculations for the UI

use crate::model::LayoutMode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

const SIDEBAR_WIDTH: u16 = 26;
const STAT_CARD_COUNT: usize = 5;

/// Dashboard screen areas
pub struct DashboardLayout {
    pub sidebar: Option<Rect>,
    pub header: Option<Rect>,
    pub cards: Vec<Rect>,
    pub chart: Rect,
    pub activity: Rect,
    pub quick_actions: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate dashboard layout.
///
/// The header row only exists while the sidebar is hidden, since the
/// sidebar already carries the user block and the sign-out hint.
pub fn calculate_dashboard_layout(area: Rect, mode: LayoutMode) -> DashboardLayout {
    // Body + status line + help bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let (sidebar, content) = if mode.show_sidebar {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(main_chunks[0]);
        (Some(chunks[0]), chunks[1])
    } else {
        (None, main_chunks[0])
    };

    let (header, rest) = if mode.shows_dashboard_header() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(content);
        (Some(chunks[0]), chunks[1])
    } else {
        (None, content)
    };

    // Stat cards, chart/activity row, quick actions
    let body_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(rest);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, STAT_CARD_COUNT as u32);
            STAT_CARD_COUNT
        ])
        .split(body_chunks[0])
        .to_vec();

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body_chunks[1]);

    DashboardLayout {
        sidebar,
        header,
        cards,
        chart: middle[0],
        activity: middle[1],
        quick_actions: body_chunks[2],
        status: main_chunks[1],
        help: main_chunks[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_respects_origin() {
        let area = Rect::new(10, 5, 40, 20);
        let popup = centered_popup(area, 20, 10);
        assert_eq!(popup, Rect::new(20, 10, 20, 10));

        let clamped = centered_popup(Rect::new(0, 0, 10, 4), 20, 10);
        assert_eq!(clamped.width, 10);
        assert_eq!(clamped.height, 4);
    }

    #[test]
    fn test_header_only_without_sidebar() {
        let area = Rect::new(0, 0, 120, 40);

        let with_sidebar = calculate_dashboard_layout(area, LayoutMode { show_sidebar: true });
        assert!(with_sidebar.sidebar.is_some());
        assert!(with_sidebar.header.is_none());

        let without = calculate_dashboard_layout(area, LayoutMode { show_sidebar: false });
        assert!(without.sidebar.is_none());
        assert!(without.header.is_some());
    }

    #[test]
    fn test_five_stat_cards() {
        let layout = calculate_dashboard_layout(
            Rect::new(0, 0, 100, 40),
            LayoutMode { show_sidebar: false },
        );
        assert_eq!(layout.cards.len(), 5);
        assert_eq!(layout.help.height, 3);
        assert_eq!(layout.status.height, 1);
    }
}
