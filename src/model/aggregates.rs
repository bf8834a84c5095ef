//! Dashboard aggregates derived from a record snapshot
//!
//! Aggregates are never persisted. They are recomputed wholesale from each
//! snapshot and thrown away with it.

use super::records::{Activity, InvoiceStatus, ProjectStatus, Snapshot};
use chrono::{DateTime, Datelike, TimeZone};

/// Project counts per recognised status, used by the status chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusBreakdown {
    pub todo: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusBreakdown {
    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.completed
    }
}

/// Summary values shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardAggregates {
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub total_clients: usize,
    pub pending_invoices: usize,
    pub overdue_invoices: usize,
    pub total_revenue: f64,
    pub monthly_revenue: f64,
    pub team_members: usize,
    pub status_breakdown: StatusBreakdown,
    pub recent_activity: Vec<Activity>,
}

impl DashboardAggregates {
    /// Compute aggregates for `snapshot`.
    ///
    /// Monthly revenue covers paid invoices created in the same calendar
    /// month and year as `now`, both read in `now`'s time zone.
    pub fn compute<Tz: TimeZone>(snapshot: &Snapshot, now: &DateTime<Tz>) -> Self {
        let mut breakdown = StatusBreakdown::default();
        for project in &snapshot.projects {
            match project.status {
                ProjectStatus::Todo => breakdown.todo += 1,
                ProjectStatus::InProgress => breakdown.in_progress += 1,
                ProjectStatus::Completed => breakdown.completed += 1,
                ProjectStatus::Other => {}
            }
        }

        let tz = now.timezone();
        let (year, month) = (now.year(), now.month());

        let mut pending_invoices = 0;
        let mut overdue_invoices = 0;
        let mut total_revenue = 0.0;
        let mut monthly_revenue = 0.0;

        for invoice in &snapshot.invoices {
            match invoice.status {
                InvoiceStatus::Sent => pending_invoices += 1,
                InvoiceStatus::Overdue => overdue_invoices += 1,
                InvoiceStatus::Paid => {
                    total_revenue += invoice.total;
                    let created = invoice.created_at.with_timezone(&tz);
                    if created.year() == year && created.month() == month {
                        monthly_revenue += invoice.total;
                    }
                }
                _ => {}
            }
        }

        Self {
            total_projects: snapshot.projects.len(),
            active_projects: breakdown.in_progress,
            completed_projects: breakdown.completed,
            total_clients: snapshot.clients.len(),
            pending_invoices,
            overdue_invoices,
            total_revenue,
            monthly_revenue,
            team_members: snapshot.employees.len(),
            status_breakdown: breakdown,
            recent_activity: snapshot.activities.clone(),
        }
    }
}

/// Format a currency amount as `$1,234.56`
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!(
        "{}${}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        cents % 100
    )
}
