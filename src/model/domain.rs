//! Domain state - fetched records and the aggregates shown on screen

use super::aggregates::DashboardAggregates;
use super::records::Snapshot;
use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Business data currently on display
#[derive(Debug, Default)]
pub struct DomainState {
    /// Records from the last successful refresh
    pub snapshot: Snapshot,

    /// Aggregates derived from `snapshot`
    pub aggregates: DashboardAggregates,

    /// When the last successful refresh was applied
    pub last_refreshed: Option<DateTime<Local>>,

    /// Month override for monthly revenue; `None` means the current month
    pub reporting_date: Option<NaiveDate>,
}

impl DomainState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot and every derived value in one step
    pub fn replace_snapshot(&mut self, snapshot: Snapshot, now: DateTime<Local>) {
        self.snapshot = snapshot;
        self.last_refreshed = Some(now);
        self.recompute(now);
    }

    /// Set or clear the reporting date and recompute from the held snapshot
    pub fn set_reporting_date(&mut self, date: Option<NaiveDate>, now: DateTime<Local>) {
        self.reporting_date = date;
        self.recompute(now);
    }

    /// Forget everything fetched for the previous user
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Instant whose month monthly revenue covers
    pub fn reference_time(&self, now: DateTime<Local>) -> DateTime<Local> {
        self.reporting_date
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .and_then(|noon| Local.from_local_datetime(&noon).earliest())
            .unwrap_or(now)
    }

    fn recompute(&mut self, now: DateTime<Local>) {
        let reference = self.reference_time(now);
        self.aggregates = DashboardAggregates::compute(&self.snapshot, &reference);
    }
}
