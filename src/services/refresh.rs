//! Background refresh service
//!
//! Runs dashboard fetches off the UI thread. Every refresh gets a generation
//! number; the UI only ever applies an outcome newer than the last one that
//! settled, so overlapping refreshes resolve to whichever was issued last.

use super::store::{fetch_snapshot, RecordStore, StoreError};
use crate::model::Snapshot;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Message sent from a refresh thread back to the UI thread
#[derive(Debug)]
enum RefreshMessage {
    Completed { generation: u64, snapshot: Snapshot },
    Failed { generation: u64, error: StoreError },
}

impl RefreshMessage {
    fn generation(&self) -> u64 {
        match self {
            RefreshMessage::Completed { generation, .. }
            | RefreshMessage::Failed { generation, .. } => *generation,
        }
    }
}

/// Refresh runner for the dashboard
pub struct RefreshWorker {
    store: Arc<dyn RecordStore>,
    sender: Sender<RefreshMessage>,
    receiver: Receiver<RefreshMessage>,
    /// Generation of the most recently issued refresh
    issued: u64,
    /// Newest generation that has been applied or has failed
    settled: u64,
    /// Refreshes whose threads have not reported yet
    in_flight: usize,
    started_at: Option<Instant>,
}

impl RefreshWorker {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            store,
            sender,
            receiver,
            issued: 0,
            settled: 0,
            in_flight: 0,
            started_at: None,
        }
    }

    pub fn store_description(&self) -> String {
        self.store.describe()
    }

    /// Whether any refresh is still outstanding
    pub fn is_refreshing(&self) -> bool {
        self.in_flight > 0
    }

    /// Start a refresh for `user_id`, returning its generation
    pub fn spawn(&mut self, user_id: &str) -> u64 {
        self.issued += 1;
        self.in_flight += 1;
        self.started_at = Some(Instant::now());

        let generation = self.issued;
        let store = Arc::clone(&self.store);
        let sender = self.sender.clone();
        let user_id = user_id.to_string();

        thread::spawn(move || {
            let message = match fetch_snapshot(store.as_ref(), &user_id) {
                Ok(snapshot) => RefreshMessage::Completed {
                    generation,
                    snapshot,
                },
                Err(error) => RefreshMessage::Failed { generation, error },
            };
            // The receiver is gone only when the worker was dropped
            let _ = sender.send(message);
        });

        generation
    }

    /// Drop any outstanding refresh, e.g. when the signed-in user changes
    pub fn invalidate(&mut self) {
        self.settled = self.issued;
    }

    /// Drain finished refreshes, returning the newest snapshot to apply.
    ///
    /// Failures are logged and settle their generation, leaving the
    /// previously displayed data in place.
    pub fn poll(&mut self) -> Option<Snapshot> {
        let mut latest = None;

        loop {
            let message = match self.receiver.try_recv() {
                Ok(message) => message,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            self.in_flight = self.in_flight.saturating_sub(1);

            let generation = message.generation();
            if generation <= self.settled {
                tracing::debug!(generation, settled = self.settled, "discarding stale refresh");
                continue;
            }
            self.settled = generation;

            match message {
                RefreshMessage::Completed { snapshot, .. } => {
                    let elapsed_ms = self
                        .started_at
                        .map(|t| t.elapsed().as_millis() as u64)
                        .unwrap_or_default();
                    tracing::info!(
                        generation,
                        projects = snapshot.projects.len(),
                        invoices = snapshot.invoices.len(),
                        activities = snapshot.activities.len(),
                        elapsed_ms,
                        "refresh completed"
                    );
                    latest = Some(snapshot);
                }
                RefreshMessage::Failed { error, .. } => {
                    tracing::warn!(generation, %error, "refresh failed, keeping previous data");
                }
            }
        }

        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::records::{Activity, Client, Employee, Invoice, Project, ProjectStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Store whose first projects read is slow; each read returns one more
    /// project than the previous read did.
    #[derive(Default)]
    struct SlowFirstStore {
        calls: AtomicUsize,
        fail_after_first: bool,
    }

    impl RecordStore for SlowFirstStore {
        fn projects(&self, user_id: &str) -> Result<Vec<Project>, StoreError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                thread::sleep(Duration::from_millis(200));
            } else if self.fail_after_first {
                return Err(StoreError::Request {
                    table: "projects",
                    message: "connection reset".to_string(),
                });
            }
            Ok((0..=call)
                .map(|i| Project {
                    id: format!("p{}", i),
                    user_id: user_id.to_string(),
                    status: ProjectStatus::InProgress,
                    name: None,
                    created_at: None,
                })
                .collect())
        }
        fn clients(&self, _: &str) -> Result<Vec<Client>, StoreError> {
            Ok(Vec::new())
        }
        fn invoices(&self, _: &str) -> Result<Vec<Invoice>, StoreError> {
            Ok(Vec::new())
        }
        fn employees(&self, _: &str) -> Result<Vec<Employee>, StoreError> {
            Ok(Vec::new())
        }
        fn recent_activities(&self, _: &str, _: usize) -> Result<Vec<Activity>, StoreError> {
            Ok(Vec::new())
        }
        fn describe(&self) -> String {
            "slow-first".to_string()
        }
    }

    /// Block until the first projects read has started
    fn wait_for_first_read(store: &SlowFirstStore) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while store.calls.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// Poll until no refresh is outstanding, keeping the last applied snapshot
    fn settle(worker: &mut RefreshWorker) -> Option<Snapshot> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut applied = None;
        while worker.is_refreshing() && Instant::now() < deadline {
            if let Some(snapshot) = worker.poll() {
                applied = Some(snapshot);
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!worker.is_refreshing(), "refreshes did not settle in time");
        applied
    }

    #[test]
    fn test_single_refresh_applies_snapshot() {
        let mut worker = RefreshWorker::new(Arc::new(SlowFirstStore::default()));
        assert_eq!(worker.spawn("u1"), 1);
        assert!(worker.is_refreshing());

        let snapshot = settle(&mut worker).expect("snapshot applied");
        assert_eq!(snapshot.projects.len(), 1);
    }

    #[test]
    fn test_overlapping_refreshes_last_issued_wins() {
        let store = Arc::new(SlowFirstStore::default());
        let mut worker = RefreshWorker::new(store.clone());
        worker.spawn("u1");
        wait_for_first_read(&store);
        worker.spawn("u1");

        // The second refresh resolves first with two projects; the first
        // arrives later with one project and must be discarded.
        let mut last_applied = None;
        let deadline = Instant::now() + Duration::from_secs(5);
        while worker.is_refreshing() && Instant::now() < deadline {
            if let Some(snapshot) = worker.poll() {
                last_applied = Some(snapshot);
            }
            thread::sleep(Duration::from_millis(5));
        }

        let snapshot = last_applied.expect("second refresh applied");
        assert_eq!(snapshot.projects.len(), 2);
    }

    #[test]
    fn test_failed_newer_refresh_discards_older_success() {
        let store = Arc::new(SlowFirstStore {
            fail_after_first: true,
            ..Default::default()
        });
        let mut worker = RefreshWorker::new(store.clone());
        worker.spawn("u1");
        wait_for_first_read(&store);
        worker.spawn("u1");

        assert!(settle(&mut worker).is_none());
    }

    #[test]
    fn test_invalidate_drops_outstanding_refresh() {
        let mut worker = RefreshWorker::new(Arc::new(SlowFirstStore::default()));
        worker.spawn("u1");
        worker.invalidate();

        assert!(settle(&mut worker).is_none());
    }
}
