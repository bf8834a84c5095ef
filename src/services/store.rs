//! Record store boundary
//!
//! The dashboard only ever reads user-scoped collections. Every read is
//! filtered by the signed-in user's id.

use crate::model::{Activity, Client, Collection, Employee, Invoice, Project, Snapshot};
use std::thread;

/// Number of activities shown in the recent activity list
pub const ACTIVITY_LIMIT: usize = 10;

fn body_suffix(body: &str) -> String {
    if body.trim().is_empty() {
        String::new()
    } else {
        format!(": {}", body.trim())
    }
}

/// Errors produced by record store reads
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request never produced a response
    #[error("request to '{table}' failed: {message}")]
    Request { table: &'static str, message: String },

    /// The store answered with a non-success status
    #[error("'{table}' returned status {status}{}", body_suffix(.body))]
    Status {
        table: &'static str,
        status: u16,
        body: String,
    },

    /// Rows could not be decoded into records
    #[error("could not decode '{table}' rows: {message}")]
    Decode { table: &'static str, message: String },

    /// A snapshot file could not be read
    #[error("could not read snapshot file: {0}")]
    Snapshot(String),

    /// The HTTP client could not be constructed
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A read thread panicked before reporting
    #[error("read of '{0}' did not complete")]
    Interrupted(&'static str),
}

/// Read access to user-scoped tables
///
/// An empty table is `Ok(vec![])`, never an error.
pub trait RecordStore: Send + Sync {
    fn projects(&self, user_id: &str) -> Result<Vec<Project>, StoreError>;

    fn clients(&self, user_id: &str) -> Result<Vec<Client>, StoreError>;

    fn invoices(&self, user_id: &str) -> Result<Vec<Invoice>, StoreError>;

    fn employees(&self, user_id: &str) -> Result<Vec<Employee>, StoreError>;

    /// Most recent activities, newest first, at most `limit`
    fn recent_activities(&self, user_id: &str, limit: usize)
        -> Result<Vec<Activity>, StoreError>;

    /// Short description for logs and the status line
    fn describe(&self) -> String;
}

/// Read every collection for `user_id` in parallel and join the results.
///
/// Either all reads succeed and a full snapshot is returned, or the first
/// failure (in collection order) is returned and nothing else is kept.
pub fn fetch_snapshot(store: &dyn RecordStore, user_id: &str) -> Result<Snapshot, StoreError> {
    thread::scope(|scope| {
        let projects = scope.spawn(|| store.projects(user_id));
        let clients = scope.spawn(|| store.clients(user_id));
        let invoices = scope.spawn(|| store.invoices(user_id));
        let employees = scope.spawn(|| store.employees(user_id));
        let activities = scope.spawn(|| store.recent_activities(user_id, ACTIVITY_LIMIT));

        let projects = join(projects, Collection::Projects);
        let clients = join(clients, Collection::Clients);
        let invoices = join(invoices, Collection::Invoices);
        let employees = join(employees, Collection::Employees);
        let activities = join(activities, Collection::Activities);

        Ok(Snapshot {
            projects: projects?,
            clients: clients?,
            invoices: invoices?,
            employees: employees?,
            activities: activities?,
        })
    })
}

fn join<T>(
    handle: thread::ScopedJoinHandle<'_, Result<T, StoreError>>,
    collection: Collection,
) -> Result<T, StoreError> {
    handle
        .join()
        .unwrap_or_else(|_| Err(StoreError::Interrupted(collection.table_name())))
}
