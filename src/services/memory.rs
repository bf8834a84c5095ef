//! In-process record store
//!
//! Holds every table in memory and applies the same user filter, ordering
//! and limit as the hosted store. Can be seeded from a JSON snapshot file
//! for offline use.

use super::store::{RecordStore, StoreError};
use crate::model::{Activity, Client, Employee, Invoice, Project};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// All tables, as stored in a snapshot file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Record store backed by in-memory tables
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Tables,
    source: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new(tables: Tables) -> Self {
        Self {
            tables,
            source: None,
        }
    }

    /// Load tables from a JSON snapshot file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| StoreError::Snapshot(format!("{}: {}", path.display(), e)))?;
        let tables: Tables = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Snapshot(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(
            path = %path.display(),
            projects = tables.projects.len(),
            invoices = tables.invoices.len(),
            "loaded snapshot file"
        );

        Ok(Self {
            tables,
            source: Some(path.to_path_buf()),
        })
    }
}

fn owned_by<T: Clone>(rows: &[T], user_id: &str, owner: impl Fn(&T) -> &str) -> Vec<T> {
    rows.iter().filter(|row| owner(row) == user_id).cloned().collect()
}

impl RecordStore for MemoryStore {
    fn projects(&self, user_id: &str) -> Result<Vec<Project>, StoreError> {
        Ok(owned_by(&self.tables.projects, user_id, |p| &p.user_id))
    }

    fn clients(&self, user_id: &str) -> Result<Vec<Client>, StoreError> {
        Ok(owned_by(&self.tables.clients, user_id, |c| &c.user_id))
    }

    fn invoices(&self, user_id: &str) -> Result<Vec<Invoice>, StoreError> {
        Ok(owned_by(&self.tables.invoices, user_id, |i| &i.user_id))
    }

    fn employees(&self, user_id: &str) -> Result<Vec<Employee>, StoreError> {
        Ok(owned_by(&self.tables.employees, user_id, |e| &e.user_id))
    }

    fn recent_activities(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Activity>, StoreError> {
        let mut activities = owned_by(&self.tables.activities, user_id, |a| &a.user_id);
        activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        activities.truncate(limit);
        Ok(activities)
    }

    fn describe(&self) -> String {
        match &self.source {
            Some(path) => format!("file {}", path.display()),
            None => "in-memory".to_string(),
        }
    }
}
