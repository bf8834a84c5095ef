//! Record types read from the store
//!
//! These are passive view models: the dashboard never writes them back.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Todo,
    InProgress,
    Completed,
    #[serde(other)]
    Other,
}

impl ProjectStatus {
    pub fn label(&self) -> &str {
        match self {
            ProjectStatus::Todo => "Not started",
            ProjectStatus::InProgress => "In progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Other => "Other",
        }
    }
}

/// Invoice payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
    #[serde(other)]
    Other,
}

impl InvoiceStatus {
    pub fn label(&self) -> &str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Sent => "Sent",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Cancelled => "Cancelled",
            InvoiceStatus::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub user_id: String,
    pub status: InvoiceStatus,
    /// Invoice total in the account currency
    pub total: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Team member record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Activity feed entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    /// Free-form category such as "invoice" or "project"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl Activity {
    pub fn icon(&self) -> &str {
        match self.kind.as_deref() {
            Some("project") => "◆",
            Some("invoice") => "$",
            Some("client") => "●",
            Some("employee") => "☺",
            _ => "•",
        }
    }
}

/// A user-scoped table in the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Projects,
    Clients,
    Invoices,
    Employees,
    Activities,
}

impl Collection {
    /// Collections reachable from the quick actions, in shortcut order
    pub fn quick_actions() -> [Collection; 4] {
        [
            Collection::Projects,
            Collection::Clients,
            Collection::Invoices,
            Collection::Employees,
        ]
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Clients => "clients",
            Collection::Invoices => "invoices",
            Collection::Employees => "employees",
            Collection::Activities => "activities",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Collection::Projects => "Projects",
            Collection::Clients => "Clients",
            Collection::Invoices => "Invoices",
            Collection::Employees => "Team",
            Collection::Activities => "Activity",
        }
    }
}

/// One fetch worth of records for a single user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub clients: Vec<Client>,
    pub invoices: Vec<Invoice>,
    pub employees: Vec<Employee>,
    /// Newest first, at most the store's activity limit
    pub activities: Vec<Activity>,
}
