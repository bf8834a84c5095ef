//! Model layer - centralized state management
//!
//! - `records` - Rows read from the record store
//! - `aggregates` - Pure summary computation over a snapshot
//! - `DomainState` - Snapshot and aggregates on display
//! - `Session` / `LayoutMode` - Injected user and layout context
//! - `ModalStack` - Modal overlay management
//! - `AppMode` - Which screen is showing

pub mod aggregates;
pub mod domain;
pub mod modal;
pub mod records;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use aggregates::{format_currency, DashboardAggregates};
pub use records::{Activity, Client, Collection, Employee, Invoice, Project, Snapshot};
pub use session::{LayoutMode, Session};
