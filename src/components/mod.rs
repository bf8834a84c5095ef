//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod confirm_dialog;
pub mod dashboard;
pub mod date_input;
pub mod help_dialog;
pub mod layout;
pub mod record_list;
pub mod setup;
pub mod sidebar;

pub use confirm_dialog::ConfirmDialog;
pub use dashboard::{draw_dashboard, DashboardComponent, DashboardRenderContext};
pub use date_input::{DateEntryMode, DateInput};
pub use help_dialog::HelpDialog;
pub use layout::centered_popup;
pub use record_list::RecordListDialog;
pub use setup::SetupComponent;
