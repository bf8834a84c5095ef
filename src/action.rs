//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::Collection;
use chrono::NaiveDate;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick; drives refresh polling
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    /// Scroll up one line
    ScrollUp,
    /// Scroll down one line
    ScrollDown,
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open sign-out confirmation dialog
    OpenSignOut,
    /// Open the keyboard shortcut reference
    OpenHelp,
    /// Open a read-only list of one collection
    OpenRecordList(Collection),
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Dashboard
    // ─────────────────────────────────────────────────────────────────────────
    /// Fetch a fresh snapshot for the signed-in user
    Refresh,
    /// Open the reporting date picker
    OpenDatePicker,
    /// A date edit was confirmed
    DateConfirmed(NaiveDate),
    /// Go back to the current month
    ClearReportingDate,

    // ─────────────────────────────────────────────────────────────────────────
    // Layout & Session
    // ─────────────────────────────────────────────────────────────────────────
    /// Show or hide the navigation sidebar
    ToggleSidebar,
    /// Switch between the dark and light palettes
    ToggleTheme,
    /// Drop the session and everything fetched for it
    SignOut,

    // ─────────────────────────────────────────────────────────────────────────
    // Setup
    // ─────────────────────────────────────────────────────────────────────────
    /// Confirm setup wizard
    SetupConfirm,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenSignOut => write!(f, "OpenSignOut"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenRecordList(c) => write!(f, "OpenRecordList({})", c.table_name()),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::Refresh => write!(f, "Refresh"),
            Action::OpenDatePicker => write!(f, "OpenDatePicker"),
            Action::DateConfirmed(d) => write!(f, "DateConfirmed({})", d),
            Action::ClearReportingDate => write!(f, "ClearReportingDate"),
            Action::ToggleSidebar => write!(f, "ToggleSidebar"),
            Action::ToggleTheme => write!(f, "ToggleTheme"),
            Action::SignOut => write!(f, "SignOut"),
            Action::SetupConfirm => write!(f, "SetupConfirm"),
        }
    }
}
