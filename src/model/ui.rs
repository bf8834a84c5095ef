//! UI-level state enums

/// Application mode/screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// First-run or sign-in wizard
    #[default]
    Setup,
    /// No session; the dashboard is not shown
    SignedOut,
    /// Dashboard for the signed-in user
    Running,
}
