//! Signed-in user and layout mode
//!
//! Both are handed to the dashboard explicitly instead of being looked up
//! from global state.

use serde::{Deserialize, Serialize};

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Bearer token for the record store; the api key is used when absent
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Session {
    /// Name to greet the user with
    pub fn greeting_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

/// Whether a persistent navigation sidebar is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutMode {
    pub show_sidebar: bool,
}

impl LayoutMode {
    /// The dashboard draws its own header only when the sidebar is hidden
    pub fn shows_dashboard_header(&self) -> bool {
        !self.show_sidebar
    }

    pub fn toggle_sidebar(&mut self) {
        self.show_sidebar = !self.show_sidebar;
    }
}
