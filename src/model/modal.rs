//! Modal stack for managing overlays
//!
//! Only the top modal receives input; modals render bottom to top.

use super::records::Collection;

/// A modal overlay drawn on top of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Sign-out confirmation dialog
    SignOutConfirm,
    /// Reporting date picker
    DatePicker,
    /// Read-only list of one collection from the last snapshot
    RecordList { collection: Collection },
    /// Keyboard shortcut reference
    Help,
}

/// A stack of modal overlays
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Drop every open modal
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}
