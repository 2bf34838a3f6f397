//! Headless models of the lobby screens. They hold form state and drive
//! the request coordinators; drawing them is left to the front end.

mod decks;
mod lobby;
mod login;

pub use decks::{DeckOption, DeckSelection, DECKS_HELPER, DECKS_LEGEND};
pub use lobby::{
    CreateRoomForm, RoomJoin, CREATE_FAILED_NOTICE, NAME_ERROR_HELPER, PASSCODE_ERROR_HELPER,
    PASSCODE_HELPER, TARGET_HELPER,
};
pub use login::{LoginScreen, RoomsNavigation, USERNAME_HELPER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient message for the snackbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Error)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
