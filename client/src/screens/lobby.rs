use serde_json::Value;
use shared::protocol::{CreateRoomRequest, Deck, RoomOptions};
use tracing::{info, warn};

use crate::fetch::{Call, Outcome, RequestCoordinator};
use crate::screens::decks::DeckSelection;
use crate::screens::{Notice, Notifier};

pub const NAME_ERROR_HELPER: &str =
    "Game name must be between 2-16 characters long with no special characters!";
pub const TARGET_HELPER: &str = "Number of points required to end the game.";
pub const PASSCODE_HELPER: &str = "People will need this password to enter your game.";
pub const PASSCODE_ERROR_HELPER: &str =
    "Password must be between 4-12 characters long with no special characters.";
pub const CREATE_FAILED_NOTICE: &str = "Something went wrong...";

/// What the lobby needs to enter a freshly created room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomJoin {
    pub room_id: String,
    pub passcode: Option<String>,
}

// 🏠 Create-room form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoomForm {
    pub name: String,
    pub target: u32,
    pub max_players: u32,
    pub max_spectators: u32,
    pub is_protected: bool,
    pub passcode: String,
    pub decks: DeckSelection,
    error_field: Option<String>,
}

impl Default for CreateRoomForm {
    fn default() -> Self {
        let options = RoomOptions::default();
        Self {
            name: String::new(),
            target: options.target,
            max_players: options.max_players,
            max_spectators: options.max_spectators,
            is_protected: false,
            passcode: String::new(),
            decks: DeckSelection::default(),
            error_field: None,
        }
    }
}

impl CreateRoomForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the deck checklist with a fresh listing.
    pub fn set_decks(&mut self, decks: &[Deck]) {
        self.decks = DeckSelection::new(decks);
    }

    /// The passcode only goes out for a protected room that has one.
    pub fn payload(&self) -> CreateRoomRequest {
        let passcode =
            (self.is_protected && !self.passcode.is_empty()).then(|| self.passcode.clone());
        CreateRoomRequest {
            name: self.name.clone(),
            options: RoomOptions {
                target: self.target,
                max_players: self.max_players,
                max_spectators: self.max_spectators,
                decks: self.decks.selected_ids(),
            },
            passcode,
        }
    }

    /// Field the server rejected on the last submit.
    pub fn error_field(&self) -> Option<&str> {
        self.error_field.as_deref()
    }

    pub fn name_helper(&self) -> Option<&'static str> {
        (self.error_field() == Some("name")).then_some(NAME_ERROR_HELPER)
    }

    pub fn passcode_helper(&self) -> Option<&'static str> {
        if !self.is_protected {
            return None;
        }
        if self.error_field() == Some("passcode") {
            Some(PASSCODE_ERROR_HELPER)
        } else {
            Some(PASSCODE_HELPER)
        }
    }

    pub fn decks_error(&self) -> bool {
        self.decks.is_visible() && !self.decks.is_valid()
    }

    /// Posts the room through `create`. Failures mark the offending field
    /// and raise a notice; a redirect or a superseded call yields nothing.
    pub async fn submit(
        &mut self,
        create: &RequestCoordinator<Value>,
        notifier: &dyn Notifier,
    ) -> Option<RoomJoin> {
        let payload = self.payload();
        let call = match Call::new().with_json(&payload) {
            Ok(call) => call,
            Err(err) => {
                warn!("❌ Could not encode room '{}': {}", payload.name, err);
                notifier.notify(Notice::error(CREATE_FAILED_NOTICE));
                return None;
            }
        };

        match create.trigger(call).await {
            Ok(Outcome::Completed(response)) => match response.field("_id") {
                Some(room_id) => {
                    info!("🚀 Created room '{}' ({})", payload.name, room_id);
                    self.error_field = None;
                    Some(RoomJoin {
                        room_id: room_id.to_string(),
                        passcode: payload.passcode,
                    })
                }
                None => {
                    warn!("❌ Room created without an id");
                    notifier.notify(Notice::error(CREATE_FAILED_NOTICE));
                    None
                }
            },
            Ok(_) => None,
            Err(err) => {
                if let Some(issue) = err.validation_issues().first() {
                    self.error_field = Some(issue.field.clone());
                }
                notifier.notify(Notice::error(CREATE_FAILED_NOTICE));
                None
            }
        }
    }
}
