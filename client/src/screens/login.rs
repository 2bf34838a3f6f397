use shared::protocol::{LoginRequest, LoginResponse};
use tracing::{info, warn};

use crate::fetch::{AuthContext, Call, Outcome, RequestCoordinator};
use crate::lobby_client::LobbyClient;

pub const USERNAME_HELPER: &str = "Enter a unique name";

/// Route taken once the player is logged in.
pub trait RoomsNavigation: Send + Sync {
    fn open_rooms(&self);
}

// 🔐 Login screen
pub struct LoginScreen {
    username: String,
    message: Option<String>,
    login: RequestCoordinator<LoginResponse>,
    auth: AuthContext,
}

impl LoginScreen {
    pub fn new(client: &LobbyClient) -> Self {
        Self {
            username: String::new(),
            message: None,
            login: client.login(),
            auth: client.auth().clone(),
        }
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_loading(&self) -> bool {
        self.login.is_loading()
    }

    pub fn can_submit(&self) -> bool {
        !self.username.is_empty() && !self.is_loading()
    }

    /// Error text shown under the username field.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Logs in as the typed username. On success the session token goes
    /// into the shared auth context and the rooms list opens.
    pub async fn submit(&mut self, rooms: &dyn RoomsNavigation) -> Option<LoginResponse> {
        if self.username.is_empty() {
            return None;
        }
        let request = LoginRequest {
            username: self.username.clone(),
        };
        // a rejected login is shown here, not answered with another redirect
        let call = match Call::new().suppress_redirect().with_json(&request) {
            Ok(call) => call,
            Err(err) => {
                self.message = Some(err.to_string());
                return None;
            }
        };

        match self.login.trigger(call).await {
            Ok(Outcome::Completed(_)) => {
                let session = self.login.data()?;
                self.auth.write(session.token.clone());
                self.message = None;
                info!("🔐 Logged in as {}", session.username);
                rooms.open_rooms();
                Some(session)
            }
            Ok(_) => None,
            Err(err) => {
                warn!("❌ Login failed for {}: {}", self.username, err);
                self.message = Some(err.user_message());
                None
            }
        }
    }
}
