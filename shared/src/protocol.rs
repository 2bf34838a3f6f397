use serde::{Deserialize, Serialize};

// Lobby API routes (relative to the configured base url)
pub const LOGIN_PATH: &str = "/api/login";
pub const ROOMS_PATH: &str = "/api/rooms";
pub const DECKS_PATH: &str = "/api/decks";

// Listing endpoints wrap their items in a `rows` envelope
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Rows<T> {
    pub rows: Vec<T>,
}

// Card deck offered by the server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

// Game options chosen when a room is created
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomOptions {
    pub target: u32,
    pub max_players: u32,
    pub max_spectators: u32,
    pub decks: Vec<String>,
}

impl Default for RoomOptions {
    fn default() -> Self {
        Self {
            target: 10,
            max_players: 10,
            max_spectators: 10,
            decks: Vec::new(),
        }
    }
}

// Body of POST /api/rooms
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateRoomRequest {
    pub name: String,
    pub options: RoomOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passcode: Option<String>,
}

// Room as listed / returned by the server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub options: RoomOptions,
    #[serde(default)]
    pub is_protected: bool,
    #[serde(default)]
    pub players: Vec<String>,
}

// Body of POST /api/login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
}
