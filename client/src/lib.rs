pub mod config;
pub mod fetch;
pub mod lobby_client;
pub mod screens;

pub use config::ApiConfig;
pub use lobby_client::LobbyClient;
