use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use lobby_client::config::{API_URL_ENV_VAR, DEFAULT_API_URL};
use lobby_client::fetch::{NavigationController, RequestCoordinator};
use lobby_client::screens::{CreateRoomForm, LoginScreen, Notice, Notifier, RoomsNavigation};
use lobby_client::{ApiConfig, LobbyClient};
use serde::de::DeserializeOwned;
use shared::protocol::Room;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lobby", about = "Command line front end for the card game lobby")]
struct Cli {
    /// Base URL of the lobby API (e.g. http://localhost:3001)
    #[arg(long, env = API_URL_ENV_VAR, default_value = DEFAULT_API_URL)]
    base_url: String,

    /// Session token (sent as Authorization: Bearer <token>)
    #[arg(long, env = "LOBBY_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and print the session token
    Login { username: String },
    /// List open rooms
    Rooms {
        /// Keep polling every N seconds until interrupted
        #[arg(long)]
        watch: Option<u64>,
    },
    /// List the available decks
    Decks,
    /// Create a room
    Create {
        name: String,
        #[arg(long, default_value_t = 10)]
        target: u32,
        #[arg(long, default_value_t = 10)]
        max_players: u32,
        #[arg(long, default_value_t = 10)]
        max_spectators: u32,
        /// Deck ids to play with; defaults to the base decks
        #[arg(long = "deck")]
        decks: Vec<String>,
        /// Protect the room with a passcode
        #[arg(long)]
        passcode: Option<String>,
    },
}

// Session rejections end up here instead of a login page
#[derive(Default)]
struct Terminal {
    redirected: AtomicBool,
}

impl Terminal {
    fn redirected(&self) -> bool {
        self.redirected.load(Ordering::SeqCst)
    }
}

impl NavigationController for Terminal {
    fn redirect_to_login(&self) {
        self.redirected.store(true, Ordering::SeqCst);
        warn!("🔐 Session rejected, run `lobby login <username>` first");
    }
}

impl RoomsNavigation for Terminal {
    fn open_rooms(&self) {
        info!("📋 Logged in, `lobby rooms` lists the open rooms");
    }
}

impl Notifier for Terminal {
    fn notify(&self, notice: Notice) {
        eprintln!("{:?}: {}", notice.severity, notice.text);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let terminal = Arc::new(Terminal::default());
    let client = LobbyClient::new(ApiConfig::new(cli.base_url), terminal.clone())?;
    if let Some(token) = cli.token {
        client.auth().write(token);
    }

    match cli.command {
        Commands::Login { username } => {
            let mut screen = LoginScreen::new(&client);
            screen.set_username(username);
            match screen.submit(terminal.as_ref()).await {
                Some(session) => println!("{}", session.token),
                None => bail!(screen.message().unwrap_or("login failed").to_string()),
            }
        }
        Commands::Rooms { watch } => {
            let rooms = client.rooms(watch.map(Duration::from_secs));
            rooms.wait_idle().await;
            print_rooms(&rooms, &terminal)?;
            if watch.is_some() {
                watch_rooms(&rooms, &terminal).await?;
            }
        }
        Commands::Decks => {
            let decks = client.decks();
            decks.wait_idle().await;
            check(&decks, &terminal)?;
            for deck in decks.data().unwrap_or_default() {
                println!("{}\t{}", deck.id, deck.name);
            }
        }
        Commands::Create {
            name,
            target,
            max_players,
            max_spectators,
            decks,
            passcode,
        } => {
            let listing = client.decks();
            listing.wait_idle().await;
            check(&listing, &terminal)?;

            let mut form = CreateRoomForm::new();
            form.name = name;
            form.target = target;
            form.max_players = max_players;
            form.max_spectators = max_spectators;
            form.set_decks(&listing.data().unwrap_or_default());
            if !decks.is_empty() {
                for option in form.decks.options().to_vec() {
                    form.decks.toggle(&option.deck.id, decks.contains(&option.deck.id));
                }
            }
            if let Some(passcode) = passcode {
                form.is_protected = true;
                form.passcode = passcode;
            }
            if form.decks_error() {
                bail!("select at least one deck");
            }

            let create = client.create_room();
            match form.submit(&create, terminal.as_ref()).await {
                Some(join) => println!("{}", join.room_id),
                None if terminal.redirected() => bail!("not logged in"),
                None => {
                    match form.error_field() {
                        Some("name") => eprintln!("{}", form.name_helper().unwrap_or_default()),
                        Some("passcode") => {
                            eprintln!("{}", form.passcode_helper().unwrap_or_default())
                        }
                        _ => {}
                    }
                    bail!(create.error_message().unwrap_or_default());
                }
            }
        }
    }

    Ok(())
}

fn check<T>(coordinator: &RequestCoordinator<T>, terminal: &Terminal) -> Result<()>
where
    T: DeserializeOwned + Clone + Send + 'static,
{
    if terminal.redirected() {
        bail!("not logged in");
    }
    if let Some(message) = coordinator.error_message() {
        bail!(message);
    }
    Ok(())
}

fn print_rooms(rooms: &RequestCoordinator<Vec<Room>>, terminal: &Terminal) -> Result<()> {
    check(rooms, terminal)?;
    let rows = rooms.data().unwrap_or_default();
    if rows.is_empty() {
        println!("no open rooms");
    }
    for room in rows {
        let lock = if room.is_protected { "🔒" } else { "" };
        println!(
            "{}\t{}{}\t{}/{} players",
            room.id,
            room.name,
            lock,
            room.players.len(),
            room.options.max_players
        );
    }
    Ok(())
}

async fn watch_rooms(rooms: &RequestCoordinator<Vec<Room>>, terminal: &Terminal) -> Result<()> {
    let mut changes = rooms.subscribe();
    let mut last = rooms.data();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("👋 Stopped watching");
                return Ok(());
            }
            changed = changes.changed() => {
                changed?;
                if terminal.redirected() {
                    bail!("not logged in");
                }
                if rooms.is_loading() {
                    continue;
                }
                if let Some(message) = rooms.error_message() {
                    warn!("❌ Refresh failed: {}", message);
                    continue;
                }
                let current = rooms.data();
                if current != last {
                    println!("---");
                    print_rooms(rooms, terminal)?;
                    last = current;
                }
            }
        }
    }
}
