//! Session management module
//!
//! One `Session` is one logical play-through: config selection, moves,
//! game over and optional replay, bound to exactly one connection. The
//! session owns the connection manager, the message router and the state
//! store, and drives the logical state machine across them.

mod connection;
mod router;
mod state;

pub use connection::*;
pub use router::*;
pub use state::*;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::protocol::{Direction, OutboundCommand, ProtocolError, SessionConfig};

/// Errors that can occur during session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("No stored config to replay")]
    NoStoredConfig,
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// One logical play-through bound to a single connection
pub struct Session {
    connection: Connection,
    router: MessageRouter,
    state: SessionState,
    url: String,
    player_id: u32,
}

impl Session {
    /// Create a session for the given client configuration
    ///
    /// Returns the session plus the receiver for connection events; the
    /// caller feeds those back through [`Session::handle_event`].
    pub fn new(config: &ClientConfig) -> (Self, mpsc::UnboundedReceiver<ConnectionEvent>) {
        let (connection, event_rx) = Connection::new();
        let session = Self {
            connection,
            router: MessageRouter::new(),
            state: SessionState::new(),
            url: config.url(),
            player_id: config.player_id,
        };
        (session, event_rx)
    }

    /// The state store, for rendering
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Lifecycle state of the underlying connection
    pub async fn connection_state(&self) -> ConnectionState {
        self.connection.state().await
    }

    /// Open the connection to the game server
    pub async fn connect(&mut self) -> SessionResult<()> {
        self.connection.open(&self.url).await?;
        Ok(())
    }

    /// Send a session config
    ///
    /// Returns whether the frame actually went out. The config is recorded
    /// as `last_config` (and the logical session restarted) only on a
    /// successful send.
    pub async fn send_config(&mut self, config: SessionConfig) -> SessionResult<bool> {
        let frame = OutboundCommand::config(&config).to_json()?;
        let sent = self.connection.send(&frame).await;
        if sent {
            self.state.apply_config(config);
        }
        Ok(sent)
    }

    /// Send a move for the configured player slot
    ///
    /// Rejected client-side with zero frames sent once the game is over;
    /// replay or a new config re-enables moves.
    pub async fn send_move(&mut self, direction: Direction) -> SessionResult<bool> {
        if self.state.game_over() {
            debug!(%direction, "move rejected: game is over");
            return Ok(false);
        }
        let frame = OutboundCommand::player_move(direction, self.player_id).to_json()?;
        Ok(self.connection.send(&frame).await)
    }

    /// Replay with the same settings
    ///
    /// Clears the snapshot and game-over flag, then re-sends a config frame
    /// identical to the last one sent. The connection stays open.
    pub async fn replay(&mut self) -> SessionResult<bool> {
        let config = self
            .state
            .last_config()
            .cloned()
            .ok_or(SessionError::NoStoredConfig)?;
        info!("replaying with last config");
        self.state.reset();
        self.send_config(config).await
    }

    /// Apply one connection event
    ///
    /// Inbound frames go through the router into the state store; lifecycle
    /// events are logged (the connection handle carries the actual state).
    pub fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Frame(text) => self.router.route(&text, &mut self.state),
            ConnectionEvent::Opened => debug!("session connection opened"),
            ConnectionEvent::Closed => info!("session connection closed"),
            ConnectionEvent::Errored(e) => warn!("session connection error: {}", e),
        }
    }

    /// Tear the session down
    ///
    /// Reachable from any state: closes the connection (idempotently) and
    /// resets the state store. Called on every exit path.
    pub async fn teardown(&mut self) {
        self.connection.close().await;
        self.state.reset();
        info!(
            routed = self.router.routed(),
            dropped = self.router.dropped(),
            "session torn down"
        );
    }
}
