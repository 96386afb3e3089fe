//! Client configuration
//!
//! Where to find the game server and which player slot this client drives.
//! The server address is always supplied externally (CLI), never hardcoded.

use crate::protocol::DEFAULT_PLAYER_ID;

/// Default game server port
pub const DEFAULT_PORT: u16 = 9002;

/// Configuration for the game client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Game server host
    pub host: String,
    /// Game server port
    pub port: u16,
    /// Player slot used in move frames
    pub player_id: u32,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            player_id: DEFAULT_PLAYER_ID,
        }
    }

    /// Set the player slot
    pub fn with_player_id(mut self, player_id: u32) -> Self {
        self.player_id = player_id;
        self
    }

    /// WebSocket URL of the game server
    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("127.0.0.1".to_string(), DEFAULT_PORT)
    }
}
