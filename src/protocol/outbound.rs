//! Outbound command encoding
//!
//! Builds the JSON frames the client sends to the game server. Config frames
//! carry a `type` tag; move frames do not — the server routes them by shape.
//! That asymmetry is part of the established wire format and is preserved
//! exactly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default player slot used by a single client instance
pub const DEFAULT_PLAYER_ID: u32 = 1;

// ============================================================================
// Error Types
// ============================================================================

/// Protocol-related errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// Result type for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;

// ============================================================================
// Config Vocabulary
// ============================================================================

/// Game mode selected at session start
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Local game against the server-side AI
    Single,
    /// Multiplayer match arbitrated by the server
    Multiplayer,
}

/// Maze difficulty, interpreted server-side
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Session configuration chosen by the player
///
/// Immutable once sent; the state store retains the most recently sent
/// config so a finished game can be replayed with identical settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Game mode
    pub mode: GameMode,
    /// Optional difficulty (the server picks a default when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl SessionConfig {
    /// Create a config with no difficulty set
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            difficulty: None,
        }
    }

    /// Set the difficulty
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }
}

// ============================================================================
// Move Vocabulary
// ============================================================================

/// Move directions accepted by the server
///
/// The serialized names are the exact wire strings (`"MoveUp"` etc.).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

impl Direction {
    /// Validate an arbitrary string against the fixed direction set
    ///
    /// Anything outside the four known directions fails here, before any
    /// frame is built or transmitted.
    pub fn parse(input: &str) -> ProtocolResult<Self> {
        match input {
            "MoveUp" => Ok(Direction::MoveUp),
            "MoveDown" => Ok(Direction::MoveDown),
            "MoveLeft" => Ok(Direction::MoveLeft),
            "MoveRight" => Ok(Direction::MoveRight),
            other => Err(ProtocolError::InvalidCommand(format!(
                "unrecognized move direction: {:?}",
                other
            ))),
        }
    }

    /// Wire name of the direction
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::MoveUp => "MoveUp",
            Direction::MoveDown => "MoveDown",
            Direction::MoveLeft => "MoveLeft",
            Direction::MoveRight => "MoveRight",
        }
    }
}

impl FromStr for Direction {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::parse(s)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Outbound Frames
// ============================================================================

/// Config frame: `{"type":"config","mode":...,"difficulty"?:...}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConfigCommand {
    Config {
        mode: GameMode,
        #[serde(skip_serializing_if = "Option::is_none")]
        difficulty: Option<Difficulty>,
    },
}

impl ConfigCommand {
    /// Build a config frame from a session config
    pub fn from_config(config: &SessionConfig) -> Self {
        ConfigCommand::Config {
            mode: config.mode,
            difficulty: config.difficulty,
        }
    }
}

/// Move frame: `{"playerId":1,"action":"MoveLeft"}`
///
/// Deliberately untagged — the server expects no `type` field on moves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveCommand {
    /// Player slot making the move
    #[serde(rename = "playerId")]
    pub player_id: u32,
    /// Direction of the move
    pub action: Direction,
}

/// Tagged union of everything the client can send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundCommand {
    Config(ConfigCommand),
    Move(MoveCommand),
}

impl OutboundCommand {
    /// Build a config command
    pub fn config(config: &SessionConfig) -> Self {
        OutboundCommand::Config(ConfigCommand::from_config(config))
    }

    /// Build a move command
    pub fn player_move(direction: Direction, player_id: u32) -> Self {
        OutboundCommand::Move(MoveCommand {
            player_id,
            action: direction,
        })
    }

    /// Encode the command as a JSON text frame
    pub fn to_json(&self) -> ProtocolResult<String> {
        let json = match self {
            OutboundCommand::Config(cmd) => serde_json::to_string(cmd)?,
            OutboundCommand::Move(cmd) => serde_json::to_string(cmd)?,
        };
        Ok(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_frame_shape() {
        let config = SessionConfig::new(GameMode::Single).with_difficulty(Difficulty::Easy);
        let json = OutboundCommand::config(&config).to_json().unwrap();
        assert_eq!(json, r#"{"type":"config","mode":"single","difficulty":"easy"}"#);
    }

    #[test]
    fn test_config_frame_omits_missing_difficulty() {
        let config = SessionConfig::new(GameMode::Multiplayer);
        let json = OutboundCommand::config(&config).to_json().unwrap();
        assert_eq!(json, r#"{"type":"config","mode":"multiplayer"}"#);
        assert!(!json.contains("difficulty"));
    }

    #[test]
    fn test_move_frame_shape() {
        let cmd = OutboundCommand::player_move(Direction::MoveLeft, DEFAULT_PLAYER_ID);
        let json = cmd.to_json().unwrap();
        assert_eq!(json, r#"{"playerId":1,"action":"MoveLeft"}"#);
    }

    #[test]
    fn test_move_frame_has_no_type_tag() {
        let cmd = OutboundCommand::player_move(Direction::MoveUp, 2);
        let json = cmd.to_json().unwrap();
        assert!(!json.contains("\"type\""));
        assert!(json.contains("\"playerId\":2"));
    }

    #[test]
    fn test_direction_parse_valid() {
        assert_eq!(Direction::parse("MoveUp").unwrap(), Direction::MoveUp);
        assert_eq!(Direction::parse("MoveDown").unwrap(), Direction::MoveDown);
        assert_eq!(Direction::parse("MoveLeft").unwrap(), Direction::MoveLeft);
        assert_eq!(Direction::parse("MoveRight").unwrap(), Direction::MoveRight);
    }

    #[test]
    fn test_direction_parse_invalid() {
        let result = Direction::parse("MoveDiagonally");
        assert!(result.is_err());
        match result {
            Err(ProtocolError::InvalidCommand(msg)) => {
                assert!(msg.contains("MoveDiagonally"));
            }
            _ => panic!("Expected InvalidCommand error"),
        }
    }

    #[test]
    fn test_direction_parse_rejects_case_mismatch() {
        assert!(Direction::parse("moveup").is_err());
        assert!(Direction::parse("UP").is_err());
        assert!(Direction::parse("").is_err());
    }

    #[test]
    fn test_direction_from_str() {
        let dir: Direction = "MoveRight".parse().unwrap();
        assert_eq!(dir, Direction::MoveRight);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = SessionConfig::new(GameMode::Single).with_difficulty(Difficulty::Hard);
        let frame = ConfigCommand::from_config(&config);
        let json = serde_json::to_string(&frame).unwrap();
        let parsed: ConfigCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_identical_configs_encode_identically() {
        let config = SessionConfig::new(GameMode::Single).with_difficulty(Difficulty::Medium);
        let first = OutboundCommand::config(&config).to_json().unwrap();
        let second = OutboundCommand::config(&config.clone()).to_json().unwrap();
        assert_eq!(first, second);
    }
}
