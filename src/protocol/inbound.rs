//! Inbound frame classification
//!
//! The server streams arbitrary JSON objects. Two kinds are recognized:
//! an explicit game-over signal (`{"type":"gameOver"}`) and snapshot
//! fragments carrying any subset of `labyrinth`, `player` and `ai`.
//! Fragments are sparse: a fragment that only moves the player does not
//! re-send the maze.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProtocolResult;

/// Grid coordinates of an actor in the maze
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A sparse snapshot fragment
///
/// Every field is optional; absent fields mean "unchanged", not "cleared".
/// Unknown fields in the frame are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SnapshotUpdate {
    /// Maze layout, one string per row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labyrinth: Option<Vec<String>>,
    /// Player position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<Position>,
    /// AI position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai: Option<Position>,
}

impl SnapshotUpdate {
    /// True when the fragment carries no recognized field
    pub fn is_empty(&self) -> bool {
        self.labyrinth.is_none() && self.player.is_none() && self.ai.is_none()
    }
}

/// A classified inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    /// Explicit end-of-game signal; carries no state
    GameOver,
    /// Snapshot fragment to merge into the local state
    Snapshot(SnapshotUpdate),
}

impl ServerFrame {
    /// Parse and classify one raw text frame
    ///
    /// A frame whose `type` field equals `"gameOver"` is the end signal
    /// regardless of any other content. Everything else that parses as an
    /// object is treated as a snapshot fragment. Malformed JSON or mistyped
    /// fields are errors; the caller drops the frame and continues.
    pub fn from_json(text: &str) -> ProtocolResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        if value.get("type").and_then(Value::as_str) == Some("gameOver") {
            return Ok(ServerFrame::GameOver);
        }
        let update: SnapshotUpdate = serde_json::from_value(value)?;
        Ok(ServerFrame::Snapshot(update))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_game_over() {
        let frame = ServerFrame::from_json(r#"{"type":"gameOver"}"#).unwrap();
        assert_eq!(frame, ServerFrame::GameOver);
    }

    #[test]
    fn test_game_over_ignores_extra_fields() {
        let frame = ServerFrame::from_json(r#"{"type":"gameOver","winner":1}"#).unwrap();
        assert_eq!(frame, ServerFrame::GameOver);
    }

    #[test]
    fn test_classify_full_snapshot() {
        let text = r#####"{"labyrinth":["####","#..#","####"],"player":{"x":1,"y":1}}"#####;
        let frame = ServerFrame::from_json(text).unwrap();
        match frame {
            ServerFrame::Snapshot(update) => {
                assert_eq!(
                    update.labyrinth,
                    Some(vec!["####".into(), "#..#".into(), "####".into()])
                );
                assert_eq!(update.player, Some(Position::new(1, 1)));
                assert!(update.ai.is_none());
            }
            _ => panic!("Expected Snapshot frame"),
        }
    }

    #[test]
    fn test_classify_position_only_fragment() {
        let frame = ServerFrame::from_json(r#"{"player":{"x":3,"y":2}}"#).unwrap();
        match frame {
            ServerFrame::Snapshot(update) => {
                assert!(update.labyrinth.is_none());
                assert_eq!(update.player, Some(Position::new(3, 2)));
            }
            _ => panic!("Expected Snapshot frame"),
        }
    }

    #[test]
    fn test_unknown_type_treated_as_snapshot() {
        // Anything that is not the game-over signal is a state update,
        // matching the server's framing.
        let frame = ServerFrame::from_json(r#"{"type":"welcome"}"#).unwrap();
        match frame {
            ServerFrame::Snapshot(update) => assert!(update.is_empty()),
            _ => panic!("Expected Snapshot frame"),
        }
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(ServerFrame::from_json("not json {{{").is_err());
    }

    #[test]
    fn test_mistyped_field_is_error() {
        assert!(ServerFrame::from_json(r#"{"labyrinth":5}"#).is_err());
        assert!(ServerFrame::from_json(r#"{"player":{"x":"left","y":1}}"#).is_err());
    }

    #[test]
    fn test_ai_fragment() {
        let frame = ServerFrame::from_json(r#"{"ai":{"x":0,"y":4}}"#).unwrap();
        match frame {
            ServerFrame::Snapshot(update) => {
                assert_eq!(update.ai, Some(Position::new(0, 4)));
                assert!(update.player.is_none());
            }
            _ => panic!("Expected Snapshot frame"),
        }
    }
}
