//! Message router
//!
//! Classifies each inbound text frame and applies it to the state store.
//! Malformed frames are non-fatal: they are dropped with one diagnostic and
//! processing continues with the next frame.

use tracing::{debug, warn};

use crate::protocol::ServerFrame;

use super::SessionState;

/// Routes raw inbound frames into state store mutations
#[derive(Debug, Default)]
pub struct MessageRouter {
    routed: u64,
    dropped: u64,
}

impl MessageRouter {
    /// Create a router with zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames successfully classified and applied
    pub fn routed(&self) -> u64 {
        self.routed
    }

    /// Frames dropped because they failed to parse
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Classify one raw frame and mutate the state store accordingly
    ///
    /// A game-over frame sets the flag and touches nothing else; any other
    /// parseable frame is merged as a sparse snapshot fragment.
    pub fn route(&mut self, text: &str, state: &mut SessionState) {
        match ServerFrame::from_json(text) {
            Ok(ServerFrame::GameOver) => {
                debug!("game over signal received");
                state.set_game_over(true);
                self.routed += 1;
            }
            Ok(ServerFrame::Snapshot(update)) => {
                if update.is_empty() {
                    debug!("snapshot fragment carried no recognized fields");
                }
                state.apply_snapshot_update(update);
                self.routed += 1;
            }
            Err(e) => {
                warn!("dropping malformed frame: {}", e);
                self.dropped += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Position;

    #[test]
    fn test_routes_snapshot_fragment() {
        let mut router = MessageRouter::new();
        let mut state = SessionState::new();

        router.route(
            r#####"{"labyrinth":["####","#..#","####"],"player":{"x":1,"y":1}}"#####,
            &mut state,
        );

        assert_eq!(router.routed(), 1);
        assert_eq!(
            state.snapshot().labyrinth,
            Some(vec!["####".into(), "#..#".into(), "####".into()])
        );
        assert_eq!(state.snapshot().player, Some(Position::new(1, 1)));
        assert!(state.snapshot().ai.is_none());
        assert!(!state.game_over());
    }

    #[test]
    fn test_game_over_frame_only_sets_flag() {
        let mut router = MessageRouter::new();
        let mut state = SessionState::new();

        router.route(r#"{"player":{"x":2,"y":3}}"#, &mut state);
        let snapshot_before = state.snapshot().clone();

        router.route(r#"{"type":"gameOver"}"#, &mut state);
        assert!(state.game_over());
        assert_eq!(*state.snapshot(), snapshot_before);
    }

    #[test]
    fn test_malformed_frame_is_dropped_and_counted() {
        let mut router = MessageRouter::new();
        let mut state = SessionState::new();

        router.route(r#"{"player":{"x":1,"y":1}}"#, &mut state);
        router.route("garbage {{{", &mut state);
        router.route(r#"{"labyrinth":42}"#, &mut state);
        router.route(r#"{"ai":{"x":0,"y":0}}"#, &mut state);

        assert_eq!(router.routed(), 2);
        assert_eq!(router.dropped(), 2);
        // The good frames around the bad ones still applied
        assert_eq!(state.snapshot().player, Some(Position::new(1, 1)));
        assert_eq!(state.snapshot().ai, Some(Position::new(0, 0)));
    }

    #[test]
    fn test_sparse_sequence_retains_fields() {
        let mut router = MessageRouter::new();
        let mut state = SessionState::new();

        router.route(r#####"{"labyrinth":["##","##"]}"#####, &mut state);
        router.route(r#"{"player":{"x":0,"y":1}}"#, &mut state);
        router.route(r#"{"player":{"x":1,"y":1}}"#, &mut state);

        assert_eq!(state.snapshot().labyrinth, Some(vec!["##".into(), "##".into()]));
        assert_eq!(state.snapshot().player, Some(Position::new(1, 1)));
    }
}
