//! Session state store
//!
//! Holds the current game snapshot, the game-over flag and the last sent
//! config. This is the single source of truth the rendering layer reads
//! from. All mutation is synchronous; the session task is the only owner,
//! so no internal locking is needed.

use tracing::debug;

use crate::protocol::{Position, SessionConfig, SnapshotUpdate};

/// Locally reconciled view of the maze and actor positions
///
/// Fields are set independently by sparse snapshot fragments. A field, once
/// set, is only ever replaced by a fragment that carries it — never cleared
/// because a later fragment omitted it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Maze layout, one string per row
    pub labyrinth: Option<Vec<String>>,
    /// Player position
    pub player: Option<Position>,
    /// AI position (absent in multiplayer or before the AI spawns)
    pub ai: Option<Position>,
}

/// Logical phase of the play-through, layered over the transport lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No config sent yet
    Idle,
    /// Config sent, waiting for the first snapshot fragment
    AwaitingSnapshot,
    /// Snapshot received, game in progress
    Active,
    /// Game over signal received; moves are rejected client-side
    Ended,
}

/// The session state store
#[derive(Debug, Clone)]
pub struct SessionState {
    snapshot: GameSnapshot,
    game_over: bool,
    last_config: Option<SessionConfig>,
    phase: SessionPhase,
}

impl SessionState {
    /// Create an empty store in the Idle phase
    pub fn new() -> Self {
        Self {
            snapshot: GameSnapshot::default(),
            game_over: false,
            last_config: None,
            phase: SessionPhase::Idle,
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    /// Whether the game-over signal has been received
    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// The config most recently sent, if any
    pub fn last_config(&self) -> Option<&SessionConfig> {
        self.last_config.as_ref()
    }

    /// Current logical phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Record a successfully sent config
    ///
    /// Clears the game-over flag (an explicit new config restarts the
    /// logical session) and moves the phase to AwaitingSnapshot. Must only
    /// be called after the config frame actually went out.
    pub fn apply_config(&mut self, config: SessionConfig) {
        debug!(?config, "config recorded");
        self.last_config = Some(config);
        self.game_over = false;
        self.phase = SessionPhase::AwaitingSnapshot;
    }

    /// Merge a sparse snapshot fragment
    ///
    /// Each field present in the fragment overwrites the stored field;
    /// absent fields are left untouched. The first fragment after a config
    /// moves the phase to Active.
    pub fn apply_snapshot_update(&mut self, update: SnapshotUpdate) {
        if let Some(labyrinth) = update.labyrinth {
            self.snapshot.labyrinth = Some(labyrinth);
        }
        if let Some(player) = update.player {
            self.snapshot.player = Some(player);
        }
        if let Some(ai) = update.ai {
            self.snapshot.ai = Some(ai);
        }
        if self.phase == SessionPhase::AwaitingSnapshot {
            debug!("first snapshot fragment received, session active");
            self.phase = SessionPhase::Active;
        }
    }

    /// Set or clear the game-over flag
    ///
    /// Setting it moves the phase to Ended. The snapshot is retained in
    /// either case.
    pub fn set_game_over(&mut self, game_over: bool) {
        self.game_over = game_over;
        if game_over {
            self.phase = SessionPhase::Ended;
        }
    }

    /// Full session restart: clears the snapshot and the game-over flag
    ///
    /// `last_config` survives the reset so a finished game can be replayed
    /// with the same settings.
    pub fn reset(&mut self) {
        debug!("session state reset");
        self.snapshot = GameSnapshot::default();
        self.game_over = false;
        self.phase = SessionPhase::Idle;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
