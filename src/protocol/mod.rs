//! Wire protocol module
//!
//! Defines the JSON text frames exchanged with the labyrinth game server:
//! outbound player/config commands and inbound snapshot/game-over frames.

mod inbound;
mod outbound;

pub use inbound::*;
pub use outbound::*;
