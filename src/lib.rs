//! Labyrinth Sprint client library
//!
//! Session connection and state synchronization for the labyrinth game
//! server. The server owns the maze, the AI and all game rules; this crate
//! owns the connection lifecycle, classifies inbound frames into a local
//! session snapshot, and encodes outbound player/config commands.

pub mod config;
pub mod protocol;
pub mod session;
