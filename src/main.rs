//! Labyrinth Sprint terminal client
//!
//! Thin client for the labyrinth game server: relays player intent over a
//! WebSocket connection and renders whatever state the server streams back.
//! The maze, the AI and all game rules live server-side.

use anyhow::bail;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use labyrinth_client::config::{self, ClientConfig};
use labyrinth_client::protocol::{Difficulty, Direction, GameMode, Position, SessionConfig};
use labyrinth_client::session::{ConnectionEvent, GameSnapshot, Session};

/// Labyrinth Sprint terminal client
///
/// Connects to a labyrinth game server and plays from the terminal
#[derive(Parser, Debug)]
#[command(name = "labyrinth-client")]
#[command(version, about, long_about = None)]
struct Args {
    /// Game server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Game server port
    #[arg(short, long, default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Game mode: single or multiplayer
    #[arg(short, long, default_value = "single")]
    mode: String,

    /// Difficulty: easy, medium or hard
    #[arg(short, long)]
    difficulty: Option<String>,

    /// Player slot used in move frames
    #[arg(long, default_value_t = 1)]
    player_id: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn game_config(&self) -> anyhow::Result<SessionConfig> {
        let mode = match self.mode.as_str() {
            "single" => GameMode::Single,
            "multiplayer" => GameMode::Multiplayer,
            other => bail!("unknown mode: {} (expected single or multiplayer)", other),
        };
        let mut config = SessionConfig::new(mode);
        if let Some(level) = &self.difficulty {
            config = config.with_difficulty(match level.as_str() {
                "easy" => Difficulty::Easy,
                "medium" => Difficulty::Medium,
                "hard" => Difficulty::Hard,
                other => bail!(
                    "unknown difficulty: {} (expected easy, medium or hard)",
                    other
                ),
            });
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("Labyrinth Sprint client v{}", env!("CARGO_PKG_VERSION"));

    let game_config = args.game_config()?;
    let client_config = ClientConfig::new(args.host, args.port).with_player_id(args.player_id);

    let (mut session, mut events) = Session::new(&client_config);
    session.connect().await?;

    if !session.send_config(game_config).await? {
        bail!("failed to send game config");
    }

    println!("Commands: up/down/left/right to move, replay, quit");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                let ended = matches!(
                    event,
                    ConnectionEvent::Closed | ConnectionEvent::Errored(_)
                );
                let was_frame = matches!(event, ConnectionEvent::Frame(_));
                session.handle_event(event);
                if was_frame {
                    if let Some(view) = render_snapshot(session.state().snapshot()) {
                        println!("{}", view);
                    }
                    if session.state().game_over() {
                        println!("Game over! Type 'replay' to play again or 'quit' to leave.");
                    }
                }
                if ended {
                    break;
                }
            }
            line = stdin.next_line() => {
                match line {
                    Ok(Some(input)) => {
                        if !handle_command(&mut session, input.trim()).await? {
                            break;
                        }
                    }
                    // stdin closed
                    Ok(None) | Err(_) => break,
                }
            }
            _ = signal::ctrl_c() => {
                info!("Received SIGINT (Ctrl+C)");
                break;
            }
        }
    }

    session.teardown().await;
    info!("Client shutdown complete");
    Ok(())
}

/// Handle one line of player input; returns false when the player quits
async fn handle_command(session: &mut Session, input: &str) -> anyhow::Result<bool> {
    let direction = match input {
        "" => return Ok(true),
        "quit" | "exit" => return Ok(false),
        "replay" => {
            match session.replay().await {
                Ok(true) => {}
                Ok(false) => warn!("replay config was not sent"),
                Err(e) => warn!("{}", e),
            }
            return Ok(true);
        }
        "up" => Ok(Direction::MoveUp),
        "down" => Ok(Direction::MoveDown),
        "left" => Ok(Direction::MoveLeft),
        "right" => Ok(Direction::MoveRight),
        // Also accept the raw wire names; anything else is rejected here
        other => Direction::parse(other),
    };

    match direction {
        Ok(direction) => {
            if !session.send_move(direction).await? {
                warn!("move not sent");
            }
        }
        Err(e) => warn!("{}", e),
    }
    Ok(true)
}

/// Render the snapshot as ASCII rows with the player and AI overlaid
fn render_snapshot(snapshot: &GameSnapshot) -> Option<String> {
    let labyrinth = snapshot.labyrinth.as_ref()?;
    let mut rows: Vec<Vec<char>> = labyrinth.iter().map(|row| row.chars().collect()).collect();

    let mut place = |pos: Option<&Position>, glyph: char| {
        if let Some(pos) = pos {
            if let Some(cell) = rows
                .get_mut(pos.y as usize)
                .and_then(|row| row.get_mut(pos.x as usize))
            {
                *cell = glyph;
            }
        }
    };
    place(snapshot.ai.as_ref(), 'A');
    place(snapshot.player.as_ref(), 'P');

    Some(
        rows.into_iter()
            .map(String::from_iter)
            .collect::<Vec<_>>()
            .join("\n"),
    )
}
