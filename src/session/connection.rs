//! Connection manager
//!
//! Owns the single WebSocket connection to the game server. Exposes
//! open/close and raw send, and reports lifecycle transitions and inbound
//! frames as events on an unbounded channel, in strict receipt order.
//!
//! There is no automatic reconnection and no retry policy here; recovery is
//! a decision for the layer above.

use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Errors that can occur while managing the connection
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Connection already opened (state: {0:?})")]
    AlreadyConnected(ConnectionState),

    #[error("WebSocket error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Result type for connection operations
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Lifecycle states of the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Created, never opened
    Idle,
    /// Connect in progress
    Connecting,
    /// Connected; frames may be sent
    Open,
    /// Local close in progress
    Closing,
    /// Closed, locally or by the remote
    Closed,
    /// Transport failure; the connection is unusable
    Errored,
}

/// Events reported by the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The connection was established
    Opened,
    /// One inbound text frame, in receipt order
    Frame(String),
    /// The connection closed (remote close or end of stream)
    Closed,
    /// A transport error occurred
    Errored(String),
}

/// The single duplex connection to the game server
///
/// Exactly one instance exists per session. The reader half runs as a
/// background task that forwards frames and lifecycle events; the state is
/// shared with it behind an `RwLock`.
pub struct Connection {
    state: Arc<RwLock<ConnectionState>>,
    sink: Option<WsSink>,
    event_tx: mpsc::UnboundedSender<ConnectionEvent>,
    reader: Option<JoinHandle<()>>,
}

impl Connection {
    /// Create a connection in the Idle state plus its event receiver
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ConnectionEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let connection = Self {
            state: Arc::new(RwLock::new(ConnectionState::Idle)),
            sink: None,
            event_tx,
            reader: None,
        };
        (connection, event_rx)
    }

    /// Current lifecycle state
    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Open the connection
    ///
    /// Legal exactly once per session, from Idle. On success the state is
    /// Open, an `Opened` event is emitted and the reader task starts. On
    /// failure the state is Errored; no retry is attempted.
    pub async fn open(&mut self, url: &str) -> ConnectionResult<()> {
        {
            let state = self.state.read().await;
            if *state != ConnectionState::Idle {
                return Err(ConnectionError::AlreadyConnected(*state));
            }
        }

        *self.state.write().await = ConnectionState::Connecting;
        info!(url, "connecting to game server");

        match connect_async(url).await {
            Ok((ws_stream, _response)) => {
                let (sink, source) = ws_stream.split();
                self.sink = Some(sink);
                *self.state.write().await = ConnectionState::Open;
                let _ = self.event_tx.send(ConnectionEvent::Opened);
                self.reader = Some(self.spawn_reader(source));
                info!("connection open");
                Ok(())
            }
            Err(e) => {
                error!("connect failed: {}", e);
                *self.state.write().await = ConnectionState::Errored;
                let _ = self
                    .event_tx
                    .send(ConnectionEvent::Errored(e.to_string()));
                Err(ConnectionError::Transport(e))
            }
        }
    }

    /// Send one text frame
    ///
    /// Transmits only when the state is Open. In any other state the frame
    /// is dropped with a warning and `false` is returned; nothing is queued
    /// and nothing is raised. A transport failure during the send moves the
    /// connection to Errored and also returns `false`.
    pub async fn send(&mut self, frame: &str) -> bool {
        let state = *self.state.read().await;
        if state != ConnectionState::Open {
            warn!(?state, "dropping outbound frame: connection not open");
            return false;
        }

        let Some(sink) = self.sink.as_mut() else {
            warn!("dropping outbound frame: no transport");
            return false;
        };

        match sink.send(Message::Text(frame.to_string())).await {
            Ok(()) => {
                debug!(frame, "frame sent");
                true
            }
            Err(e) => {
                error!("send failed: {}", e);
                *self.state.write().await = ConnectionState::Errored;
                let _ = self
                    .event_tx
                    .send(ConnectionEvent::Errored(e.to_string()));
                false
            }
        }
    }

    /// Close the connection
    ///
    /// Idempotent: safe to call from any state, including when already
    /// closed. The underlying transport is released exactly once.
    pub async fn close(&mut self) {
        {
            let state = self.state.read().await;
            if matches!(*state, ConnectionState::Closing | ConnectionState::Closed) {
                debug!("close: already closed");
                return;
            }
        }

        *self.state.write().await = ConnectionState::Closing;

        // take() guarantees the transport is released only once
        if let Some(mut sink) = self.sink.take() {
            let _ = sink.send(Message::Close(None)).await;
            let _ = sink.close().await;
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }

        *self.state.write().await = ConnectionState::Closed;
        info!("connection closed");
    }

    /// Start the background task that forwards inbound frames and lifecycle
    /// events in receipt order
    fn spawn_reader(&self, mut source: WsSource) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            loop {
                match source.next().await {
                    Some(Ok(Message::Text(text))) => {
                        let _ = event_tx.send(ConnectionEvent::Frame(text));
                    }
                    Some(Ok(Message::Binary(data))) => {
                        warn!("ignoring binary frame ({} bytes)", data.len());
                    }
                    Some(Ok(Message::Ping(_)) | Ok(Message::Pong(_))) => {
                        // Pongs are handled by the transport
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("server closed the connection");
                        *state.write().await = ConnectionState::Closed;
                        let _ = event_tx.send(ConnectionEvent::Closed);
                        break;
                    }
                    Some(Ok(Message::Frame(_))) => {
                        // Raw frame, ignore
                    }
                    Some(Err(e)) => {
                        error!("transport error: {}", e);
                        *state.write().await = ConnectionState::Errored;
                        let _ = event_tx.send(ConnectionEvent::Errored(e.to_string()));
                        break;
                    }
                    None => {
                        let mut state = state.write().await;
                        if *state == ConnectionState::Open {
                            info!("connection stream ended");
                            *state = ConnectionState::Closed;
                            let _ = event_tx.send(ConnectionEvent::Closed);
                        }
                        break;
                    }
                }
            }
        })
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}
