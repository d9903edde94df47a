//! WebSocket upgrade handler: pairs two peers and pipes text frames between them

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::util::rate_limit::PeerRateLimiter;

use super::state::RelayState;

/// Outbound queue depth per peer; overflow is dropped, never awaited
const PEER_QUEUE_CAPACITY: usize = 64;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Room to join; both duelists use the same name
    #[serde(default = "default_room")]
    pub room: String,
}

fn default_room() -> String {
    "default".to_string()
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<RelayState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, query.room, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, room: String, state: RelayState) {
    let peer_id = Uuid::new_v4();
    let (mut ws_sink, ws_stream) = socket.split();
    let (tx, rx) = mpsc::channel::<String>(PEER_QUEUE_CAPACITY);

    let slot = match state.rooms.join(&room, peer_id, tx) {
        Ok(slot) => slot,
        Err(e) => {
            warn!(peer_id = %peer_id, room = %room, error = %e, "Rejecting connection");
            let close = Message::Close(Some(CloseFrame {
                code: close_code::AGAIN,
                reason: "room full".into(),
            }));
            let _ = ws_sink.send(close).await;
            return;
        }
    };

    info!(peer_id = %peer_id, room = %room, slot, "Peer joined room");

    run_session(peer_id, &room, &state, ws_sink, ws_stream, rx).await;

    state.rooms.leave(&room, peer_id);
    info!(peer_id = %peer_id, room = %room, "Peer left room");
}

/// Pump frames in both directions until either side closes
async fn run_session(
    peer_id: Uuid,
    room: &str,
    state: &RelayState,
    mut ws_sink: futures::stream::SplitSink<WebSocket, Message>,
    mut ws_stream: futures::stream::SplitStream<WebSocket>,
    mut rx: mpsc::Receiver<String>,
) {
    let rate_limiter = PeerRateLimiter::new(state.config.max_messages_per_sec);

    // Writer task: messages from the other peer -> this socket
    let writer_handle = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if let Err(e) = ws_sink.send(Message::Text(text)).await {
                debug!(peer_id = %peer_id, error = %e, "WebSocket send failed");
                break;
            }
        }
    });

    // Reader loop: this socket -> the other peer
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check() {
                    warn!(peer_id = %peer_id, "Rate limited peer message");
                    continue;
                }

                // Payload is opaque here; the clients validate it
                if let Err(e) = state.rooms.forward(room, peer_id, text) {
                    debug!(peer_id = %peer_id, error = %e, "No peer to forward to, dropped");
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(peer_id = %peer_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(peer_id = %peer_id, "Peer initiated close");
                break;
            }
            Err(e) => {
                error!(peer_id = %peer_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    writer_handle.abort();
}
