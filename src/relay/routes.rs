//! HTTP route definitions

use axum::{
    extract::State,
    http::{header, Method},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::util::time::uptime_secs;

use super::handler::ws_handler;
use super::state::RelayState;

/// Build the relay router
pub fn build_router(state: RelayState) -> Router {
    // CORS configuration - `*` or a comma-separated origin list
    let origin = if state.config.client_origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        let allowed_origins: Vec<header::HeaderValue> = state
            .config
            .client_origin
            .split(',')
            .filter_map(|s| s.trim().parse::<header::HeaderValue>().ok())
            .collect();
        AllowOrigin::list(allowed_origins)
    };

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    rooms: usize,
    peers: usize,
}

async fn health_handler(State(state): State<RelayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        rooms: state.rooms.active_rooms(),
        peers: state.rooms.total_peers(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelayConfig;
    use axum::{body::Body, http::Request, http::StatusCode};
    use futures::{SinkExt, StreamExt};
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
    use tokio_tungstenite::tungstenite::Message as WsMessage;
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
    use tower::ServiceExt;
    use uuid::Uuid;

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    fn test_config() -> RelayConfig {
        RelayConfig {
            relay_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "debug".to_string(),
            log_json: false,
            client_origin: "http://localhost:3000,http://127.0.0.1:3000".to_string(),
            max_messages_per_sec: 120,
        }
    }

    #[tokio::test]
    async fn health_reports_rooms_and_peers() {
        let state = RelayState::new(test_config());
        let (tx, _rx) = mpsc::channel(1);
        state.rooms.join("duel", Uuid::new_v4(), tx).unwrap();

        let response = build_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["rooms"], 1);
        assert_eq!(json["peers"], 1);
    }

    #[tokio::test]
    async fn plain_get_on_ws_is_not_an_upgrade() {
        let state = RelayState::new(test_config());
        let response = build_router(state)
            .oneshot(Request::builder().uri("/ws?room=duel").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    async fn serve(config: RelayConfig) -> (SocketAddr, RelayState) {
        let state = RelayState::new(config);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = build_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (addr, state)
    }

    async fn connect(addr: SocketAddr, room: &str) -> Client {
        let (client, _) = connect_async(format!("ws://{}/ws?room={}", addr, room))
            .await
            .unwrap();
        client
    }

    /// Joins happen after the upgrade response, so wait for the registry
    async fn wait_for_peers(state: &RelayState, peers: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while state.rooms.total_peers() < peers {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    async fn next_message(client: &mut Client) -> WsMessage {
        tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn forwards_text_and_rejects_a_third_peer() {
        let (addr, state) = serve(test_config()).await;
        let mut a = connect(addr, "duel").await;
        let mut b = connect(addr, "duel").await;
        wait_for_peers(&state, 2).await;

        let payload = r#"{"pos":[200,300],"angle":0,"health":3,"color":"red","cooldown":0,"hitTimer":0}"#;
        a.send(WsMessage::Text(payload.to_string())).await.unwrap();
        assert_eq!(next_message(&mut b).await, WsMessage::Text(payload.to_string()));

        let mut c = connect(addr, "duel").await;
        match next_message(&mut c).await {
            WsMessage::Close(Some(frame)) => {
                assert_eq!(frame.code, CloseCode::Again);
                assert_eq!(frame.reason, "room full");
            }
            other => panic!("expected a close frame, got {other:?}"),
        }
        assert_eq!(state.rooms.total_peers(), 2);
    }

    #[tokio::test]
    async fn binary_frames_are_not_forwarded() {
        let (addr, state) = serve(test_config()).await;
        let mut a = connect(addr, "duel").await;
        let mut b = connect(addr, "duel").await;
        wait_for_peers(&state, 2).await;

        a.send(WsMessage::Binary(vec![1, 2, 3])).await.unwrap();
        a.send(WsMessage::Text("after".to_string())).await.unwrap();

        assert_eq!(next_message(&mut b).await, WsMessage::Text("after".to_string()));
    }

    #[tokio::test]
    async fn frames_over_the_rate_limit_are_dropped() {
        let config = RelayConfig {
            max_messages_per_sec: 1,
            ..test_config()
        };
        let (addr, state) = serve(config).await;
        let mut a = connect(addr, "duel").await;
        let mut b = connect(addr, "duel").await;
        wait_for_peers(&state, 2).await;

        a.send(WsMessage::Text("one".to_string())).await.unwrap();
        a.send(WsMessage::Text("two".to_string())).await.unwrap();

        assert_eq!(next_message(&mut b).await, WsMessage::Text("one".to_string()));
        let second = tokio::time::timeout(Duration::from_millis(300), b.next()).await;
        assert!(second.is_err(), "second frame should be dropped, got {second:?}");
    }

    #[tokio::test]
    async fn leaving_frees_the_room() {
        let (addr, state) = serve(test_config()).await;
        let mut a = connect(addr, "duel").await;
        wait_for_peers(&state, 1).await;

        a.close(None).await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), async {
            while state.rooms.active_rooms() > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }
}
