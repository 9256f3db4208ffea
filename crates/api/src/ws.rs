use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::realtime::{Event, EventBus};
use crate::state::AppState;

/// Client frames on the subscription socket. Joining and leaving are
/// idempotent and symmetric.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
enum ClientCommand {
    JoinTournament { tournament_id: Uuid },
    LeaveTournament { tournament_id: Uuid },
}

pub async fn ws_handler(State(state): State<AppState>, upgrade: WebSocketUpgrade) -> Response {
    let bus = state.events.clone();
    upgrade.on_upgrade(move |socket| handle_socket(socket, bus))
}

/// One task per live subscription forwards broadcast events into the
/// session's outbound queue; the session task itself only reads client
/// commands. A disconnected client gets no replay — it re-fetches state.
async fn handle_socket(socket: WebSocket, bus: Arc<EventBus>) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Event>(64);

    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::error!("failed to serialize event: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    let global = spawn_forwarder(bus.subscribe_global(), tx.clone());
    let mut joined: HashMap<Uuid, JoinHandle<()>> = HashMap::new();

    while let Some(Ok(message)) = stream.next().await {
        let Message::Text(text) = message else {
            continue;
        };

        let command = match serde_json::from_str::<ClientCommand>(&text) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!("ignoring malformed client frame: {}", e);
                continue;
            }
        };

        match command {
            ClientCommand::JoinTournament { tournament_id } => {
                joined.entry(tournament_id).or_insert_with(|| {
                    tracing::debug!(%tournament_id, "session joined tournament group");
                    spawn_forwarder(bus.subscribe_tournament(tournament_id), tx.clone())
                });
            }
            ClientCommand::LeaveTournament { tournament_id } => {
                if let Some(handle) = joined.remove(&tournament_id) {
                    tracing::debug!(%tournament_id, "session left tournament group");
                    handle.abort();
                }
            }
        }
    }

    global.abort();
    for handle in joined.into_values() {
        handle.abort();
    }
    writer.abort();
}

fn spawn_forwarder(
    receiver: broadcast::Receiver<Event>,
    tx: mpsc::Sender<Event>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = BroadcastStream::new(receiver);
        while let Some(item) = events.next().await {
            match item {
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                // At-most-once delivery: a lagged session simply misses the
                // dropped events.
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::debug!("session lagged, skipped {} events", skipped);
                }
            }
        }
    })
}
