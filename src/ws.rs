use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use log::warn;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::events::Envelope;
use crate::matchmaking::Matchmaker;

#[debug_handler(state = crate::AppState)]
pub async fn chat_ws(
    State(matchmaker): State<Arc<Matchmaker>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(async move |stream| handle_socket(matchmaker, stream).await)
}

async fn handle_socket(matchmaker: Arc<Matchmaker>, stream: WebSocket) {
    let connection_id = Uuid::now_v7();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    if let Err(e) = matchmaker.connect(connection_id, tx).await {
        warn!("connect failed for {connection_id}: {e:#}");
        return;
    }

    let (mut sender, mut receiver) = stream.split();

    let forward_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(text) => {
                let Ok(envelope) = serde_json::from_str::<Envelope>(text.as_str()) else {
                    warn!("unparseable frame from {connection_id}");
                    continue;
                };
                if let Err(e) = matchmaker.dispatch(connection_id, envelope).await {
                    warn!("event from {connection_id} failed: {e:#}");
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    if let Err(e) = matchmaker.disconnect(connection_id).await {
        warn!("disconnect cleanup failed for {connection_id}: {e:#}");
    }
    forward_task.abort();
}
