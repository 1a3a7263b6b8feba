//! WebSocket handler
//!
//! Drives one socket: Hello, then a receive loop, a send loop and a
//! heartbeat watchdog. Whichever ends first tears the connection down.

use crate::connection::Connection;
use crate::handlers::{MessageDispatcher, RegistryHandler};
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::interval;

/// Default heartbeat interval in milliseconds
const HEARTBEAT_INTERVAL_MS: u64 = HelloPayload::DEFAULT_HEARTBEAT_INTERVAL;

/// Timeout for no heartbeat before considering connection dead
const HEARTBEAT_TIMEOUT_MS: u64 = 90_000;

/// Channel buffer size for outgoing messages
const MESSAGE_BUFFER_SIZE: usize = 100;

type WsSink = Arc<Mutex<SplitSink<WebSocket, Message>>>;

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let connection_id = Connection::generate_id();

    let (tx, mut rx) = mpsc::channel::<GatewayMessage>(MESSAGE_BUFFER_SIZE);
    let connection = state
        .connection_manager()
        .add_connection(connection_id.clone(), tx);

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    let (ws_sink, mut ws_stream) = socket.split();
    let ws_sink: WsSink = Arc::new(Mutex::new(ws_sink));

    let hello = GatewayMessage::hello(HelloPayload::with_interval(HEARTBEAT_INTERVAL_MS));
    if let Ok(json) = hello.to_json() {
        if ws_sink
            .lock()
            .await
            .send(Message::Text(json))
            .await
            .is_err()
        {
            tracing::warn!(connection_id = %connection_id, "Failed to send Hello message");
            RegistryHandler::disconnect(&state, &connection).await;
            return;
        }
    }

    let state_recv = state.clone();
    let connection_recv = connection.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(close_code) =
                        handle_text_message(&state_recv, &connection_recv, &text).await
                    {
                        return Some(close_code);
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        connection_id = %connection_recv.id(),
                        "Binary messages not supported"
                    );
                    return Some(CloseCode::DecodeError);
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %connection_recv.id(), "Client closed connection");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_recv.id(),
                        error = %e,
                        "WebSocket error"
                    );
                    return None;
                }
            }
        }
        None
    });

    let sink_send = ws_sink.clone();
    let connection_id_send = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let Ok(json) = msg.to_json() else { continue };
            if sink_send.lock().await.send(Message::Text(json)).await.is_err() {
                tracing::warn!(
                    connection_id = %connection_id_send,
                    "Failed to send message to WebSocket"
                );
                break;
            }
        }
    });

    let connection_hb = connection.clone();
    let mut heartbeat_task = tokio::spawn(async move {
        let mut check_interval = interval(Duration::from_millis(HEARTBEAT_INTERVAL_MS / 2));
        loop {
            check_interval.tick().await;
            let time_since = connection_hb.time_since_heartbeat().await;
            if time_since > Duration::from_millis(HEARTBEAT_TIMEOUT_MS) {
                tracing::warn!(
                    connection_id = %connection_hb.id(),
                    time_since_ms = time_since.as_millis(),
                    "Connection timed out (no heartbeat)"
                );
                return CloseCode::SessionTimeout;
            }
        }
    });

    let close_code = tokio::select! {
        result = &mut recv_task => result.ok().flatten(),
        _ = &mut send_task => None,
        result = &mut heartbeat_task => result.ok(),
    };

    recv_task.abort();
    send_task.abort();
    heartbeat_task.abort();

    let mut sink = ws_sink.lock().await;
    if let Some(code) = close_code {
        tracing::debug!(connection_id = %connection_id, close_code = %code, "Closing connection");
        let (code, reason) = GatewayMessage::close_frame(code);
        let frame = CloseFrame {
            code,
            reason: reason.into(),
        };
        let _ = sink.send(Message::Close(Some(frame))).await;
    }
    let _ = sink.close().await;
    drop(sink);

    RegistryHandler::disconnect(&state, &connection).await;
}

/// Handle a text frame from the client
async fn handle_text_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), CloseCode> {
    let message = match GatewayMessage::from_json(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(
                connection_id = %connection.id(),
                error = %e,
                "Failed to parse message"
            );
            return Err(CloseCode::DecodeError);
        }
    };

    tracing::trace!(
        connection_id = %connection.id(),
        op = %message.op,
        "Received message"
    );

    match MessageDispatcher::dispatch(state, connection, message).await {
        Ok(Some(close_code)) => Err(close_code),
        Ok(None) => Ok(()),
        Err(e) => {
            tracing::warn!(
                connection_id = %connection.id(),
                error = %e,
                "Handler error"
            );
            Err(e.to_close_code().unwrap_or(CloseCode::UnknownError))
        }
    }
}
