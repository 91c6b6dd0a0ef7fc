//! WebSocket bridge for the optical scanner collaborator.
//!
//! Each text frame is one scan. JSON frames use `{"type":"scan","text":…}`;
//! any other frame is taken as the raw decoded payload.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    dto::{
        game::ScanDecision,
        ws::{ScannerInboundMessage, ScannerOutboundMessage},
    },
    services::scan_service,
    state::SharedState,
};

/// Longest scan forwarded to the gateway, in characters as for `ScanRequest`.
const MAX_SCAN_CHARS: usize = 256;

/// Handle the full lifecycle of a scanner WebSocket connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps acks flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    info!("scanner connected");

    while let Some(message) = receiver.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text.to_string(),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(err) => {
                warn!(error = %err, "scanner websocket receive error");
                break;
            }
        };

        let reply = match scan_payload(&text) {
            Ok(Some(payload)) => {
                let report = scan_service::submit_scan(&state, &payload).await;
                ScannerOutboundMessage::Ack {
                    decision: ScanDecision::from(report.outcome),
                    phase: report.snapshot.phase,
                    message: report.snapshot.message,
                    scan_success_count: report.snapshot.scan_success_count,
                }
            }
            Ok(None) => {
                debug!(payload = %text, "ignoring non-scan scanner message");
                continue;
            }
            Err(message) => ScannerOutboundMessage::Error { message },
        };

        if send_message_to_websocket(&outbound_tx, &reply).is_err() {
            break;
        }
    }

    finalize(writer_task, outbound_tx).await;
    info!("scanner disconnected");
}

/// Extract the scan text from a frame; `Ok(None)` for other typed messages.
///
/// A frame that looks like JSON but is not a scanner message is a raw scan.
fn scan_payload(frame: &str) -> Result<Option<String>, String> {
    let text = if frame.trim_start().starts_with('{') {
        match serde_json::from_str::<ScannerInboundMessage>(frame) {
            Ok(ScannerInboundMessage::Scan { text }) => text,
            Ok(ScannerInboundMessage::Unknown) => return Ok(None),
            Err(err) => {
                debug!(error = %err, "frame is not a scanner message; taking it as a raw scan");
                frame.to_string()
            }
        }
    } else {
        frame.to_string()
    };

    if text.chars().count() > MAX_SCAN_CHARS {
        return Err(format!("scan payload exceeds {MAX_SCAN_CHARS} characters"));
    }
    Ok(Some(text))
}

fn send_message_to_websocket<T>(tx: &mpsc::UnboundedSender<Message>, value: &T) -> Result<(), ()>
where
    T: ?Sized + serde::Serialize + std::fmt::Debug,
{
    let payload = match serde_json::to_string(value) {
        Ok(p) => p,
        Err(err) => {
            warn!(error = %err, "failed to serialize scanner message `{value:?}`");
            return Ok(());
        }
    };

    tx.send(Message::Text(payload.into())).map_err(|_| ())
}

async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
