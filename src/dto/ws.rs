use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::game::ScanDecision, state::state_machine::MatchPhase};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
/// Messages accepted from the scanner WebSocket.
#[serde(tag = "type")]
pub enum ScannerInboundMessage {
    #[serde(rename = "scan")]
    Scan { text: String },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, ToSchema)]
/// Feedback sent back to the scanner after each frame.
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScannerOutboundMessage {
    /// The scan reached the gateway.
    Ack {
        decision: ScanDecision,
        phase: MatchPhase,
        message: String,
        scan_success_count: u32,
    },
    /// The frame could not be used.
    Error { message: String },
}
