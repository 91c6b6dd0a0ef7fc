//! DTO definitions used by the admin REST API and documentation layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::game::MatchSnapshot,
    state::match_config::{AdminScanTarget, GameMode, MatchConfig},
};

/// PIN entered on the configuration gate.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UnlockRequest {
    #[validate(length(equal = 4))]
    pub pin: String,
}

/// Admin session opened by a correct PIN.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnlockResponse {
    /// Send back in the `X-Admin-Token` header.
    pub token: String,
}

/// Setup configuration as edited by the operator.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigResponse {
    pub mode: GameMode,
    pub target_code: String,
    pub codes: Vec<String>,
    pub target_count: u8,
    pub control_code: String,
    pub win_score: u16,
    pub duration_minutes: u16,
}

impl From<&MatchConfig> for ConfigResponse {
    fn from(config: &MatchConfig) -> Self {
        Self {
            mode: config.mode,
            target_code: config.target_code.clone(),
            codes: config.codes.to_vec(),
            target_count: config.target_count,
            control_code: config.control_code.clone(),
            win_score: config.win_score,
            duration_minutes: config.duration_minutes,
        }
    }
}

/// Configuration after an edit, with the snapshot previewing it.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigUpdateResponse {
    pub config: ConfigResponse,
    pub snapshot: MatchSnapshot,
}

#[derive(Debug, Deserialize, ToSchema)]
/// Select the game mode.
pub struct SetModeRequest {
    pub mode: GameMode,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
/// Code text, trimmed and uppercased before storing.
pub struct SetTextRequest {
    #[validate(length(max = 256))]
    pub text: String,
}

#[derive(Debug, Deserialize, ToSchema)]
/// Integer setting; out-of-range values are clamped.
pub struct SetNumberRequest {
    pub value: i64,
}

/// Code read by the camera for a configuration field.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdminScanRequest {
    pub target: AdminScanTarget,
    #[validate(length(max = 256))]
    pub text: String,
}

/// Result of an admin scan. Blank scans are not accepted.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminScanResponse {
    pub accepted: bool,
    pub snapshot: MatchSnapshot,
}
