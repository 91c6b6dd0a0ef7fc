use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::game::{
        HoldTicket, MatchSnapshot, ReleaseHoldRequest, ReleaseHoldResponse, ScanRequest,
        ScanResponse, SelectSideRequest,
    },
    error::AppError,
    services::{abort_hold, match_service, scan_service},
    state::SharedState,
};

/// Match control endpoints used by the controller UI and the scanner.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/match", get(get_match))
        .route("/match/scan", post(scan))
        .route("/match/start", post(start_match))
        .route("/match/reset", post(return_to_setup))
        .route("/match/side", post(select_side))
        .route("/match/abort/hold", post(begin_abort_hold))
        .route("/match/abort/release", post(release_abort_hold))
}

#[utoipa::path(
    get,
    path = "/match",
    tag = "match",
    responses((status = 200, description = "Current match snapshot", body = MatchSnapshot))
)]
/// Return the latest published snapshot.
pub async fn get_match(State(state): State<SharedState>) -> Json<MatchSnapshot> {
    Json(MatchSnapshot::from(&match_service::current_snapshot(&state)))
}

#[utoipa::path(
    post,
    path = "/match/scan",
    tag = "match",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan handled by the gateway", body = ScanResponse),
        (status = 400, description = "Scan text too long")
    )
)]
/// Submit one decoded scan payload.
pub async fn scan(
    State(state): State<SharedState>,
    Json(payload): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, AppError> {
    payload.validate()?;
    let report = scan_service::submit_scan(&state, &payload.text).await;
    Ok(Json(report.into()))
}

#[utoipa::path(
    post,
    path = "/match/start",
    tag = "match",
    responses(
        (status = 200, description = "Match started", body = MatchSnapshot),
        (status = 409, description = "A match is already live or finished")
    )
)]
/// Freeze the setup configuration and start the match.
pub async fn start_match(
    State(state): State<SharedState>,
) -> Result<Json<MatchSnapshot>, AppError> {
    let snapshot = match_service::start_match(&state).await?;
    Ok(Json(MatchSnapshot::from(&snapshot)))
}

#[utoipa::path(
    post,
    path = "/match/reset",
    tag = "match",
    responses(
        (status = 200, description = "Back in setup", body = MatchSnapshot),
        (status = 409, description = "The match has not finished")
    )
)]
/// Return from a finished match to setup.
pub async fn return_to_setup(
    State(state): State<SharedState>,
) -> Result<Json<MatchSnapshot>, AppError> {
    let snapshot = match_service::return_to_setup(&state).await?;
    Ok(Json(MatchSnapshot::from(&snapshot)))
}

#[utoipa::path(
    post,
    path = "/match/side",
    tag = "match",
    request_body = SelectSideRequest,
    responses(
        (status = 200, description = "Side selected", body = MatchSnapshot),
        (status = 409, description = "No area-control match is running")
    )
)]
/// Select the side this device scans for.
pub async fn select_side(
    State(state): State<SharedState>,
    Json(payload): Json<SelectSideRequest>,
) -> Result<Json<MatchSnapshot>, AppError> {
    let snapshot = match_service::select_side(&state, payload.side).await?;
    Ok(Json(MatchSnapshot::from(&snapshot)))
}

#[utoipa::path(
    post,
    path = "/match/abort/hold",
    tag = "match",
    responses(
        (status = 200, description = "Hold started; the abort fires unless released in time", body = HoldTicket),
        (status = 409, description = "No match to abort")
    )
)]
/// Start holding the abort control.
pub async fn begin_abort_hold(
    State(state): State<SharedState>,
) -> Result<Json<HoldTicket>, AppError> {
    let started = abort_hold::begin_abort_hold(&state).await?;
    Ok(Json(started.into()))
}

#[utoipa::path(
    post,
    path = "/match/abort/release",
    tag = "match",
    request_body = ReleaseHoldRequest,
    responses((status = 200, description = "Whether a pending hold was cancelled", body = ReleaseHoldResponse))
)]
/// Release the abort control before the hold confirms.
pub async fn release_abort_hold(
    State(state): State<SharedState>,
    Json(payload): Json<ReleaseHoldRequest>,
) -> Json<ReleaseHoldResponse> {
    let released = abort_hold::release_abort_hold(&state, payload.id).await;
    Json(ReleaseHoldResponse { released })
}
