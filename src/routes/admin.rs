use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use validator::Validate;

use crate::{
    dto::{
        admin::{
            AdminScanRequest, AdminScanResponse, ConfigResponse, ConfigUpdateResponse,
            SetModeRequest, SetNumberRequest, SetTextRequest, UnlockRequest, UnlockResponse,
        },
        game::MatchSnapshot,
    },
    error::AppError,
    services::{admin_service, scan_service},
    state::{SharedState, match_config::ConfigChange},
};

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// PIN gate plus the configuration endpoints it protects.
pub fn router(state: SharedState) -> Router<SharedState> {
    let gated = Router::new()
        .route("/admin/config", get(get_config))
        .route("/admin/config/mode", put(set_mode))
        .route("/admin/config/target-code", put(set_target_code))
        .route("/admin/config/codes/{slot}", put(set_code))
        .route("/admin/config/target-count", put(set_target_count))
        .route("/admin/config/control-code", put(set_control_code))
        .route("/admin/config/win-score", put(set_win_score))
        .route("/admin/config/duration", put(set_duration))
        .route("/admin/scan", post(admin_scan))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token));

    Router::new()
        .route("/admin/unlock", post(unlock))
        .route("/admin/lock", post(lock))
        .merge(gated)
}

#[utoipa::path(
    post,
    path = "/admin/unlock",
    tag = "admin",
    request_body = UnlockRequest,
    responses(
        (status = 200, description = "Admin session opened", body = UnlockResponse),
        (status = 401, description = "Wrong PIN")
    )
)]
/// Check the PIN and open an admin session.
pub async fn unlock(
    State(state): State<SharedState>,
    Json(payload): Json<UnlockRequest>,
) -> Result<Json<UnlockResponse>, AppError> {
    payload.validate()?;
    let token = admin_service::unlock_admin(&state, &payload.pin).await?;
    Ok(Json(UnlockResponse { token }))
}

#[utoipa::path(
    post,
    path = "/admin/lock",
    tag = "admin",
    responses((status = 204, description = "Admin session closed"))
)]
/// Close the admin session.
pub async fn lock(State(state): State<SharedState>) -> StatusCode {
    admin_service::lock_admin(&state).await;
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/admin/config",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Token issued by /admin/unlock")),
    responses((status = 200, description = "Setup configuration", body = ConfigResponse))
)]
/// Read the setup configuration.
pub async fn get_config(State(state): State<SharedState>) -> Json<ConfigResponse> {
    let config = admin_service::config(&state).await;
    Json(ConfigResponse::from(&config))
}

#[utoipa::path(
    put,
    path = "/admin/config/mode",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Token issued by /admin/unlock")),
    request_body = SetModeRequest,
    responses((status = 200, description = "Mode selected", body = ConfigUpdateResponse))
)]
/// Select the game mode.
pub async fn set_mode(
    State(state): State<SharedState>,
    Json(payload): Json<SetModeRequest>,
) -> Result<Json<ConfigUpdateResponse>, AppError> {
    apply(&state, ConfigChange::Mode(payload.mode)).await
}

#[utoipa::path(
    put,
    path = "/admin/config/target-code",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Token issued by /admin/unlock")),
    request_body = SetTextRequest,
    responses((status = 200, description = "Objective code stored", body = ConfigUpdateResponse))
)]
/// Set the single-target objective code.
pub async fn set_target_code(
    State(state): State<SharedState>,
    Json(payload): Json<SetTextRequest>,
) -> Result<Json<ConfigUpdateResponse>, AppError> {
    payload.validate()?;
    apply(&state, ConfigChange::TargetCode(payload.text)).await
}

#[utoipa::path(
    put,
    path = "/admin/config/codes/{slot}",
    tag = "admin",
    params(
        ("X-Admin-Token" = String, Header, description = "Token issued by /admin/unlock"),
        ("slot" = usize, Path, description = "Code slot, 1 to 5")
    ),
    request_body = SetTextRequest,
    responses(
        (status = 200, description = "Code stored", body = ConfigUpdateResponse),
        (status = 404, description = "No such slot")
    )
)]
/// Set the code stored in one of the five slots.
pub async fn set_code(
    State(state): State<SharedState>,
    Path(slot): Path<usize>,
    Json(payload): Json<SetTextRequest>,
) -> Result<Json<ConfigUpdateResponse>, AppError> {
    payload.validate()?;
    let (config, snapshot) = admin_service::set_code_slot(&state, slot, payload.text).await?;
    Ok(Json(ConfigUpdateResponse {
        config: ConfigResponse::from(&config),
        snapshot: MatchSnapshot::from(&snapshot),
    }))
}

#[utoipa::path(
    put,
    path = "/admin/config/target-count",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Token issued by /admin/unlock")),
    request_body = SetNumberRequest,
    responses((status = 200, description = "Target count stored (clamped 1-5)", body = ConfigUpdateResponse))
)]
/// Set how many code slots are in play.
pub async fn set_target_count(
    State(state): State<SharedState>,
    Json(payload): Json<SetNumberRequest>,
) -> Result<Json<ConfigUpdateResponse>, AppError> {
    apply(&state, ConfigChange::TargetCount(payload.value)).await
}

#[utoipa::path(
    put,
    path = "/admin/config/control-code",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Token issued by /admin/unlock")),
    request_body = SetTextRequest,
    responses((status = 200, description = "Control point code stored", body = ConfigUpdateResponse))
)]
/// Set the area-control marker code.
pub async fn set_control_code(
    State(state): State<SharedState>,
    Json(payload): Json<SetTextRequest>,
) -> Result<Json<ConfigUpdateResponse>, AppError> {
    payload.validate()?;
    apply(&state, ConfigChange::ControlCode(payload.text)).await
}

#[utoipa::path(
    put,
    path = "/admin/config/win-score",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Token issued by /admin/unlock")),
    request_body = SetNumberRequest,
    responses((status = 200, description = "Win score stored (clamped 5-200)", body = ConfigUpdateResponse))
)]
/// Set the area-control win score.
pub async fn set_win_score(
    State(state): State<SharedState>,
    Json(payload): Json<SetNumberRequest>,
) -> Result<Json<ConfigUpdateResponse>, AppError> {
    apply(&state, ConfigChange::WinScore(payload.value)).await
}

#[utoipa::path(
    put,
    path = "/admin/config/duration",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Token issued by /admin/unlock")),
    request_body = SetNumberRequest,
    responses((status = 200, description = "Duration stored (clamped 1-240 minutes)", body = ConfigUpdateResponse))
)]
/// Set the match duration in minutes.
pub async fn set_duration(
    State(state): State<SharedState>,
    Json(payload): Json<SetNumberRequest>,
) -> Result<Json<ConfigUpdateResponse>, AppError> {
    apply(&state, ConfigChange::DurationMinutes(payload.value)).await
}

#[utoipa::path(
    post,
    path = "/admin/scan",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Token issued by /admin/unlock")),
    request_body = AdminScanRequest,
    responses((status = 200, description = "Camera-read code routed into the setup configuration", body = AdminScanResponse))
)]
/// Store a camera-read code into a configuration field.
pub async fn admin_scan(
    State(state): State<SharedState>,
    Json(payload): Json<AdminScanRequest>,
) -> Result<Json<AdminScanResponse>, AppError> {
    payload.validate()?;
    let response = match scan_service::submit_admin_scan(&state, payload.target, &payload.text)
        .await
    {
        Some(snapshot) => AdminScanResponse {
            accepted: true,
            snapshot: MatchSnapshot::from(&snapshot),
        },
        None => AdminScanResponse {
            accepted: false,
            snapshot: MatchSnapshot::from(&state.snapshot()),
        },
    };
    Ok(Json(response))
}

async fn apply(
    state: &SharedState,
    change: ConfigChange,
) -> Result<Json<ConfigUpdateResponse>, AppError> {
    let (config, snapshot) = admin_service::update_config(state, change).await?;
    Ok(Json(ConfigUpdateResponse {
        config: ConfigResponse::from(&config),
        snapshot: MatchSnapshot::from(&snapshot),
    }))
}

async fn require_admin_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
        .ok_or_else(|| {
            AppError::Unauthorized("missing admin token header `X-Admin-Token`".into())
        })?;

    admin_service::verify_admin_token(&state, &provided).await?;
    Ok(next.run(req).await)
}
