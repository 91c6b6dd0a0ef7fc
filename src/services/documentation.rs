use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the match controller adapter.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::websocket::scanner_ws_handler,
        crate::routes::game::get_match,
        crate::routes::game::scan,
        crate::routes::game::start_match,
        crate::routes::game::return_to_setup,
        crate::routes::game::select_side,
        crate::routes::game::begin_abort_hold,
        crate::routes::game::release_abort_hold,
        crate::routes::admin::unlock,
        crate::routes::admin::lock,
        crate::routes::admin::get_config,
        crate::routes::admin::set_mode,
        crate::routes::admin::set_target_code,
        crate::routes::admin::set_code,
        crate::routes::admin::set_target_count,
        crate::routes::admin::set_control_code,
        crate::routes::admin::set_win_score,
        crate::routes::admin::set_duration,
        crate::routes::admin::admin_scan,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::MatchSnapshot,
            crate::dto::game::ScanDecision,
            crate::dto::sse::PhaseChangedEvent,
            crate::dto::ws::ScannerInboundMessage,
            crate::dto::ws::ScannerOutboundMessage,
            crate::state::match_config::AdminScanTarget,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "scanner", description = "WebSocket feed from the optical scanner"),
        (name = "match", description = "Match control and scan submission"),
        (name = "admin", description = "PIN-gated match configuration"),
    )
)]
pub struct ApiDoc;
