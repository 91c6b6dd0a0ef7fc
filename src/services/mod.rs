/// Hold-to-confirm abort.
pub mod abort_hold;
/// PIN gate and setup configuration edits.
pub mod admin_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Match lifecycle commands.
pub mod match_service;
/// Event gateway for scans.
pub mod scan_service;
/// Scanner WebSocket ingestion.
pub mod scanner_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Match and detonation countdowns.
pub mod timer_service;
