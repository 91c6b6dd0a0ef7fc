//! PIN gate and setup configuration edits.

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::ServiceError,
    state::{
        SharedState,
        match_config::{ConfigChange, MAX_CODES, MatchConfig},
        match_state::MatchState,
        state_machine::MatchPhase,
    },
};

/// Check `pin` and open an admin session, returning its token.
///
/// A wrong PIN is rejected without any lockout.
pub async fn unlock_admin(state: &SharedState, pin: &str) -> Result<String, ServiceError> {
    if pin.trim() != state.config().admin_pin {
        warn!("admin unlock rejected: wrong PIN");
        return Err(ServiceError::Unauthorized("incorrect PIN".into()));
    }

    let token = Uuid::new_v4().simple().to_string();
    state.admin_token().replace(token.clone());
    info!("admin session unlocked");
    Ok(token)
}

/// Close the admin session, if any.
pub async fn lock_admin(state: &SharedState) {
    if state.admin_token().take().is_some() {
        info!("admin session locked");
    }
}

/// Accept `token` only if it matches the open admin session.
pub async fn verify_admin_token(state: &SharedState, token: &str) -> Result<(), ServiceError> {
    match state.admin_token().as_deref() {
        Some(expected) if expected == token => Ok(()),
        Some(_) => Err(ServiceError::Unauthorized("invalid admin token".into())),
        None => Err(ServiceError::Unauthorized("admin session is locked".into())),
    }
}

/// Setup configuration as currently edited.
pub async fn config(state: &SharedState) -> MatchConfig {
    state.lock_core().await.setup.clone()
}

/// Apply one configuration edit. Only allowed while in setup.
pub async fn update_config(
    state: &SharedState,
    change: ConfigChange,
) -> Result<(MatchConfig, MatchState), ServiceError> {
    let mut core = state.lock_core().await;
    let phase = core.machine.phase();
    if phase != MatchPhase::Setup {
        return Err(ServiceError::InvalidState(format!(
            "configuration is locked while {phase:?}"
        )));
    }

    info!(?change, "setup configuration changed");
    let message = core.setup.apply(change);
    let mut next = core.state.clone();
    next.message = message;
    next.sync_with_setup(&core.setup);
    state.publish(&mut core, next);
    Ok((core.setup.clone(), core.state.clone()))
}

/// Store `text` in code slot `slot`, numbered from 1.
pub async fn set_code_slot(
    state: &SharedState,
    slot: usize,
    text: String,
) -> Result<(MatchConfig, MatchState), ServiceError> {
    if !(1..=MAX_CODES).contains(&slot) {
        return Err(ServiceError::NotFound(format!("code slot {slot}")));
    }
    update_config(state, ConfigChange::Code { index: slot - 1, text }).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        services::match_service,
        state::{AppState, match_config::GameMode},
    };

    #[tokio::test]
    async fn pin_gate_issues_and_revokes_tokens() {
        let state = AppState::new(AppConfig::default());

        let err = unlock_admin(&state, "1234").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
        assert!(verify_admin_token(&state, "anything").await.is_err());

        let token = unlock_admin(&state, "0160").await.unwrap();
        assert_eq!(token.len(), 32);
        assert!(verify_admin_token(&state, &token).await.is_ok());
        assert!(verify_admin_token(&state, "other").await.is_err());

        lock_admin(&state).await;
        assert!(verify_admin_token(&state, &token).await.is_err());
    }

    #[tokio::test]
    async fn duration_change_refreshes_preview() {
        let state = AppState::new(AppConfig::default());

        let (config, snapshot) = update_config(&state, ConfigChange::DurationMinutes(500))
            .await
            .unwrap();
        assert_eq!(config.duration_minutes, 240);
        assert_eq!(snapshot.match_remaining_seconds, 240 * 60);
        assert_eq!(snapshot.message, "Match duration: 240 min.");
        assert_eq!(state.snapshot(), snapshot);
    }

    #[tokio::test]
    async fn mode_change_publishes_mode_message() {
        let state = AppState::new(AppConfig::default());
        let (config, snapshot) = update_config(&state, ConfigChange::Mode(GameMode::Sequence))
            .await
            .unwrap();
        assert_eq!(config.mode, GameMode::Sequence);
        assert_eq!(snapshot.mode, GameMode::Sequence);
        assert_eq!(snapshot.message, "Sequence mode selected.");
    }

    #[tokio::test]
    async fn code_slots_are_numbered_from_one() {
        let state = AppState::new(AppConfig::default());

        let (updated, _) = set_code_slot(&state, 5, "echo-5".into()).await.unwrap();
        assert_eq!(updated.codes[4], "ECHO-5");

        for slot in [0, MAX_CODES + 1] {
            let err = set_code_slot(&state, slot, "x".into()).await.unwrap_err();
            assert!(matches!(err, ServiceError::NotFound(_)));
        }
        assert_eq!(config(&state).await.codes, updated.codes);
    }

    #[tokio::test(start_paused = true)]
    async fn setters_are_locked_outside_setup() {
        let state = AppState::new(AppConfig::default());
        match_service::start_match(&state).await.unwrap();

        let err = update_config(&state, ConfigChange::TargetCount(2))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
        assert_eq!(config(&state).await.target_count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_phase_locks_admin_session() {
        let state = AppState::new(AppConfig::default());
        let token = unlock_admin(&state, "0160").await.unwrap();
        match_service::start_match(&state).await.unwrap();
        assert!(verify_admin_token(&state, &token).await.is_ok());

        match_service::abort_match(&state).await.unwrap();
        assert!(verify_admin_token(&state, &token).await.is_err());
    }
}
