//! Hold-to-confirm abort: the abort fires only if the hold is not released in time.

use std::time::Duration;

use tokio::{sync::oneshot, time::timeout};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{error::ServiceError, services::match_service, state::SharedState};

/// Hold waiting for its confirmation delay.
#[derive(Debug)]
pub struct PendingHold {
    id: Uuid,
    release: oneshot::Sender<()>,
}

/// Receipt for a started hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldStarted {
    /// Identifier to pass to [`release_abort_hold`].
    pub id: Uuid,
    /// How long the hold must last before the abort fires.
    pub confirm_after: Duration,
}

/// Start holding the abort control for the current match.
///
/// Replaces any hold already pending.
pub async fn begin_abort_hold(state: &SharedState) -> Result<HoldStarted, ServiceError> {
    let epoch = {
        let core = state.lock_core().await;
        let phase = core.machine.phase();
        if !phase.is_abortable() {
            return Err(ServiceError::InvalidState(format!(
                "cannot hold abort while {phase:?}"
            )));
        }
        core.machine.epoch()
    };

    let id = Uuid::new_v4();
    let hold = state.config().abort_hold;
    let (release, released) = oneshot::channel::<()>();

    {
        let mut pending = state.abort_hold().lock().await;
        if let Some(previous) = pending.replace(PendingHold { id, release }) {
            debug!(previous = %previous.id, "abort hold replaced");
        }
    }

    let task_state = state.clone();
    tokio::spawn(async move {
        if timeout(hold, released).await.is_ok() {
            debug!(hold = %id, "abort hold ended before confirmation");
            return;
        }

        let still_pending = {
            let mut pending = task_state.abort_hold().lock().await;
            match pending.as_ref() {
                Some(current) if current.id == id => pending.take().is_some(),
                _ => false,
            }
        };
        if !still_pending {
            return;
        }

        match match_service::abort_match_if_current(&task_state, epoch).await {
            Ok(Some(_)) => info!(hold = %id, "abort confirmed by hold"),
            Ok(None) => debug!(hold = %id, "abort hold outlived its match"),
            Err(err) => warn!(hold = %id, error = %err, "confirmed abort hold could not abort"),
        }
    });

    info!(hold = %id, secs = hold.as_secs(), "abort hold started");
    Ok(HoldStarted {
        id,
        confirm_after: hold,
    })
}

/// Release the hold `id` before it fires. Returns `false` if it is unknown or already fired.
pub async fn release_abort_hold(state: &SharedState, id: Uuid) -> bool {
    let mut pending = state.abort_hold().lock().await;
    match pending.take() {
        Some(hold) if hold.id == id => {
            let _ = hold.release.send(());
            debug!(hold = %id, "abort hold released");
            true
        }
        other => {
            *pending = other;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        state::{AppState, state_machine::MatchPhase},
    };

    async fn running() -> SharedState {
        let state = AppState::new(AppConfig::default());
        match_service::start_match(&state).await.unwrap();
        state
    }

    #[tokio::test(start_paused = true)]
    async fn hold_fires_after_confirmation_delay() {
        let state = running().await;
        let started = begin_abort_hold(&state).await.unwrap();
        assert_eq!(started.confirm_after, Duration::from_secs(10));

        tokio::time::sleep(Duration::from_millis(9_500)).await;
        assert_eq!(state.snapshot().phase, MatchPhase::Running);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(state.snapshot().phase, MatchPhase::Aborted);
        assert!(!release_abort_hold(&state, started.id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn early_release_cancels_without_state_change() {
        let state = running().await;
        let started = begin_abort_hold(&state).await.unwrap();

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(release_abort_hold(&state, started.id).await);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(state.snapshot().phase, MatchPhase::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn new_hold_replaces_pending_one() {
        let state = running().await;
        let first = begin_abort_hold(&state).await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        let second = begin_abort_hold(&state).await.unwrap();

        assert!(!release_abort_hold(&state, first.id).await);
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(state.snapshot().phase, MatchPhase::Running);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state.snapshot().phase, MatchPhase::Aborted);
        assert!(!release_abort_hold(&state, second.id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn hold_requires_abortable_phase() {
        let state = AppState::new(AppConfig::default());
        assert!(begin_abort_hold(&state).await.is_err());
    }
}
