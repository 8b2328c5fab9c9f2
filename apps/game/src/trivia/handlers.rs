//! Axum route handlers for the Round API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::trivia::controller::RoundSnapshot;
use crate::trivia::state::RoundPhase;

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
    /// Round the click was made against. Omit to select in whatever round is current.
    pub round_id: Option<Uuid>,
}

/// GET /api/v1/round
///
/// Returns the session snapshot, loading the first round if none exists yet.
pub async fn handle_get_round(State(state): State<AppState>) -> Json<RoundSnapshot> {
    let mut session = state.session.lock().await;
    if session.state().phase() == RoundPhase::Loading {
        session.initialize().await;
    }
    session.poll_prefetch().await;
    Json(session.snapshot())
}

/// POST /api/v1/round/select
///
/// Picks the statement the player believes is the lie and reveals the round.
pub async fn handle_select(
    State(state): State<AppState>,
    body: Result<Json<SelectRequest>, JsonRejection>,
) -> Result<Json<RoundSnapshot>, AppError> {
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let mut session = state.session.lock().await;

    // A failed round has no id; its selection error is reported by `select`.
    let current = session.state().current().id();
    if let (Some(received), Some(id)) = (request.round_id, current) {
        if received != id {
            return Err(AppError::StaleRound { received, current });
        }
    }

    session.select(request.index)?;
    session.poll_prefetch().await;
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/round/advance
///
/// Moves to the prefetched round, waiting for it if it is still generating.
pub async fn handle_advance(State(state): State<AppState>) -> Json<RoundSnapshot> {
    let mut session = state.session.lock().await;
    session.advance().await;
    Json(session.snapshot())
}

/// POST /api/v1/round/restart
///
/// Starts the session over with a freshly generated round.
pub async fn handle_restart(State(state): State<AppState>) -> Json<RoundSnapshot> {
    let mut session = state.session.lock().await;
    session.initialize().await;
    Json(session.snapshot())
}
