//! HTTP handlers for the movement ledger

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{Movement, MovementRecord};
use crate::services::movement::{MovementService, RecordMovementInput};
use crate::services::report::ReportService;
use crate::AppState;

/// Record a stock movement
pub async fn record_movement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordMovementInput>,
) -> AppResult<(StatusCode, Json<Movement>)> {
    let service = MovementService::new(state.db);
    let movement = service.record(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// Full movement history, newest first
pub async fn list_movements(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MovementRecord>>> {
    let service = ReportService::new(state.db);
    let records = service.movement_history().await?;
    Ok(Json(records))
}
