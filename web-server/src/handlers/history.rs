//! History handler

use axum::{extract::State, Json};
use phishguard_core::HistoryEntry;

use crate::AppState;

/// All classifications so far, oldest first
pub async fn list(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.detector.history())
}
