//! Model status handler

use axum::{extract::State, Json};

use crate::models::ModelResponse;
use crate::AppState;

pub async fn info(State(state): State<AppState>) -> Json<ModelResponse> {
    Json(ModelResponse {
        model: state.detector.model_info(),
        layout: state.detector.layout(),
    })
}
