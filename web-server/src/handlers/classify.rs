//! Classification handlers

use axum::{extract::State, Form, Json};
use phishguard_core::Analysis;

use crate::models::{ClassifyRequest, PageResponse};
use crate::{AppResult, AppState};

/// Form submission: analysis plus the updated history, like the result page
pub async fn submit_form(
    State(state): State<AppState>,
    Form(req): Form<ClassifyRequest>,
) -> AppResult<Json<PageResponse>> {
    let analysis = state.detector.analyze(&req.url)?;
    tracing::info!("{} -> {}", req.url, analysis.label);

    Ok(Json(PageResponse {
        analysis,
        history: state.detector.history(),
    }))
}

/// JSON API
pub async fn classify(
    State(state): State<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> AppResult<Json<Analysis>> {
    let analysis = state.detector.analyze(&req.url)?;
    tracing::info!("{} -> {}", req.url, analysis.label);

    Ok(Json(analysis))
}
