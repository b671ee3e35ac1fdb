//! HTTP handlers

pub mod classify;
pub mod health;
pub mod history;
pub mod model;

use crate::{AppError, AppResult};

/// Fallback for unknown routes
pub async fn not_found() -> AppResult<()> {
    Err(AppError::NotFound("Route not found".to_string()))
}
