//! Request and response bodies

use phishguard_core::logic::model::ModelInfo;
use phishguard_core::{Analysis, HistoryEntry, LayoutInfo};
use serde::{Deserialize, Serialize};

/// URL submitted for analysis (form field or JSON body)
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    pub url: String,
}

/// Result page: the fresh analysis plus the full history
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub analysis: Analysis,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub model: ModelInfo,
    pub layout: LayoutInfo,
}
