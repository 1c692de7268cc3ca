use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

use crate::api::AppState;
use crate::types::{AnalyzeRequest, AnalyzeResponse, ResponseMetadata};
use crate::Result;

pub async fn handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>> {
    let start = Instant::now();

    let Json(request) = payload.map_err(|rejection| {
        crate::AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    // Validate request
    if request.symbol.as_str().trim().is_empty() {
        return Err(crate::AppError::Validation("Symbol is required".to_string()));
    }

    let symbol = request.symbol;
    let strategies = state
        .page
        .handle_analyze(symbol.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to analyze {}: {}", symbol, e);
            e
        })?;

    let execution_time = start.elapsed().as_millis() as u64;

    Ok(Json(AnalyzeResponse {
        symbol,
        strategies,
        metadata: ResponseMetadata {
            timestamp: Utc::now().to_rfc3339(),
            execution_time_ms: execution_time,
            model_used: Some(state.page.model_name().to_string()),
        },
    }))
}
