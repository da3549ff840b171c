//! Administrative cache handlers. Read-only introspection plus invalidation.

use axum::{extract::State, Json};

use billwatch_core::cache::{InvalidationReport, InvalidationRequest};
use billwatch_core::sync::CacheStats;

use crate::{handlers::AppError, state::AppState};

/// Invalidate cached records (POST /api/admin/cache/invalidate).
pub async fn invalidate_cache(
    State(state): State<AppState>,
    Json(request): Json<InvalidationRequest>,
) -> Result<Json<InvalidationReport>, AppError> {
    let report = state.engine.invalidate(&request).await?;
    Ok(Json(report))
}

/// Cache statistics (GET /api/admin/cache/stats).
pub async fn cache_stats(State(state): State<AppState>) -> Result<Json<CacheStats>, AppError> {
    Ok(Json(state.engine.stats().await?))
}
