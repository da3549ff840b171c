//! Public bill lookup handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use billwatch_core::bill::BillView;

use crate::{handlers::AppError, state::AppState};

/// Query parameters for a bill lookup.
#[derive(Debug, Default, Deserialize)]
pub struct BillQuery {
    /// Include the AI summary (default: false)
    #[serde(default)]
    pub summary: bool,
}

/// Get a bill (GET /api/bills/{*id}).
pub async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<BillQuery>,
) -> Result<Json<BillView>, AppError> {
    let view = state.engine.lookup(&id, query.summary).await?;
    Ok(Json(view))
}

/// Get a bill with its summary for the embeddable widget
/// (GET /api/widget/bills/{*id}).
pub async fn get_widget_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BillView>, AppError> {
    let view = state.engine.lookup(&id, true).await?;
    Ok(Json(view))
}
