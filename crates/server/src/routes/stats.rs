//! Dashboard statistics handler.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;
use crate::stats::{self, StatsResponse};

/// Department breakdowns, totals and average salary.
///
/// GET /api/stats
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let response = stats::collect(state.store()).await?;
    Ok(Json(response))
}
