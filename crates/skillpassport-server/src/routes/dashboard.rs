//! Passport dashboard endpoint.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::auth::Caller;
use crate::error::AppError;
use crate::services::dashboard::{assemble_dashboard, Dashboard, NftLookupCache};
use crate::state::AppState;

/// Query string of the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct PassportQuery {
    /// Whose passport to show; the caller's when absent.
    pub userid: Option<i64>,
}

/// Creates the passport router.
pub fn router(state: AppState) -> Router {
    Router::new().route("/", get(view_passport)).with_state(state)
}

/// GET /api/v1/passport?userid=N
async fn view_passport(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<PassportQuery>,
) -> Result<Json<Dashboard>, AppError> {
    let mut cache = NftLookupCache::new();
    let dashboard = assemble_dashboard(&state, &caller, query.userid, &mut cache).await?;
    tracing::debug!(
        user_id = dashboard.user_id,
        entries = dashboard.credentials.len(),
        nft_lookups = cache.store_hits(),
        "passport rendered"
    );
    Ok(Json(dashboard))
}
