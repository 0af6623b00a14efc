//! Data-subject request endpoints.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::{require_capability, Caller, Capability};
use crate::error::AppError;
use crate::services::privacy::{
    contexts_for_user, delete_user_data, export_user_data, DataSubjectRequest, StorageScope,
};
use crate::state::AppState;
use crate::store::ErasureCounts;

/// Query string selecting the storage scope; `system` when absent.
#[derive(Debug, Default, Deserialize)]
pub struct ScopeQuery {
    pub scope: Option<String>,
}

impl ScopeQuery {
    fn request(&self, user_id: i64) -> Result<DataSubjectRequest, AppError> {
        let scope = match self.scope.as_deref() {
            Some(raw) => raw.parse()?,
            None => StorageScope::System,
        };
        Ok(DataSubjectRequest { user_id, scope })
    }
}

/// Result of an erasure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErasureResponse {
    pub user_id: i64,
    pub deleted: ErasureCounts,
}

/// Creates the privacy router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users/{user_id}", get(export).delete(erase))
        .with_state(state)
}

/// GET /api/v1/privacy/users/{user_id}?scope=system
async fn export(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<i64>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_capability(state.capabilities.as_ref(), &caller, Capability::Manage)?;
    let request = query.request(user_id)?;

    let contexts: Vec<String> = contexts_for_user(&state, user_id)
        .await?
        .iter()
        .map(ToString::to_string)
        .collect();
    let mut body = export_user_data(&state, &request).await?.to_json()?;
    body["contexts"] = serde_json::json!(contexts);
    Ok(Json(body))
}

/// DELETE /api/v1/privacy/users/{user_id}?scope=system
async fn erase(
    State(state): State<AppState>,
    caller: Caller,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<ErasureResponse>, AppError> {
    require_capability(state.capabilities.as_ref(), &caller, Capability::Manage)?;
    state.sesskeys.require(&caller, &headers)?;

    let deleted = delete_user_data(&state, &query.request(user_id)?).await?;
    Ok(Json(ErasureResponse { user_id, deleted }))
}
