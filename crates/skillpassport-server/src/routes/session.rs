//! Anti-forgery token endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::auth::Caller;
use crate::state::AppState;

/// The caller's sesskey, to be echoed in the `X-Sesskey` header of writes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SesskeyResponse {
    pub user_id: i64,
    pub sesskey: String,
}

/// Creates the session router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sesskey", get(get_sesskey))
        .with_state(state)
}

/// GET /api/v1/session/sesskey
async fn get_sesskey(State(state): State<AppState>, caller: Caller) -> Json<SesskeyResponse> {
    Json(SesskeyResponse {
        user_id: caller.user_id,
        sesskey: state.sesskeys.issue(caller.user_id),
    })
}
