//! NFT metadata view.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::auth::Caller;
use crate::error::AppError;
use crate::models::Nft;
use crate::state::AppState;

/// An NFT record as displayed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NftView {
    pub id: i64,
    pub credential_id: i64,
    pub token_id: String,
    pub contract_address: String,
    pub metadata: serde_json::Value,
    /// Metadata pretty-printed for display.
    pub metadata_pretty: String,
}

impl From<Nft> for NftView {
    fn from(nft: Nft) -> Self {
        let metadata_pretty =
            serde_json::to_string_pretty(&nft.nft_metadata).unwrap_or_else(|_| nft.nft_metadata.to_string());
        Self {
            id: nft.id,
            credential_id: nft.credential_id,
            token_id: nft.token_id,
            contract_address: nft.contract_address,
            metadata: nft.nft_metadata,
            metadata_pretty,
        }
    }
}

/// Creates the NFT router.
pub fn router(state: AppState) -> Router {
    Router::new().route("/{id}", get(view_nft)).with_state(state)
}

/// GET /api/v1/nfts/{id}
async fn view_nft(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<NftView>, AppError> {
    let nft = state
        .store
        .get_nft(id)
        .await?
        .ok_or_else(|| AppError::NotFound("NFT not found.".to_string()))?;
    Ok(Json(nft.into()))
}
