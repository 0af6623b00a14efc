//! Credential issuance and NFT minting endpoints.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use skillpassport_chain::CredentialKind;

use crate::auth::{require_capability, Caller, Capability};
use crate::error::AppError;
use crate::models::{Credential, Nft};
use crate::services::issuance::{issue_credential, IssueCredential};
use crate::services::minting::mint_nft;
use crate::state::AppState;

/// Body of the issue form. Only the item id matching the kind is used.
#[derive(Debug, Default, Deserialize)]
pub struct IssueForm {
    #[serde(default)]
    pub userid: i64,
    #[serde(default)]
    pub credentialtype: String,
    pub courseid: Option<i64>,
    pub cmid: Option<i64>,
    pub badgeid: Option<i64>,
    pub blockchain_txhash: Option<String>,
}

impl IssueForm {
    /// Picks the item id for the declared kind.
    pub fn into_request(self) -> IssueCredential {
        let item_id = match self.credentialtype.trim().parse::<CredentialKind>() {
            Ok(CredentialKind::Course) => self.courseid,
            Ok(CredentialKind::Activity) => self.cmid,
            Ok(CredentialKind::Badge) => self.badgeid,
            Err(_) => None,
        };
        IssueCredential {
            user_id: self.userid,
            kind: self.credentialtype,
            item_id,
            blockchain_txhash: self.blockchain_txhash,
        }
    }
}

/// Creates the credentials router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(issue))
        .route("/{id}/nft", post(mint))
        .with_state(state)
}

/// POST /api/v1/credentials
async fn issue(
    State(state): State<AppState>,
    caller: Caller,
    headers: HeaderMap,
    Json(form): Json<IssueForm>,
) -> Result<(StatusCode, Json<Credential>), AppError> {
    require_capability(state.capabilities.as_ref(), &caller, Capability::Issue)?;
    state.sesskeys.require(&caller, &headers)?;

    let credential = issue_credential(&state, form.into_request()).await?;
    Ok((StatusCode::CREATED, Json(credential)))
}

/// POST /api/v1/credentials/{id}/nft
async fn mint(
    State(state): State<AppState>,
    caller: Caller,
    headers: HeaderMap,
    Path(credential_id): Path<i64>,
) -> Result<(StatusCode, Json<Nft>), AppError> {
    require_capability(state.capabilities.as_ref(), &caller, Capability::Issue)?;
    state.sesskeys.require(&caller, &headers)?;

    let nft = mint_nft(&state, credential_id).await?;
    Ok((StatusCode::CREATED, Json(nft)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(kind: &str) -> IssueForm {
        IssueForm {
            userid: 3,
            credentialtype: kind.to_string(),
            courseid: Some(10),
            cmid: Some(20),
            badgeid: Some(42),
            blockchain_txhash: None,
        }
    }

    #[test]
    fn test_item_follows_kind() {
        assert_eq!(form("course").into_request().item_id, Some(10));
        assert_eq!(form("activity").into_request().item_id, Some(20));
        assert_eq!(form("badge").into_request().item_id, Some(42));
        assert_eq!(form("diploma").into_request().item_id, None);
    }

    #[test]
    fn test_form_fields_are_optional() {
        let form: IssueForm =
            serde_json::from_str(r#"{"userid": 3, "credentialtype": "badge", "badgeid": 42}"#)
                .unwrap();
        let request = form.into_request();
        assert_eq!(request.user_id, 3);
        assert_eq!(request.item_id, Some(42));
        assert!(request.blockchain_txhash.is_none());

        let empty: IssueForm = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.userid, 0);
        assert!(empty.credentialtype.is_empty());
    }
}
