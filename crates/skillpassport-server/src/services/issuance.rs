//! Credential issuance.

use chrono::Utc;
use skillpassport_chain::{AnchorPayload, CredentialKind, CredentialSubject};

use crate::config::PassportSettings;
use crate::error::AppError;
use crate::models::{Credential, NewCredential};
use crate::state::AppState;

/// Width of the `blockchain_txhash` column.
pub const MAX_TXHASH_LEN: usize = 255;

/// An issuance request after the item id has been picked for the kind.
#[derive(Debug, Clone, Default)]
pub struct IssueCredential {
    pub user_id: i64,
    pub kind: String,
    pub item_id: Option<i64>,
    pub blockchain_txhash: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedIssue {
    pub user_id: i64,
    pub subject: CredentialSubject,
    pub blockchain_txhash: Option<String>,
}

/// Validates an issuance request without touching storage.
pub fn validate(request: &IssueCredential) -> Result<ValidatedIssue, AppError> {
    let kind_name = request.kind.trim();
    if request.user_id <= 0 || kind_name.is_empty() {
        return Err(AppError::BadRequest(
            "Missing user ID or credential type.".to_string(),
        ));
    }

    let kind: CredentialKind = kind_name.parse()?;

    let item_id = request
        .item_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest(kind.missing_item_message().to_string()))?;

    let blockchain_txhash = request
        .blockchain_txhash
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string);
    if blockchain_txhash.as_ref().is_some_and(|h| h.len() > MAX_TXHASH_LEN) {
        return Err(AppError::BadRequest(format!(
            "Blockchain transaction hash must be at most {} characters.",
            MAX_TXHASH_LEN
        )));
    }

    Ok(ValidatedIssue {
        user_id: request.user_id,
        subject: CredentialSubject::new(kind, item_id),
        blockchain_txhash,
    })
}

/// Issues a credential, anchoring it first when no hash was supplied.
pub async fn issue_credential(
    state: &AppState,
    request: IssueCredential,
) -> Result<Credential, AppError> {
    let valid = validate(&request)?;

    if state.directory.user_fullname(valid.user_id).await?.is_none() {
        tracing::warn!(user_id = valid.user_id, "issuance for unknown user rejected");
        return Err(AppError::BadRequest("Invalid user ID.".to_string()));
    }

    let issued_at = Utc::now();

    let blockchain_txhash = match valid.blockchain_txhash {
        Some(hash) => hash,
        None => {
            let payload = AnchorPayload {
                user_id: valid.user_id,
                subject: valid.subject,
                issued_at,
            };
            state
                .anchorer
                .submit(&payload)
                .await
                .map_err(|e| {
                    tracing::error!(user_id = valid.user_id, error = %e, "Error anchoring credential");
                    AppError::IssueFailed
                })?
                .into_string()
        }
    };

    let new = NewCredential {
        user_id: valid.user_id,
        subject: valid.subject,
        timestamp: issued_at,
        blockchain_txhash,
    };

    let credential = state.store.insert_credential(&new).await.map_err(|e| {
        tracing::error!(user_id = new.user_id, error = %e, "Error inserting credential");
        AppError::IssueFailed
    })?;

    tracing::info!(
        credential_id = credential.id,
        user_id = credential.user_id,
        kind = %credential.kind(),
        "credential issued"
    );

    trigger_recommendation(&state.settings, &credential);

    Ok(credential)
}

/// Requests a learning recommendation for a fresh credential when enabled.
pub fn trigger_recommendation(settings: &PassportSettings, credential: &Credential) -> bool {
    if !settings.recommendations_enabled {
        return false;
    }
    tracing::info!(
        credential_id = credential.id,
        user_id = credential.user_id,
        "credential issued; recommendation requested"
    );
    true
}
