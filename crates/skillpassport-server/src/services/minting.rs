//! NFT minting for issued credentials.

use skillpassport_chain::{format_issue_date, MetadataFields, MetadataTemplate};

use crate::error::AppError;
use crate::models::{Credential, NewNft, Nft};
use crate::state::AppState;

/// Builds the metadata document for a credential from the configured template.
pub async fn render_metadata(
    state: &AppState,
    credential: &Credential,
) -> Result<serde_json::Value, AppError> {
    let template = MetadataTemplate::parse(&state.settings.nft_metadata_template)?;

    let learner_name = state
        .directory
        .user_fullname(credential.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found.", credential.user_id)))?;

    let credential_name = state
        .directory
        .subject_name(&credential.subject)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "{} {} not found.",
                credential.kind(),
                credential.subject.item_id()
            ))
        })?;

    let fields = MetadataFields {
        credential_name,
        learner_name,
        issue_date: format_issue_date(credential.timestamp),
        blockchain_network: state.settings.network.as_str().to_string(),
    };

    Ok(template.render(&fields))
}

/// Mints an NFT for a credential.
///
/// Minting is not idempotent: each call stores a new NFT record, even when
/// the credential already has one.
pub async fn mint_nft(state: &AppState, credential_id: i64) -> Result<Nft, AppError> {
    let credential = state
        .store
        .get_credential(credential_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Credential not found.".to_string()))?;

    let metadata = render_metadata(state, &credential).await?;

    let token = state.minter.mint(&metadata).await.map_err(|e| {
        tracing::error!(credential_id, error = %e, "Error minting NFT");
        AppError::MintFailed(credential_id)
    })?;

    let new = NewNft {
        credential_id,
        token_id: token.token_id,
        contract_address: token.contract_address,
        nft_metadata: metadata,
    };

    let nft = state.store.insert_nft(&new).await.map_err(|e| {
        tracing::error!(credential_id, error = %e, "Error storing minted NFT");
        AppError::MintFailed(credential_id)
    })?;

    tracing::info!(nft_id = nft.id, credential_id, token_id = %nft.token_id, "NFT minted");

    Ok(nft)
}
