//! Data-subject requests: locating, exporting and erasing a user's data.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use skillpassport_chain::{format_issue_date, CredentialKind};

use crate::error::AppError;
use crate::services::dashboard::MISSING_ITEM_NAME;
use crate::state::AppState;
use crate::store::ErasureCounts;

/// Where a user's data lives. Passport data is only ever stored at system level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    System,
    Course(i64),
    User(i64),
}

impl fmt::Display for StorageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageScope::System => f.write_str("system"),
            StorageScope::Course(id) => write!(f, "course:{}", id),
            StorageScope::User(id) => write!(f, "user:{}", id),
        }
    }
}

impl FromStr for StorageScope {
    type Err = AppError;

    /// Parses `system`, `course:<id>` or `user:<id>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("system") {
            return Ok(StorageScope::System);
        }
        let invalid = || AppError::BadRequest(format!("Invalid scope: {}", s));
        let (level, id) = s.split_once(':').ok_or_else(invalid)?;
        let id: i64 = id.parse().map_err(|_| invalid())?;
        match level {
            "course" => Ok(StorageScope::Course(id)),
            "user" => Ok(StorageScope::User(id)),
            _ => Err(invalid()),
        }
    }
}

/// A request to export or erase one user's data within a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSubjectRequest {
    pub user_id: i64,
    pub scope: StorageScope,
}

impl DataSubjectRequest {
    pub fn system(user_id: i64) -> Self {
        Self {
            user_id,
            scope: StorageScope::System,
        }
    }

    fn ensure_supported(&self) -> Result<(), AppError> {
        match self.scope {
            StorageScope::System => Ok(()),
            other => {
                tracing::warn!(user_id = self.user_id, scope = %other, "unsupported privacy scope");
                Err(AppError::NotFound(
                    "Non-system context encountered during data export/deletion.".to_string(),
                ))
            }
        }
    }
}

/// Scopes holding data for the user.
pub async fn contexts_for_user(state: &AppState, user_id: i64) -> Result<Vec<StorageScope>, AppError> {
    if state.store.has_credentials(user_id).await? {
        Ok(vec![StorageScope::System])
    } else {
        Ok(Vec::new())
    }
}

/// The NFT attached to an exported credential.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedNft {
    pub id: i64,
    pub tokenid: String,
    pub contractaddress: String,
    #[serde(rename = "nft_metadata_json")]
    pub nft_metadata: serde_json::Value,
    pub timecreated: String,
}

/// One credential in a data export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedCredential {
    pub id: i64,
    pub credential_type: CredentialKind,
    pub timestamp: String,
    pub blockchain_txhash: String,
    pub timecreated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub nft_data: Option<ExportedNft>,
}

/// A user's exported passport data, newest credential first.
#[derive(Debug, Clone)]
pub struct UserDataExport {
    pub user_id: i64,
    pub credentials: Vec<(String, ExportedCredential)>,
}

impl UserDataExport {
    /// The export as a JSON object keyed `credentials_<id>`.
    pub fn to_json(&self) -> Result<serde_json::Value, AppError> {
        let mut records = serde_json::Map::new();
        for (key, record) in &self.credentials {
            let value = serde_json::to_value(record)
                .map_err(|e| AppError::Internal(format!("failed to serialize {}: {}", key, e)))?;
            records.insert(key.clone(), value);
        }
        Ok(serde_json::json!({ "userId": self.user_id, "credentials": records }))
    }
}

/// Exports every credential of the user with its first NFT.
pub async fn export_user_data(
    state: &AppState,
    request: &DataSubjectRequest,
) -> Result<UserDataExport, AppError> {
    request.ensure_supported()?;

    let mut credentials = state.store.credentials_for_user(request.user_id).await?;
    credentials.sort_by(|a, b| b.timecreated.cmp(&a.timecreated).then(b.id.cmp(&a.id)));

    let mut exported = Vec::with_capacity(credentials.len());
    for credential in credentials {
        let item_name = state
            .directory
            .subject_name(&credential.subject)
            .await?
            .unwrap_or_else(|| MISSING_ITEM_NAME.to_string());

        let nft_data = state
            .store
            .nft_for_credential(credential.id)
            .await?
            .map(|nft| ExportedNft {
                id: nft.id,
                tokenid: nft.token_id,
                contractaddress: nft.contract_address,
                nft_metadata: nft.nft_metadata,
                timecreated: format_issue_date(nft.timecreated),
            });

        let kind = credential.kind();
        let (course, activity, badge) = match kind {
            CredentialKind::Course => (Some(item_name), None, None),
            CredentialKind::Activity => (None, Some(item_name), None),
            CredentialKind::Badge => (None, None, Some(item_name)),
        };

        exported.push((
            format!("credentials_{}", credential.id),
            ExportedCredential {
                id: credential.id,
                credential_type: kind,
                timestamp: format_issue_date(credential.timestamp),
                blockchain_txhash: credential.blockchain_txhash,
                timecreated: format_issue_date(credential.timecreated),
                course,
                activity,
                badge,
                nft_data,
            },
        ));
    }

    tracing::info!(user_id = request.user_id, credentials = exported.len(), "user data exported");

    Ok(UserDataExport {
        user_id: request.user_id,
        credentials: exported,
    })
}

/// Deletes every NFT and credential of the user.
pub async fn delete_user_data(
    state: &AppState,
    request: &DataSubjectRequest,
) -> Result<ErasureCounts, AppError> {
    request.ensure_supported()?;

    let counts = state.store.delete_user_data(request.user_id).await?;
    tracing::info!(
        user_id = request.user_id,
        credentials = counts.credentials,
        nfts = counts.nfts,
        "user data erased"
    );
    Ok(counts)
}
