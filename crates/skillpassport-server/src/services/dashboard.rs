//! Passport dashboard assembly.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use skillpassport_chain::{format_issue_date, verification_url, CredentialKind};

use crate::auth::{require_capability, Caller, Capability};
use crate::config::PassportSettings;
use crate::error::AppError;
use crate::models::{Credential, Nft};
use crate::state::AppState;
use crate::store::PassportStore;

/// Where the issue form lives.
pub const ISSUE_PATH: &str = "/api/v1/credentials";

/// Shown when a subject no longer exists in the directory.
pub const MISSING_ITEM_NAME: &str = "N/A";

/// Which credential kinds the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFilters {
    pub show_course_completions: bool,
    pub show_activity_completions: bool,
    pub show_badges: bool,
}

impl DisplayFilters {
    pub fn from_settings(settings: &PassportSettings) -> Self {
        Self {
            show_course_completions: settings.show_course_completions,
            show_activity_completions: settings.show_activity_completions,
            show_badges: settings.show_badges,
        }
    }

    pub fn allows(&self, kind: CredentialKind) -> bool {
        match kind {
            CredentialKind::Course => self.show_course_completions,
            CredentialKind::Activity => self.show_activity_completions,
            CredentialKind::Badge => self.show_badges,
        }
    }
}

/// Drops hidden kinds, keeping the relative order of the rest.
pub fn filter_credentials(credentials: Vec<Credential>, filters: &DisplayFilters) -> Vec<Credential> {
    credentials
        .into_iter()
        .filter(|c| filters.allows(c.kind()))
        .collect()
}

/// Memoizes NFT lookups by credential id for a single dashboard render.
///
/// Create one per request; it holds no state across requests.
#[derive(Debug, Default)]
pub struct NftLookupCache {
    entries: HashMap<i64, Option<Nft>>,
    store_hits: usize,
}

impl NftLookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The earliest NFT of a credential, asking the store at most once per id.
    pub async fn get(
        &mut self,
        store: &dyn PassportStore,
        credential_id: i64,
    ) -> Result<Option<Nft>, AppError> {
        if let Some(cached) = self.entries.get(&credential_id) {
            return Ok(cached.clone());
        }
        let nft = store.nft_for_credential(credential_id).await?;
        self.store_hits += 1;
        self.entries.insert(credential_id, nft.clone());
        Ok(nft)
    }

    /// Number of lookups that reached the store.
    pub fn store_hits(&self) -> usize {
        self.store_hits
    }
}

/// One credential as shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEntry {
    pub id: i64,
    pub user_id: i64,
    pub kind: CredentialKind,
    pub kind_label: &'static str,
    pub item_id: i64,
    pub item_name: String,
    pub issued_at: DateTime<Utc>,
    pub issued_on: String,
    pub blockchain_txhash: String,
    pub verify_url: String,
    pub has_nft: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft_token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft_contract_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft_view_path: Option<String>,
    pub mint_path: String,
}

/// The whole passport page for one learner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user_id: i64,
    pub username: String,
    pub has_credentials: bool,
    pub can_issue: bool,
    pub issue_path: &'static str,
    pub credentials: Vec<DashboardEntry>,
}

/// Builds the dashboard of `target` (the caller when `None`).
///
/// Viewing someone else's passport requires the manage capability.
pub async fn assemble_dashboard(
    state: &AppState,
    caller: &Caller,
    target: Option<i64>,
    cache: &mut NftLookupCache,
) -> Result<Dashboard, AppError> {
    let checker = state.capabilities.as_ref();
    require_capability(checker, caller, Capability::View)?;

    let user_id = target.unwrap_or(caller.user_id);
    if user_id != caller.user_id {
        require_capability(checker, caller, Capability::Manage)?;
    }

    let username = state
        .directory
        .user_fullname(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found.", user_id)))?;

    let filters = DisplayFilters::from_settings(&state.settings);
    let credentials = filter_credentials(state.store.credentials_for_user(user_id).await?, &filters);

    let network = state.settings.network.as_str();
    let mut entries = Vec::with_capacity(credentials.len());
    for credential in credentials {
        let item_name = state
            .directory
            .subject_name(&credential.subject)
            .await?
            .unwrap_or_else(|| MISSING_ITEM_NAME.to_string());
        let nft = cache.get(state.store.as_ref(), credential.id).await?;
        entries.push(entry(credential, item_name, nft, network));
    }

    Ok(Dashboard {
        user_id,
        username,
        has_credentials: !entries.is_empty(),
        can_issue: checker.has_capability(caller.user_id, Capability::Issue),
        issue_path: ISSUE_PATH,
        credentials: entries,
    })
}

fn entry(credential: Credential, item_name: String, nft: Option<Nft>, network: &str) -> DashboardEntry {
    let kind = credential.kind();
    DashboardEntry {
        id: credential.id,
        user_id: credential.user_id,
        kind,
        kind_label: kind.label(),
        item_id: credential.subject.item_id(),
        item_name,
        issued_at: credential.timestamp,
        issued_on: format_issue_date(credential.timestamp),
        verify_url: verification_url(network, &credential.blockchain_txhash),
        mint_path: credential.mint_path(),
        blockchain_txhash: credential.blockchain_txhash,
        has_nft: nft.is_some(),
        nft_id: nft.as_ref().map(|n| n.id),
        nft_view_path: nft.as_ref().map(Nft::view_path),
        nft_token_id: nft.as_ref().map(|n| n.token_id.clone()),
        nft_contract_address: nft.map(|n| n.contract_address),
    }
}
