//! NFT model for tokens minted against credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents a minted NFT record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Nft {
    /// Unique identifier for this NFT record.
    pub id: i64,
    /// Credential the token was minted for.
    #[sqlx(rename = "credentialid")]
    pub credential_id: i64,
    #[sqlx(rename = "tokenid")]
    pub token_id: String,
    #[sqlx(rename = "contractaddress")]
    pub contract_address: String,
    /// Rendered metadata document.
    pub nft_metadata: serde_json::Value,
    pub timecreated: DateTime<Utc>,
    pub timemodified: DateTime<Utc>,
}

/// Data required to create a new NFT record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNft {
    pub credential_id: i64,
    pub token_id: String,
    pub contract_address: String,
    pub nft_metadata: serde_json::Value,
}

impl Nft {
    /// Returns the URL path for viewing this NFT.
    pub fn view_path(&self) -> String {
        format!("/api/v1/nfts/{}", self.id)
    }
}
