//! Anchoring credentials on a chain.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChainError;
use crate::hash::placeholder_tx_hash;
use crate::types::CredentialSubject;

/// A transaction hash as returned by a chain (or a stand-in for one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// What gets anchored for a credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorPayload {
    pub user_id: i64,
    pub subject: CredentialSubject,
    pub issued_at: DateTime<Utc>,
}

/// Submits a credential to a chain and returns the transaction hash.
#[async_trait]
pub trait ChainAnchorer: Send + Sync {
    async fn submit(&self, payload: &AnchorPayload) -> Result<TxHash, ChainError>;
}

/// Anchorer that never talks to a chain; it synthesizes a hash locally.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderAnchorer;

#[async_trait]
impl ChainAnchorer for PlaceholderAnchorer {
    async fn submit(&self, payload: &AnchorPayload) -> Result<TxHash, ChainError> {
        Ok(TxHash(placeholder_tx_hash(
            payload.user_id,
            payload.subject.kind().as_str(),
            payload.subject.item_id(),
            payload.issued_at.timestamp(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_placeholder_anchorer_returns_hex_hash() {
        let payload = AnchorPayload {
            user_id: 5,
            subject: CredentialSubject::Badge(42),
            issued_at: Utc::now(),
        };
        let hash = PlaceholderAnchorer.submit(&payload).await.unwrap();
        assert!(hash.as_str().starts_with("0x"));
        assert_eq!(hash.as_str().len(), 66);
    }
}
