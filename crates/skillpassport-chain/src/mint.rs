//! Minting NFTs for credentials.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// Prefix of token ids produced by [`PlaceholderMinter`].
pub const DEMO_TOKEN_PREFIX: &str = "DEMO_TOKEN_";

/// Contract address reported by [`PlaceholderMinter`].
pub const DEMO_CONTRACT_ADDRESS: &str = "0xDEMO_CONTRACT_ADDRESS";

/// Where a minted token lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRef {
    pub token_id: String,
    pub contract_address: String,
}

/// Mints a token carrying the given metadata.
#[async_trait]
pub trait NftMinter: Send + Sync {
    async fn mint(&self, metadata: &serde_json::Value) -> Result<TokenRef, ChainError>;
}

/// Minter that records a demo token id without any chain interaction.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderMinter;

/// 13 lowercase hex characters, the width of a host-style unique id.
fn demo_token_suffix() -> String {
    let value: u64 = rand::thread_rng().gen_range(0..(1u64 << 52));
    format!("{:013x}", value)
}

#[async_trait]
impl NftMinter for PlaceholderMinter {
    async fn mint(&self, _metadata: &serde_json::Value) -> Result<TokenRef, ChainError> {
        Ok(TokenRef {
            token_id: format!("{}{}", DEMO_TOKEN_PREFIX, demo_token_suffix()),
            contract_address: DEMO_CONTRACT_ADDRESS.to_string(),
        })
    }
}
