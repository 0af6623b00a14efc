//! Persistence for credentials and NFT records.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppError;
use crate::models::{Credential, NewCredential, NewNft, Nft};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Rows removed by a user-data erasure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErasureCounts {
    pub credentials: u64,
    pub nfts: u64,
}

/// Storage for the `credentials` and `nft` tables.
///
/// Credentials and NFTs are never updated; they are created and, on
/// user-data erasure, deleted.
#[async_trait]
pub trait PassportStore: Send + Sync {
    async fn insert_credential(&self, new: &NewCredential) -> Result<Credential, AppError>;

    async fn get_credential(&self, id: i64) -> Result<Option<Credential>, AppError>;

    /// All credentials of a user, newest issuance first.
    async fn credentials_for_user(&self, user_id: i64) -> Result<Vec<Credential>, AppError>;

    async fn has_credentials(&self, user_id: i64) -> Result<bool, AppError>;

    async fn insert_nft(&self, new: &NewNft) -> Result<Nft, AppError>;

    async fn get_nft(&self, id: i64) -> Result<Option<Nft>, AppError>;

    /// The earliest NFT minted for a credential, if any.
    async fn nft_for_credential(&self, credential_id: i64) -> Result<Option<Nft>, AppError>;

    /// Every NFT minted for a credential, oldest first.
    async fn nfts_for_credential(&self, credential_id: i64) -> Result<Vec<Nft>, AppError>;

    /// Deletes a user's NFTs and then their credentials.
    async fn delete_user_data(&self, user_id: i64) -> Result<ErasureCounts, AppError>;
}
