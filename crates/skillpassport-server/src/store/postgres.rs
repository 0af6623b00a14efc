//! PostgreSQL-backed store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use super::{ErasureCounts, PassportStore};
use crate::error::AppError;
use crate::models::{Credential, CredentialRecord, NewCredential, NewNft, Nft};

const CREDENTIAL_COLUMNS: &str = "id, userid, credential_type, courseid, cmid, badgeid, \
     timestamp, blockchain_txhash, timecreated, timemodified";

const NFT_COLUMNS: &str =
    "id, credentialid, tokenid, contractaddress, nft_metadata, timecreated, timemodified";

/// Store backed by the plugin's Postgres tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PassportStore for PgStore {
    async fn insert_credential(&self, new: &NewCredential) -> Result<Credential, AppError> {
        let (courseid, cmid, badgeid) = new.subject.columns();
        let now = Utc::now();

        let row: CredentialRecord = sqlx::query_as(&format!(
            r#"
            INSERT INTO credentials
                (userid, credential_type, courseid, cmid, badgeid, timestamp,
                 blockchain_txhash, timecreated, timemodified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {}
            "#,
            CREDENTIAL_COLUMNS
        ))
        .bind(new.user_id)
        .bind(new.subject.kind().as_str())
        .bind(courseid)
        .bind(cmid)
        .bind(badgeid)
        .bind(new.timestamp)
        .bind(&new.blockchain_txhash)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Credential::try_from(row)
    }

    async fn get_credential(&self, id: i64) -> Result<Option<Credential>, AppError> {
        let row: Option<CredentialRecord> = sqlx::query_as(&format!(
            "SELECT {} FROM credentials WHERE id = $1",
            CREDENTIAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Credential::try_from).transpose()
    }

    async fn credentials_for_user(&self, user_id: i64) -> Result<Vec<Credential>, AppError> {
        let rows: Vec<CredentialRecord> = sqlx::query_as(&format!(
            "SELECT {} FROM credentials WHERE userid = $1 ORDER BY timestamp DESC, id DESC",
            CREDENTIAL_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Credential::try_from).collect()
    }

    async fn has_credentials(&self, user_id: i64) -> Result<bool, AppError> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM credentials WHERE userid = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }

    async fn insert_nft(&self, new: &NewNft) -> Result<Nft, AppError> {
        let now = Utc::now();

        let nft: Nft = sqlx::query_as(&format!(
            r#"
            INSERT INTO nft
                (credentialid, tokenid, contractaddress, nft_metadata, timecreated, timemodified)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            NFT_COLUMNS
        ))
        .bind(new.credential_id)
        .bind(&new.token_id)
        .bind(&new.contract_address)
        .bind(&new.nft_metadata)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(nft)
    }

    async fn get_nft(&self, id: i64) -> Result<Option<Nft>, AppError> {
        let nft: Option<Nft> =
            sqlx::query_as(&format!("SELECT {} FROM nft WHERE id = $1", NFT_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(nft)
    }

    async fn nft_for_credential(&self, credential_id: i64) -> Result<Option<Nft>, AppError> {
        let nft: Option<Nft> = sqlx::query_as(&format!(
            "SELECT {} FROM nft WHERE credentialid = $1 ORDER BY id ASC LIMIT 1",
            NFT_COLUMNS
        ))
        .bind(credential_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(nft)
    }

    async fn nfts_for_credential(&self, credential_id: i64) -> Result<Vec<Nft>, AppError> {
        let nfts: Vec<Nft> = sqlx::query_as(&format!(
            "SELECT {} FROM nft WHERE credentialid = $1 ORDER BY id ASC",
            NFT_COLUMNS
        ))
        .bind(credential_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(nfts)
    }

    async fn delete_user_data(&self, user_id: i64) -> Result<ErasureCounts, AppError> {
        let mut tx = self.pool.begin().await?;

        let nfts = sqlx::query(
            r#"
            DELETE FROM nft
            WHERE credentialid IN (SELECT id FROM credentials WHERE userid = $1)
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let credentials = sqlx::query("DELETE FROM credentials WHERE userid = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(ErasureCounts { credentials, nfts })
    }
}
