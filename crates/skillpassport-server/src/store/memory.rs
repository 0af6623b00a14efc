//! In-memory store.
//!
//! Useful for tests and for running the server without a database.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{ErasureCounts, PassportStore};
use crate::error::AppError;
use crate::models::{Credential, NewCredential, NewNft, Nft};

#[derive(Default)]
struct Tables {
    credentials: BTreeMap<i64, Credential>,
    nfts: BTreeMap<i64, Nft>,
    next_credential_id: i64,
    next_nft_id: i64,
}

/// Store keeping both tables in process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent insert fail, simulating a storage outage.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored credentials.
    pub fn credential_count(&self) -> usize {
        self.lock().map(|t| t.credentials.len()).unwrap_or(0)
    }

    /// Number of stored NFT records.
    pub fn nft_count(&self) -> usize {
        self.lock().map(|t| t.nfts.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|e| AppError::Internal(format!("lock poisoned: {}", e)))
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("memory store is read-only".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PassportStore for MemoryStore {
    async fn insert_credential(&self, new: &NewCredential) -> Result<Credential, AppError> {
        self.check_writable()?;
        let mut tables = self.lock()?;
        tables.next_credential_id += 1;
        let now = Utc::now();
        let credential = Credential {
            id: tables.next_credential_id,
            user_id: new.user_id,
            subject: new.subject,
            timestamp: new.timestamp,
            blockchain_txhash: new.blockchain_txhash.clone(),
            timecreated: now,
            timemodified: now,
        };
        tables.credentials.insert(credential.id, credential.clone());
        Ok(credential)
    }

    async fn get_credential(&self, id: i64) -> Result<Option<Credential>, AppError> {
        Ok(self.lock()?.credentials.get(&id).cloned())
    }

    async fn credentials_for_user(&self, user_id: i64) -> Result<Vec<Credential>, AppError> {
        let tables = self.lock()?;
        let mut credentials: Vec<Credential> = tables
            .credentials
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        credentials.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(credentials)
    }

    async fn has_credentials(&self, user_id: i64) -> Result<bool, AppError> {
        Ok(self.lock()?.credentials.values().any(|c| c.user_id == user_id))
    }

    async fn insert_nft(&self, new: &NewNft) -> Result<Nft, AppError> {
        self.check_writable()?;
        let mut tables = self.lock()?;
        if !tables.credentials.contains_key(&new.credential_id) {
            return Err(AppError::Internal(format!(
                "foreign key violation: credential {} does not exist",
                new.credential_id
            )));
        }
        tables.next_nft_id += 1;
        let now = Utc::now();
        let nft = Nft {
            id: tables.next_nft_id,
            credential_id: new.credential_id,
            token_id: new.token_id.clone(),
            contract_address: new.contract_address.clone(),
            nft_metadata: new.nft_metadata.clone(),
            timecreated: now,
            timemodified: now,
        };
        tables.nfts.insert(nft.id, nft.clone());
        Ok(nft)
    }

    async fn get_nft(&self, id: i64) -> Result<Option<Nft>, AppError> {
        Ok(self.lock()?.nfts.get(&id).cloned())
    }

    async fn nft_for_credential(&self, credential_id: i64) -> Result<Option<Nft>, AppError> {
        Ok(self
            .lock()?
            .nfts
            .values()
            .find(|n| n.credential_id == credential_id)
            .cloned())
    }

    async fn nfts_for_credential(&self, credential_id: i64) -> Result<Vec<Nft>, AppError> {
        Ok(self
            .lock()?
            .nfts
            .values()
            .filter(|n| n.credential_id == credential_id)
            .cloned()
            .collect())
    }

    async fn delete_user_data(&self, user_id: i64) -> Result<ErasureCounts, AppError> {
        let mut tables = self.lock()?;
        let before_credentials = tables.credentials.len();
        let before_nfts = tables.nfts.len();

        tables.credentials.retain(|_, c| c.user_id != user_id);
        let Tables {
            credentials, nfts, ..
        } = &mut *tables;
        nfts.retain(|_, n| credentials.contains_key(&n.credential_id));

        Ok(ErasureCounts {
            credentials: (before_credentials - tables.credentials.len()) as u64,
            nfts: (before_nfts - tables.nfts.len()) as u64,
        })
    }
}
