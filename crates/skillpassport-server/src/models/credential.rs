//! Credential model for issued learner credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillpassport_chain::{CredentialKind, CredentialSubject};
use sqlx::FromRow;

use crate::error::AppError;

/// Row shape of the `credentials` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CredentialRecord {
    pub id: i64,
    pub userid: i64,
    pub credential_type: String,
    pub courseid: Option<i64>,
    pub cmid: Option<i64>,
    pub badgeid: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub blockchain_txhash: String,
    pub timecreated: DateTime<Utc>,
    pub timemodified: DateTime<Utc>,
}

/// An issued credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Unique identifier for this credential.
    pub id: i64,
    /// Learner the credential was issued to.
    pub user_id: i64,
    /// What the credential is about.
    pub subject: CredentialSubject,
    /// When the credential was issued.
    pub timestamp: DateTime<Utc>,
    /// Transaction hash anchoring this credential.
    pub blockchain_txhash: String,
    pub timecreated: DateTime<Utc>,
    pub timemodified: DateTime<Utc>,
}

/// Data required to create a new credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCredential {
    pub user_id: i64,
    pub subject: CredentialSubject,
    pub timestamp: DateTime<Utc>,
    pub blockchain_txhash: String,
}

impl Credential {
    pub fn kind(&self) -> CredentialKind {
        self.subject.kind()
    }

    /// Returns the URL path that mints an NFT for this credential.
    pub fn mint_path(&self) -> String {
        format!("/api/v1/credentials/{}/nft", self.id)
    }
}

impl TryFrom<CredentialRecord> for Credential {
    type Error = AppError;

    fn try_from(row: CredentialRecord) -> Result<Self, Self::Error> {
        let kind: CredentialKind = row.credential_type.parse().map_err(|_| {
            AppError::Internal(format!(
                "credential {} has unknown type '{}'",
                row.id, row.credential_type
            ))
        })?;

        let subject = match (kind, row.courseid, row.cmid, row.badgeid) {
            (CredentialKind::Course, Some(id), None, None) => CredentialSubject::Course(id),
            (CredentialKind::Activity, None, Some(id), None) => CredentialSubject::Activity(id),
            (CredentialKind::Badge, None, None, Some(id)) => CredentialSubject::Badge(id),
            _ => {
                return Err(AppError::Internal(format!(
                    "credential {} item reference does not match type '{}'",
                    row.id, kind
                )))
            }
        };

        Ok(Self {
            id: row.id,
            user_id: row.userid,
            subject,
            timestamp: row.timestamp,
            blockchain_txhash: row.blockchain_txhash,
            timecreated: row.timecreated,
            timemodified: row.timemodified,
        })
    }
}

impl From<&Credential> for CredentialRecord {
    fn from(credential: &Credential) -> Self {
        let (courseid, cmid, badgeid) = credential.subject.columns();
        Self {
            id: credential.id,
            userid: credential.user_id,
            credential_type: credential.kind().as_str().to_string(),
            courseid,
            cmid,
            badgeid,
            timestamp: credential.timestamp,
            blockchain_txhash: credential.blockchain_txhash.clone(),
            timecreated: credential.timecreated,
            timemodified: credential.timemodified,
        }
    }
}
