//! Lookups of users, courses, activities and badges.
//!
//! These records belong to the host LMS; the server only reads display
//! names from them.

use std::collections::HashMap;

use async_trait::async_trait;
use skillpassport_chain::CredentialSubject;
use sqlx::PgPool;

use crate::error::AppError;

/// Resolves display names for people and credential subjects.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Full name ("first last") of a user.
    async fn user_fullname(&self, user_id: i64) -> Result<Option<String>, AppError>;

    /// Course full name, activity name or badge name.
    async fn subject_name(&self, subject: &CredentialSubject) -> Result<Option<String>, AppError>;
}

/// Directory reading the host's `users`, `courses`, `course_modules` and
/// `badges` tables.
#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Directory for PgDirectory {
    async fn user_fullname(&self, user_id: i64) -> Result<Option<String>, AppError> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT firstname, lastname FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(first, last)| format!("{} {}", first, last)))
    }

    async fn subject_name(&self, subject: &CredentialSubject) -> Result<Option<String>, AppError> {
        let sql = match subject {
            CredentialSubject::Course(_) => "SELECT fullname FROM courses WHERE id = $1",
            CredentialSubject::Activity(_) => "SELECT name FROM course_modules WHERE id = $1",
            CredentialSubject::Badge(_) => "SELECT name FROM badges WHERE id = $1",
        };
        let row: Option<(String,)> = sqlx::query_as(sql)
            .bind(subject.item_id())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(name,)| name))
    }
}

/// Fixed in-memory directory.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: HashMap<i64, String>,
    subjects: HashMap<CredentialSubject, String>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: i64, fullname: impl Into<String>) -> Self {
        self.users.insert(user_id, fullname.into());
        self
    }

    pub fn with_subject(mut self, subject: CredentialSubject, name: impl Into<String>) -> Self {
        self.subjects.insert(subject, name.into());
        self
    }
}

#[async_trait]
impl Directory for StaticDirectory {
    async fn user_fullname(&self, user_id: i64) -> Result<Option<String>, AppError> {
        Ok(self.users.get(&user_id).cloned())
    }

    async fn subject_name(&self, subject: &CredentialSubject) -> Result<Option<String>, AppError> {
        Ok(self.subjects.get(subject).cloned())
    }
}
