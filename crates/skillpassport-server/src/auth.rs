//! Callers, capabilities and anti-forgery tokens.

use std::collections::HashSet;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the anti-forgery token on write requests.
pub const SESSKEY_HEADER: &str = "x-sesskey";

type HmacSha256 = Hmac<Sha256>;

/// Named permissions checked before an operation proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// View a Skill Passport dashboard.
    View,
    /// Issue credentials and mint NFTs.
    Issue,
    /// View other users' passports and handle data requests.
    Manage,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "skillpassport:view",
            Self::Issue => "skillpassport:issue",
            Self::Manage => "skillpassport:manage",
        }
    }
}

/// Role archetypes capabilities are granted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    EditingTeacher,
    Manager,
}

impl Role {
    /// Whether the archetype is granted the capability by default.
    pub fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => true,
            Capability::Issue => matches!(self, Role::EditingTeacher | Role::Manager),
            Capability::Manage => matches!(self, Role::Manager),
        }
    }
}

/// Answers capability questions for a user.
pub trait CapabilityChecker: Send + Sync {
    fn has_capability(&self, user_id: i64, capability: Capability) -> bool;
}

/// Capabilities derived from configured role assignments. Users with no
/// assignment hold the plain user archetype.
#[derive(Debug, Clone, Default)]
pub struct RoleCapabilities {
    managers: HashSet<i64>,
    teachers: HashSet<i64>,
}

impl RoleCapabilities {
    pub fn new(
        managers: impl IntoIterator<Item = i64>,
        teachers: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            managers: managers.into_iter().collect(),
            teachers: teachers.into_iter().collect(),
        }
    }

    pub fn role_of(&self, user_id: i64) -> Role {
        if self.managers.contains(&user_id) {
            Role::Manager
        } else if self.teachers.contains(&user_id) {
            Role::EditingTeacher
        } else {
            Role::User
        }
    }
}

impl CapabilityChecker for RoleCapabilities {
    fn has_capability(&self, user_id: i64, capability: Capability) -> bool {
        self.role_of(user_id).grants(capability)
    }
}

/// The authenticated user making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or(AppError::Unauthorized)?;
        Ok(Caller { user_id })
    }
}

/// Fails with `Forbidden` unless the caller holds the capability.
pub fn require_capability(
    checker: &dyn CapabilityChecker,
    caller: &Caller,
    capability: Capability,
) -> Result<(), AppError> {
    if checker.has_capability(caller.user_id, capability) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = caller.user_id,
            capability = capability.as_str(),
            "capability check failed"
        );
        Err(AppError::Forbidden(format!(
            "Missing capability: {}",
            capability.as_str()
        )))
    }
}

/// Issues and verifies per-user anti-forgery tokens.
///
/// A token is the hex HMAC-SHA256 of the user id under a server secret, so
/// no server-side state is kept.
#[derive(Clone)]
pub struct SesskeyIssuer {
    keyed: HmacSha256,
}

impl SesskeyIssuer {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, AppError> {
        let keyed = HmacSha256::new_from_slice(secret.as_ref())
            .map_err(|e| AppError::Internal(format!("invalid sesskey secret: {}", e)))?;
        Ok(Self { keyed })
    }

    fn mac(&self, user_id: i64) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(b"skillpassport-sesskey:");
        mac.update(user_id.to_string().as_bytes());
        mac
    }

    pub fn issue(&self, user_id: i64) -> String {
        hex::encode(self.mac(user_id).finalize().into_bytes())
    }

    /// Constant-time comparison of a submitted token.
    pub fn verify(&self, user_id: i64, token: &str) -> bool {
        let Ok(bytes) = hex::decode(token.trim()) else {
            return false;
        };
        self.mac(user_id).verify_slice(&bytes).is_ok()
    }

    /// Checks the token in the request headers for the caller.
    pub fn require(&self, caller: &Caller, headers: &HeaderMap) -> Result<(), AppError> {
        let token = headers
            .get(SESSKEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !token.is_empty() && self.verify(caller.user_id, token) {
            Ok(())
        } else {
            tracing::warn!(user_id = caller.user_id, "invalid or missing sesskey");
            Err(AppError::Forbidden("Invalid sesskey".to_string()))
        }
    }
}
