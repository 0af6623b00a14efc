//! Credential kinds and subjects shared by the server and the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// The credential subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    /// Course completion.
    Course,
    /// Activity (course module) completion.
    Activity,
    /// Badge award.
    Badge,
}

impl CredentialKind {
    /// All kinds, in the order the issue form lists them.
    pub const ALL: [CredentialKind; 3] = [Self::Course, Self::Activity, Self::Badge];

    /// Stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Activity => "activity",
            Self::Badge => "badge",
        }
    }

    /// Human-readable label shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Course => "Course Completion",
            Self::Activity => "Activity Completion",
            Self::Badge => "Badge Awarded",
        }
    }

    /// Name of the item-reference field required by this kind.
    pub fn item_field(&self) -> &'static str {
        match self {
            Self::Course => "courseid",
            Self::Activity => "cmid",
            Self::Badge => "badgeid",
        }
    }

    /// Message used when the item reference for this kind is missing.
    pub fn missing_item_message(&self) -> &'static str {
        match self {
            Self::Course => "Missing course ID.",
            Self::Activity => "Missing activity ID.",
            Self::Badge => "Missing badge ID.",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialKind {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "course" => Ok(Self::Course),
            "activity" => Ok(Self::Activity),
            "badge" => Ok(Self::Badge),
            other => Err(ChainError::InvalidKind(other.to_string())),
        }
    }
}

/// The item a credential is about. Exactly one reference exists per credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum CredentialSubject {
    Course(i64),
    Activity(i64),
    Badge(i64),
}

impl CredentialSubject {
    /// Builds the subject for a kind and item id.
    pub fn new(kind: CredentialKind, item_id: i64) -> Self {
        match kind {
            CredentialKind::Course => Self::Course(item_id),
            CredentialKind::Activity => Self::Activity(item_id),
            CredentialKind::Badge => Self::Badge(item_id),
        }
    }

    pub fn kind(&self) -> CredentialKind {
        match self {
            Self::Course(_) => CredentialKind::Course,
            Self::Activity(_) => CredentialKind::Activity,
            Self::Badge(_) => CredentialKind::Badge,
        }
    }

    pub fn item_id(&self) -> i64 {
        match self {
            Self::Course(id) | Self::Activity(id) | Self::Badge(id) => *id,
        }
    }

    /// Splits the subject into the `(courseid, cmid, badgeid)` column triple.
    pub fn columns(&self) -> (Option<i64>, Option<i64>, Option<i64>) {
        match self {
            Self::Course(id) => (Some(*id), None, None),
            Self::Activity(id) => (None, Some(*id), None),
            Self::Badge(id) => (None, None, Some(*id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("course".parse::<CredentialKind>().unwrap(), CredentialKind::Course);
        assert_eq!("activity".parse::<CredentialKind>().unwrap(), CredentialKind::Activity);
        assert_eq!("badge".parse::<CredentialKind>().unwrap(), CredentialKind::Badge);
    }

    #[test]
    fn test_kind_parse_rejects_unknown() {
        let err = "diploma".parse::<CredentialKind>().unwrap_err();
        assert!(err.to_string().contains("Invalid credential type"));
        assert!("Course".parse::<CredentialKind>().is_err());
        assert!("".parse::<CredentialKind>().is_err());
    }

    #[test]
    fn test_columns_populate_exactly_one_field() {
        for kind in CredentialKind::ALL {
            let subject = CredentialSubject::new(kind, 42);
            let (course, cm, badge) = subject.columns();
            let populated = [course, cm, badge].iter().filter(|c| c.is_some()).count();
            assert_eq!(populated, 1);
            assert_eq!(subject.kind(), kind);
            assert_eq!(subject.item_id(), 42);
        }
        assert_eq!(CredentialSubject::Badge(42).columns(), (None, None, Some(42)));
    }

    #[test]
    fn test_subject_serialization() {
        let json = serde_json::to_string(&CredentialSubject::Activity(9)).unwrap();
        assert_eq!(json, r#"{"kind":"activity","id":9}"#);
    }
}
