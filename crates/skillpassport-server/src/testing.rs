//! Fixtures shared by unit tests.

use std::sync::Arc;

use skillpassport_chain::CredentialSubject;

use crate::auth::{RoleCapabilities, SesskeyIssuer};
use crate::config::PassportSettings;
use crate::directory::StaticDirectory;
use crate::state::AppState;
use crate::store::MemoryStore;

pub(crate) const MANAGER: i64 = 1;
pub(crate) const TEACHER: i64 = 2;
pub(crate) const LEARNER: i64 = 3;
pub(crate) const OTHER_LEARNER: i64 = 4;

pub(crate) const COURSE: CredentialSubject = CredentialSubject::Course(10);
pub(crate) const ACTIVITY: CredentialSubject = CredentialSubject::Activity(20);
pub(crate) const BADGE: CredentialSubject = CredentialSubject::Badge(42);

pub(crate) fn directory() -> StaticDirectory {
    StaticDirectory::new()
        .with_user(MANAGER, "Mary Manager")
        .with_user(TEACHER, "Tom Teacher")
        .with_user(LEARNER, "Ada Lovelace")
        .with_user(OTHER_LEARNER, "Alan Turing")
        .with_subject(COURSE, "Rust Fundamentals")
        .with_subject(ACTIVITY, "Ownership Quiz")
        .with_subject(BADGE, "Borrow Checker Tamer")
}

pub(crate) fn state_with(settings: PassportSettings) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let sesskeys = SesskeyIssuer::new("unit-test-sesskey-secret").expect("valid sesskey secret");
    let state = AppState::new(
        store.clone(),
        Arc::new(directory()),
        Arc::new(RoleCapabilities::new([MANAGER], [TEACHER])),
        sesskeys,
        settings,
    );
    (state, store)
}

pub(crate) fn state() -> (AppState, Arc<MemoryStore>) {
    state_with(PassportSettings::default())
}
