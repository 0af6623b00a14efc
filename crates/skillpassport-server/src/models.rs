//! Database models for Skill Passport.

pub mod credential;
pub mod nft;

pub use credential::{Credential, CredentialRecord, NewCredential};
pub use nft::{NewNft, Nft};
