// Skill Passport Chain - credential anchoring and NFT primitives

pub mod anchor;
pub mod error;
pub mod hash;
pub mod metadata;
pub mod mint;
pub mod network;
pub mod types;

pub use anchor::{AnchorPayload, ChainAnchorer, PlaceholderAnchorer, TxHash};
pub use error::ChainError;
pub use hash::{placeholder_tx_hash, sha256_hex};
pub use metadata::{format_issue_date, MetadataFields, MetadataTemplate, DEFAULT_METADATA_TEMPLATE};
pub use mint::{NftMinter, PlaceholderMinter, TokenRef, DEMO_CONTRACT_ADDRESS, DEMO_TOKEN_PREFIX};
pub use network::{verification_url, Network};
pub use types::{CredentialKind, CredentialSubject};
