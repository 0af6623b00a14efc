//! Error type for chain-facing operations.

/// Errors raised by anchoring, minting and metadata templating.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid credential type: {0}")]
    InvalidKind(String),

    #[error("Unknown blockchain network: {0}")]
    UnknownNetwork(String),

    #[error("Invalid metadata template: {0}")]
    InvalidTemplate(String),

    #[error("Anchoring failed: {0}")]
    Anchor(String),

    #[error("Minting failed: {0}")]
    Mint(String),
}
