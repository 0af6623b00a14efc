//! Supported networks and block-explorer links.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// Blockchain networks credentials can be verified on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    #[default]
    EthereumSepolia,
    PolygonMumbai,
}

impl Network {
    /// Configuration identifier, also substituted into NFT metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EthereumSepolia => "ethereum_sepolia",
            Self::PolygonMumbai => "polygon_mumbai",
        }
    }

    /// Display name for settings listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::EthereumSepolia => "Ethereum Sepolia (Testnet)",
            Self::PolygonMumbai => "Polygon Mumbai (Testnet)",
        }
    }

    /// Base URL of the transaction page on the network's explorer.
    pub fn explorer_base(&self) -> &'static str {
        match self {
            Self::EthereumSepolia => "https://sepolia.etherscan.io/tx/",
            Self::PolygonMumbai => "https://mumbai.polygonscan.com/tx/",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ethereum_sepolia" => Ok(Self::EthereumSepolia),
            "polygon_mumbai" => Ok(Self::PolygonMumbai),
            other => Err(ChainError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Returns the explorer URL for `tx_hash` on the named network.
///
/// The hash is percent-encoded. Unknown or empty network names yield an
/// empty string. No lookup is made against the chain.
pub fn verification_url(network_name: &str, tx_hash: &str) -> String {
    match network_name.parse::<Network>() {
        Ok(network) => format!("{}{}", network.explorer_base(), urlencoding::encode(tx_hash)),
        Err(_) => String::new(),
    }
}
