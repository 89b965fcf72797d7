//! Chain configuration for the Safe transaction service

use url::Url;

use crate::error::{Error, Result};

/// Well-known chain IDs
pub mod chain_ids {
    pub const MAINNET: u64 = 1;
    pub const OPTIMISM: u64 = 10;
    pub const GNOSIS: u64 = 100;
    pub const POLYGON: u64 = 137;
    pub const BASE: u64 = 8453;
    pub const ARBITRUM: u64 = 42161;
    pub const SEPOLIA: u64 = 11155111;
}

/// Hosted transaction service network names, keyed by chain ID
const HOSTED_SERVICES: &[(u64, &str)] = &[
    (chain_ids::MAINNET, "mainnet"),
    (chain_ids::OPTIMISM, "optimism"),
    (chain_ids::GNOSIS, "gnosis-chain"),
    (chain_ids::POLYGON, "polygon"),
    (chain_ids::BASE, "base"),
    (chain_ids::ARBITRUM, "arbitrum"),
    (chain_ids::SEPOLIA, "sepolia"),
];

/// Chain configuration: chain ID and the transaction service serving it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Chain ID
    pub chain_id: u64,
    /// Base URL of the transaction service, ending in `/api`
    pub transaction_service_url: Url,
}

impl ChainConfig {
    /// Creates the configuration of a chain with a hosted transaction service
    pub fn new(chain_id: u64) -> Result<Self> {
        let network = HOSTED_SERVICES
            .iter()
            .find(|(id, _)| *id == chain_id)
            .map(|(_, network)| *network)
            .ok_or(Error::UnsupportedChain(chain_id))?;

        let transaction_service_url =
            Url::parse(&format!("https://safe-transaction-{network}.safe.global/api"))
                .map_err(|e| Error::Registry(e.to_string()))?;

        Ok(Self {
            chain_id,
            transaction_service_url,
        })
    }

    /// Creates a configuration for a self-hosted transaction service
    pub fn with_service_url(chain_id: u64, transaction_service_url: Url) -> Self {
        Self {
            chain_id,
            transaction_service_url,
        }
    }

    /// Chain IDs with a hosted transaction service
    pub fn supported_chains() -> impl Iterator<Item = u64> {
        HOSTED_SERVICES.iter().map(|(id, _)| *id)
    }

    /// Returns configuration for Ethereum mainnet
    pub fn mainnet() -> Self {
        Self::hosted(chain_ids::MAINNET)
    }

    /// Returns configuration for Sepolia testnet
    pub fn sepolia() -> Self {
        Self::hosted(chain_ids::SEPOLIA)
    }

    /// Returns configuration for Gnosis Chain
    pub fn gnosis() -> Self {
        Self::hosted(chain_ids::GNOSIS)
    }

    fn hosted(chain_id: u64) -> Self {
        match Self::new(chain_id) {
            Ok(config) => config,
            Err(_) => unreachable!("chain {chain_id} is in the hosted service table"),
        }
    }
}
