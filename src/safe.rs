//! Reads Safe context snapshots from chain

use alloy::network::AnyNetwork;
use alloy::primitives::Address;
use alloy::providers::Provider;
use tracing::{debug, instrument};

use crate::contracts::ISafe;
use crate::error::{Error, Result};
use crate::types::SafeContext;

/// Chain data provider for one Safe
///
/// Every call to [`SafeReader::context`] performs a fresh read; nothing is
/// cached between evaluation passes.
pub struct SafeReader<P> {
    provider: P,
    address: Address,
    chain_id: u64,
}

impl<P> SafeReader<P>
where
    P: Provider<AnyNetwork>,
{
    /// Creates a reader for a Safe on a known chain
    pub fn new(provider: P, address: Address, chain_id: u64) -> Self {
        Self {
            provider,
            address,
            chain_id,
        }
    }

    /// Creates a reader, asking the provider for its chain ID
    pub async fn connect(provider: P, address: Address) -> Result<Self> {
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        Ok(Self::new(provider, address, chain_id))
    }

    /// Returns the Safe address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the chain ID
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Fetches the current owners, threshold, nonce and version
    ///
    /// Any failed read, including a read against an address that is not a
    /// Safe, is reported as [`Error::ContextUnavailable`].
    #[instrument(skip(self), fields(safe = %self.address, chain_id = self.chain_id))]
    pub async fn context(&self) -> Result<SafeContext> {
        let unavailable = |what: &str, e: alloy::contract::Error| Error::ContextUnavailable {
            safe: self.address,
            reason: format!("{what}: {e}"),
        };

        let safe = ISafe::new(self.address, &self.provider);

        let nonce = safe.nonce().call().await.map_err(|e| unavailable("nonce", e))?;
        let threshold = safe
            .getThreshold()
            .call()
            .await
            .map_err(|e| unavailable("threshold", e))?;
        let owners = safe.getOwners().call().await.map_err(|e| unavailable("owners", e))?;
        let version = safe.VERSION().call().await.map_err(|e| unavailable("version", e))?;

        let threshold = u64::try_from(threshold).map_err(|_| Error::ContextUnavailable {
            safe: self.address,
            reason: format!("threshold {threshold} out of range"),
        })?;

        debug!(%nonce, threshold, owners = owners.len(), %version, "fetched Safe context");

        SafeContext::new(self.address, self.chain_id, owners, threshold, nonce, version)
    }
}
