//! Safe contract versions and the EIP-712 layout each one signs with

use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::error::HashingError;

/// Released Safe singletons whose hashing rules are known
const SUPPORTED_RELEASES: &[(u64, u64, u64)] = &[
    (0, 1, 0),
    (1, 0, 0),
    (1, 1, 0),
    (1, 1, 1),
    (1, 2, 0),
    (1, 3, 0),
    (1, 4, 0),
    (1, 4, 1),
    (1, 5, 0),
];

/// Field layout of the SafeTx struct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeTxLayout {
    /// Before v1.0.0 the refund overhead field was called `dataGas`
    DataGas,
    BaseGas,
}

/// Field layout of the EIP712Domain struct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainLayout {
    /// `EIP712Domain(address verifyingContract)`, before v1.3.0
    VerifyingContract,
    /// `EIP712Domain(uint256 chainId,address verifyingContract)`
    ChainIdAndVerifyingContract,
}

/// Complete hashing layout for one contract version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingLayout {
    pub safe_tx: SafeTxLayout,
    pub domain: DomainLayout,
}

/// A supported Safe contract version
///
/// Build metadata such as `1.3.0+L2` is accepted and ignored; pre-releases
/// and unreleased versions are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractVersion(Version);

impl ContractVersion {
    pub fn parse(raw: &str) -> Result<Self, HashingError> {
        let unsupported = || HashingError::UnsupportedContractVersion(raw.to_string());

        let version = Version::parse(raw.trim()).map_err(|_| unsupported())?;
        if !version.pre.is_empty() {
            return Err(unsupported());
        }

        let release = (version.major, version.minor, version.patch);
        if !SUPPORTED_RELEASES.contains(&release) {
            return Err(unsupported());
        }

        Ok(Self(version))
    }

    /// Selects the struct and domain layouts this version signs with
    pub fn layout(&self) -> HashingLayout {
        let release = (self.0.major, self.0.minor, self.0.patch);

        let safe_tx = if release < (1, 0, 0) {
            SafeTxLayout::DataGas
        } else {
            SafeTxLayout::BaseGas
        };
        let domain = if release < (1, 3, 0) {
            DomainLayout::VerifyingContract
        } else {
            DomainLayout::ChainIdAndVerifyingContract
        };

        HashingLayout { safe_tx, domain }
    }

    /// Whether two versions share the same release, ignoring build metadata
    pub fn same_release(&self, other: &ContractVersion) -> bool {
        (self.0.major, self.0.minor, self.0.patch) == (other.0.major, other.0.minor, other.0.patch)
    }
}

impl FromStr for ContractVersion {
    type Err = HashingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ContractVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
