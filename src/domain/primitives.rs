//! Domain primitives: Address, PoolId.

use serde::{Deserialize, Serialize};

/// Wallet address (hex string), kept exactly as delivered by the feed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: String) -> Self {
        Address(addr)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used for comparisons; checksum casing is not validated.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive match against another address string.
    pub fn matches(&self, other: &str) -> bool {
        self.normalized() == other.to_lowercase()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Staking pool identifier.
///
/// Pools 1 and 2 are the NFT collections, pool 0 is plain token stake and
/// pool 3 is the synthetic aggregate of all active pairings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolId(pub u64);

impl PoolId {
    pub const FUNGIBLE: PoolId = PoolId(0);
    pub const COLLECTION_A: PoolId = PoolId(1);
    pub const COLLECTION_B: PoolId = PoolId(2);
    pub const PAIRED: PoolId = PoolId(3);

    /// The pools every summary reports, even when empty.
    pub const REPORTED: [PoolId; 4] = [
        PoolId::FUNGIBLE,
        PoolId::COLLECTION_A,
        PoolId::COLLECTION_B,
        PoolId::PAIRED,
    ];

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Stable presentation label.
    pub fn label(&self) -> String {
        match self.0 {
            0 => "ape".to_string(),
            1 => "bayc".to_string(),
            2 => "mayc".to_string(),
            3 => "paired".to_string(),
            other => format!("pool{}", other),
        }
    }
}

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
