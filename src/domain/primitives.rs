//! Domain primitives: Address, PoolId, BlockRef.

use serde::{Deserialize, Serialize};

/// Wallet or contract address (hex string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Create an Address from a string.
    pub fn new(addr: impl Into<String>) -> Self {
        Address(addr.into())
    }

    /// Get the address as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a Hyperdrive pool instance (its contract address).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolId(pub String);

impl PoolId {
    /// Create a PoolId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        PoolId(id.into())
    }

    /// Get the pool id as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot reference: a specific block number or the chain head.
///
/// All reads within one computation use the same BlockRef so the snapshot
/// is consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockRef {
    /// The latest block known to the state reader.
    Latest,
    /// A specific block number.
    Number(u64),
}

impl std::fmt::Display for BlockRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockRef::Latest => write!(f, "latest"),
            BlockRef::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Serde helper: (de)serialize `num_bigint::BigUint` as a decimal string.
///
/// The default num-bigint serde representation is an internal digit vector;
/// reports want the human-readable integer form.
pub mod biguint_string {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &BigUint, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(d)?;
        s.parse::<BigUint>()
            .map_err(|e| de::Error::custom(format!("invalid integer {:?}: {}", s, e)))
    }
}
