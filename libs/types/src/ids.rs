//! Identifier types for vault entities
//!
//! Addresses and digests are fixed-width byte arrays rendered as
//! `0x`-prefixed lower-case hex. Deposit identifiers are never random:
//! they are derived from the deposit's immutable parameters.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::TypeError;

/// Quantity of an asset in base units.
pub type Amount = u128;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], TypeError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| TypeError::InvalidLength {
        expected: N,
        actual,
    })
}

/// Account address (20 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<20>(s).map(Self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 32-byte digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash32([u8; 32]);

impl Hash32 {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 8 bytes as hex, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl From<[u8; 32]> for Hash32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Hash32 {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<32>(s).map(Self)
    }
}

impl Serialize for Hash32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Unique identifier for a deposit
///
/// Derived from (depositor, asset, amount, passphrase commitment, unlock time);
/// the public handle for every later operation on the deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepositId(Hash32);

impl DepositId {
    pub fn from_hash(hash: Hash32) -> Self {
        Self(hash)
    }

    pub fn as_hash(&self) -> &Hash32 {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn short(&self) -> String {
        self.0.short()
    }
}

impl fmt::Display for DepositId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DepositId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Fungible unit held by a deposit
///
/// `Native` is the sentinel for the chain's native currency; it occupies the
/// zero address in identifier derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    Native,
    Token(Address),
}

impl Asset {
    /// Address used when encoding this asset.
    pub fn address(&self) -> Address {
        match self {
            Asset::Native => Address::ZERO,
            Asset::Token(token) => *token,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Token(token) => write!(f, "{}", token),
        }
    }
}

impl FromStr for Asset {
    type Err = TypeError;

    /// Accepts `native` or a token address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("native") {
            return Ok(Asset::Native);
        }
        s.parse().map(Asset::Token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display_and_parse() {
        let addr = Address::from_bytes([0xab; 20]);
        let text = addr.to_string();
        assert_eq!(text, format!("0x{}", "ab".repeat(20)));
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn test_address_parse_without_prefix() {
        let addr: Address = "11".repeat(20).parse().unwrap();
        assert_eq!(addr, Address::from_bytes([0x11; 20]));
    }

    #[test]
    fn test_address_wrong_length() {
        let result = "0x1234".parse::<Address>();
        assert_eq!(
            result,
            Err(TypeError::InvalidLength {
                expected: 20,
                actual: 2
            })
        );
    }

    #[test]
    fn test_address_bad_hex() {
        let result = "0xzz".parse::<Address>();
        assert!(matches!(result, Err(TypeError::InvalidHex(_))));
    }

    #[test]
    fn test_address_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_bytes([1; 20]).is_zero());
    }

    #[test]
    fn test_address_serializes_as_hex_string() {
        let addr = Address::from_bytes([0x01; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(20)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_deposit_id_parse() {
        let id = DepositId::from_hash(Hash32::from_bytes([7; 32]));
        let parsed: DepositId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.short(), "0707070707070707");
    }

    #[test]
    fn test_asset_encoding_address() {
        let token = Address::from_bytes([9; 20]);
        assert_eq!(Asset::Native.address(), Address::ZERO);
        assert_eq!(Asset::Token(token).address(), token);
    }

    #[test]
    fn test_asset_from_str() {
        assert_eq!("native".parse::<Asset>().unwrap(), Asset::Native);
        assert_eq!("NATIVE".parse::<Asset>().unwrap(), Asset::Native);
        let token = Address::from_bytes([2; 20]);
        assert_eq!(token.to_string().parse::<Asset>().unwrap(), Asset::Token(token));
    }

    #[test]
    fn test_asset_serialization() {
        let json = serde_json::to_string(&Asset::Native).unwrap();
        assert_eq!(json, "\"native\"");
        let token = Asset::Token(Address::from_bytes([3; 20]));
        let json = serde_json::to_string(&token).unwrap();
        let back: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
