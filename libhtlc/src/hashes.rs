use crate::error::ReadError;
use hex::{FromHex, FromHexError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// The hash of a secret. Locks are identified by their hashlock until the secret is revealed.
pub type Hashlock = Hash256;

/// A Merkle root over lock hashes, as carried in transfer messages.
pub type LocksRoot = Hash256;

/// Keccak-256 of the given bytes. This is the hash the netting channel contract uses when checking unlock proofs,
/// so every lock hash, hashlock and tree node in this crate is computed with it.
pub fn keccak256<B: AsRef<[u8]>>(data: B) -> Hash256 {
    let digest = Keccak256::digest(data.as_ref());
    let mut result = [0u8; 32];
    result.copy_from_slice(&digest);
    Hash256(result)
}

/// A 256 bit digest.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    /// The all-zero digest. Used as the root of an empty tree.
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    pub const fn new(data: [u8; 32]) -> Self {
        Hash256(data)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Short hex form (first 4 bytes) for log lines.
    pub fn pex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ReadError> {
        let data = <[u8; 32]>::try_from(bytes)
            .map_err(|_| ReadError::new("Hash256", format!("expected 32 bytes, got {}", bytes.len())))?;
        Ok(Hash256(data))
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(data: [u8; 32]) -> Self {
        Hash256(data)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Debug for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash256({})", hex::encode(self.0))
    }
}

impl FromHex for Hash256 {
    type Error = FromHexError;

    fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self, Self::Error> {
        let mut data = [0u8; 32];
        hex::decode_to_slice(hex, &mut data)?;
        Ok(Hash256(data))
    }
}

impl FromStr for Hash256 {
    type Err = ReadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        Hash256::from_hex(s).map_err(|e| ReadError::new("Hash256", format!("Invalid hex string: {e}")))
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        hex::encode(self.0).serialize(s)
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(de)?;
        let mut data = [0u8; 32];
        hex::decode_to_slice(&hex_str, &mut data)
            .map_err(|e| serde::de::Error::custom(format!("Invalid hex string: {e}")))?;
        Ok(Hash256(data))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keccak_of_empty_input() {
        // Keccak-256, not NIST SHA3-256
        let expected = "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470";
        assert_eq!(keccak256(b"").to_string(), expected);
    }

    #[test]
    fn hex_parsing() {
        let h = keccak256(b"locksroot");
        let parsed: Hash256 = h.to_string().parse().unwrap();
        assert_eq!(parsed, h);
        let prefixed: Hash256 = format!("0x{h}").parse().unwrap();
        assert_eq!(prefixed, h);
        assert!("abcd".parse::<Hash256>().is_err());
    }

    #[test]
    fn hex_encoding_matches_display() {
        use hex::ToHex;
        let h = keccak256(b"hashlock");
        assert_eq!(h.encode_hex::<String>(), h.to_string());
        assert_eq!(h.encode_hex_upper::<String>(), h.to_string().to_uppercase());
        assert_eq!(Hash256::from_hex(h.encode_hex::<String>()).unwrap(), h);
    }

    #[test]
    fn serializes_as_hex_string() {
        let h = Hash256::new([0xab; 32]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        let back: Hash256 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn pex_is_short() {
        let h = Hash256::new([0x12; 32]);
        assert_eq!(h.pex(), "12121212");
        assert!(Hash256::ZERO.is_zero());
        assert!(Hash256::from_slice(&[0u8; 31]).is_err());
    }
}
