use crate::hashes::{keccak256, Hashlock};
use hex::FromHex;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The 32-byte preimage of a hashlock.
///
/// Revealing the secret is what makes a lock claimable, so it is wiped from memory when dropped and its `Debug`
/// output only shows the hashlock it opens.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Secret([u8; 32]);

impl Secret {
    pub fn new(data: [u8; 32]) -> Self {
        Secret(data)
    }

    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut data = [0u8; 32];
        rng.fill_bytes(&mut data);
        Secret(data)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `keccak256(secret)`
    pub fn hashlock(&self) -> Hashlock {
        keccak256(self.0)
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret(hashlock: {})", self.hashlock().pex())
    }
}

impl AsRef<[u8]> for Secret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        hex::encode(self.0).serialize(s)
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(de)?;
        let data = <[u8; 32]>::from_hex(&hex_str)
            .map_err(|e| serde::de::Error::custom(format!("Invalid hex string: {e}")))?;
        Ok(Secret(data))
    }
}
