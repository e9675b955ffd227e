use crate::amount::TokenAmount;
use crate::error::ReadError;
use crate::hashes::{keccak256, Hash256, Hashlock};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::{Read, Write};

/// Length of the canonical lock encoding.
pub const LOCK_ENCODED_LEN: usize = 72;

/// A hash-time lock.
///
/// The canonical encoding is fixed by the netting channel contract and must not change:
///
/// | bytes   | field        | encoding                  |
/// |---------|--------------|---------------------------|
/// | 0..8    | `expiration` | u64, big-endian           |
/// | 8..40   | `amount`     | 256-bit word, big-endian  |
/// | 40..72  | `hashlock`   | raw 32 bytes              |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lock {
    pub amount: TokenAmount,
    /// Block height after which the lock can no longer be claimed.
    pub expiration: u64,
    pub hashlock: Hashlock,
}

impl Lock {
    pub fn new<A: Into<TokenAmount>>(amount: A, expiration: u64, hashlock: Hashlock) -> Self {
        Lock { amount: amount.into(), expiration, hashlock }
    }

    pub fn as_bytes(&self) -> [u8; LOCK_ENCODED_LEN] {
        let mut result = [0u8; LOCK_ENCODED_LEN];
        result[..8].copy_from_slice(&self.expiration.to_be_bytes());
        result[8..40].copy_from_slice(&self.amount.to_be_word());
        result[40..].copy_from_slice(self.hashlock.as_bytes());
        result
    }

    /// `keccak256` of the canonical encoding. This is the Merkle leaf for the lock.
    pub fn lock_hash(&self) -> Hash256 {
        keccak256(self.as_bytes())
    }

    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.as_bytes())
    }

    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self, ReadError> {
        let mut expiration = [0u8; 8];
        reader.read_exact(&mut expiration).map_err(|e| ReadError::new("expiration", e.to_string()))?;
        let mut amount = [0u8; 32];
        reader.read_exact(&mut amount).map_err(|e| ReadError::new("amount", e.to_string()))?;
        let mut hashlock = [0u8; 32];
        reader.read_exact(&mut hashlock).map_err(|e| ReadError::new("hashlock", e.to_string()))?;
        let amount =
            TokenAmount::from_be_word(&amount).ok_or_else(|| ReadError::new("amount", "Amount exceeds 128 bits"))?;
        Ok(Lock { amount, expiration: u64::from_be_bytes(expiration), hashlock: Hash256::new(hashlock) })
    }

    /// Decodes a lock from exactly [`LOCK_ENCODED_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReadError> {
        if bytes.len() != LOCK_ENCODED_LEN {
            return Err(ReadError::new("Lock", format!("expected {LOCK_ENCODED_LEN} bytes, got {}", bytes.len())));
        }
        let mut reader = bytes;
        Lock::read(&mut reader)
    }
}

impl Display for Lock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lock({} until block {}, hashlock {})", self.amount, self.expiration, self.hashlock.pex())
    }
}

/// A lock together with its cached lock hash.
///
/// The hash is computed once when the lock is first seen and reused for every tree built afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedLock {
    lock: Lock,
    lock_hash: Hash256,
}

impl HashedLock {
    pub fn new(lock: Lock) -> Self {
        let lock_hash = lock.lock_hash();
        HashedLock { lock, lock_hash }
    }

    pub fn lock(&self) -> &Lock {
        &self.lock
    }

    pub fn lock_hash(&self) -> Hash256 {
        self.lock_hash
    }

    pub fn hashlock(&self) -> Hashlock {
        self.lock.hashlock
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_lock() -> Lock {
        Lock::new(10u64, 0x0102_0304, keccak256(b"secret"))
    }

    #[test]
    fn canonical_layout() {
        let lock = sample_lock();
        let bytes = lock.as_bytes();
        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 1, 2, 3, 4]);
        assert!(bytes[8..39].iter().all(|b| *b == 0));
        assert_eq!(bytes[39], 10);
        assert_eq!(&bytes[40..], lock.hashlock.as_bytes());
    }

    #[test]
    fn decode_encoded_lock() {
        let lock = sample_lock();
        let decoded = Lock::from_bytes(&lock.as_bytes()).unwrap();
        assert_eq!(decoded, lock);

        let mut written = Vec::new();
        lock.write(&mut written).unwrap();
        assert_eq!(written.as_slice(), &lock.as_bytes()[..]);
    }

    #[test]
    fn decode_rejects_bad_input() {
        let lock = sample_lock();
        let bytes = lock.as_bytes();
        let err = Lock::from_bytes(&bytes[..71]).unwrap_err();
        assert_eq!(err.field(), "Lock");

        let mut short = &bytes[..20];
        let err = Lock::read(&mut short).unwrap_err();
        assert_eq!(err.field(), "amount");

        let mut huge = bytes;
        huge[8] = 0xff;
        let err = Lock::from_bytes(&huge).unwrap_err();
        assert_eq!(err.field(), "amount");
    }

    #[test]
    fn hashed_lock_caches_hash() {
        let lock = sample_lock();
        let hashed = HashedLock::new(lock);
        assert_eq!(hashed.lock_hash(), keccak256(lock.as_bytes()));
        assert_eq!(hashed.hashlock(), lock.hashlock);
        assert_eq!(hashed.lock(), &lock);
    }
}
