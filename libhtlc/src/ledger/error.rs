use crate::hashes::{Hashlock, LocksRoot};
use crate::merkle::MerkleError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("A lock with hashlock {0} is already registered")]
    DuplicateLock(Hashlock),
    #[error("Locksroot mismatch. Expected {expected}, got {got}")]
    LocksRootMismatch { expected: LocksRoot, got: LocksRoot },
    #[error("The direct transfer has an invalid locksroot. Expected {expected}, got {got}")]
    InvalidLocksRoot { expected: LocksRoot, got: LocksRoot },
    #[error("No lock is registered for hashlock {0}")]
    UnknownHashlock(Hashlock),
    #[error("The secret does not hash to {hashlock}")]
    SecretMismatch { hashlock: Hashlock },
    #[error("The total locked amount would overflow")]
    AmountOverflow,
    #[error("This is a bug. {0}")]
    InternalError(String),
}

impl LedgerError {
    pub fn internal(msg: impl Into<String>) -> Self {
        LedgerError::InternalError(msg.into())
    }
}

impl From<MerkleError> for LedgerError {
    fn from(e: MerkleError) -> Self {
        LedgerError::InternalError(format!("Could not build the lock tree: {e}"))
    }
}
