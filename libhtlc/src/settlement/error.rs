use crate::hashes::Hashlock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("The lock could not be decoded: {0}")]
    InvalidLockEncoding(String),
    #[error("The secret does not open hashlock {0}")]
    SecretMismatch(Hashlock),
    #[error("The merkle proof for hashlock {0} does not match the channel's locksroot")]
    InvalidProof(Hashlock),
    #[error("The lock with hashlock {0} was already withdrawn")]
    AlreadyWithdrawn(Hashlock),
    #[error("The amount withdrawn would overflow")]
    AmountOverflow,
}
