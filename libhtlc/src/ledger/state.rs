use crate::lock::{HashedLock, Lock};
use crate::merkle::MerkleProof;
use crate::secret::Secret;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Where a lock is in its life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockState {
    /// The secret is unknown.
    Pending,
    /// We know the secret, but the partner's latest transfer still includes the lock.
    Unclaimed { secret: Secret },
    /// The lock has been released. Kept only until the next transfer is accepted.
    Unlocked { secret: Secret },
}

impl LockState {
    pub fn status(&self) -> LockStatus {
        match self {
            LockState::Pending => LockStatus::Pending,
            LockState::Unclaimed { .. } => LockStatus::Unclaimed,
            LockState::Unlocked { .. } => LockStatus::Unlocked,
        }
    }

    pub fn secret(&self) -> Option<&Secret> {
        match self {
            LockState::Pending => None,
            LockState::Unclaimed { secret } | LockState::Unlocked { secret } => Some(secret),
        }
    }

    /// Pending and unclaimed locks are part of the locksroot and count towards the locked amount.
    pub fn is_active(&self) -> bool {
        !matches!(self, LockState::Unlocked { .. })
    }
}

/// [`LockState`] without the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockStatus {
    Pending,
    Unclaimed,
    Unlocked,
}

impl Display for LockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockStatus::Pending => write!(f, "Pending"),
            LockStatus::Unclaimed => write!(f, "Unclaimed"),
            LockStatus::Unlocked => write!(f, "Unlocked"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedLock {
    pub(crate) lock: HashedLock,
    pub(crate) state: LockState,
}

impl TrackedLock {
    pub fn pending(lock: HashedLock) -> Self {
        TrackedLock { lock, state: LockState::Pending }
    }

    pub fn lock(&self) -> &HashedLock {
        &self.lock
    }

    pub fn status(&self) -> LockStatus {
        self.state.status()
    }
}

/// The outcome of registering a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretRegistration {
    /// The lock was pending and is now unclaimed.
    Revealed,
    /// The secret was already known. Nothing changed.
    AlreadyRegistered(LockStatus),
}

/// Everything the netting channel contract needs to release a lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockProof {
    pub merkle_proof: MerkleProof,
    /// The canonical encoding of the lock, see [`Lock::as_bytes`].
    pub lock_encoded: Vec<u8>,
    pub secret: Secret,
}

impl UnlockProof {
    pub fn lock(&self) -> Result<Lock, crate::error::ReadError> {
        Lock::from_bytes(&self.lock_encoded)
    }
}
