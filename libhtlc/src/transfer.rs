use crate::amount::TokenAmount;
use crate::hashes::LocksRoot;
use crate::lock::Lock;
use serde::{Deserialize, Serialize};

/// A transfer that adds a new lock to the sender's side of the channel.
///
/// `locksroot` commits to every lock the sender still owes, including `lock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedTransfer {
    pub nonce: u64,
    pub transferred_amount: TokenAmount,
    pub lock: Lock,
    pub locksroot: LocksRoot,
}

impl LockedTransfer {
    pub fn new(nonce: u64, transferred_amount: TokenAmount, lock: Lock, locksroot: LocksRoot) -> Self {
        LockedTransfer { nonce, transferred_amount, lock, locksroot }
    }
}

/// A transfer that carries no lock, only an updated balance and commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectTransfer {
    pub nonce: u64,
    pub transferred_amount: TokenAmount,
    pub locksroot: LocksRoot,
}

impl DirectTransfer {
    pub fn new(nonce: u64, transferred_amount: TokenAmount, locksroot: LocksRoot) -> Self {
        DirectTransfer { nonce, transferred_amount, locksroot }
    }
}

/// The latest transfer accepted from the partner. It is the balance proof handed to the contract when the channel
/// is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transfer {
    Locked(LockedTransfer),
    Direct(DirectTransfer),
}

impl Transfer {
    pub fn nonce(&self) -> u64 {
        match self {
            Transfer::Locked(t) => t.nonce,
            Transfer::Direct(t) => t.nonce,
        }
    }

    pub fn transferred_amount(&self) -> TokenAmount {
        match self {
            Transfer::Locked(t) => t.transferred_amount,
            Transfer::Direct(t) => t.transferred_amount,
        }
    }

    pub fn locksroot(&self) -> LocksRoot {
        match self {
            Transfer::Locked(t) => t.locksroot,
            Transfer::Direct(t) => t.locksroot,
        }
    }
}

impl From<LockedTransfer> for Transfer {
    fn from(t: LockedTransfer) -> Self {
        Transfer::Locked(t)
    }
}

impl From<DirectTransfer> for Transfer {
    fn from(t: DirectTransfer) -> Self {
        Transfer::Direct(t)
    }
}
