use crate::amount::TokenAmount;
use crate::hashes::{keccak256, Hashlock, LocksRoot};
use crate::ledger::UnlockProof;
use crate::lock::Lock;
use crate::merkle::verify_proof;
use crate::settlement::{NettingChannel, SettlementError};
use crate::transfer::Transfer;
use log::*;
use std::collections::HashSet;

/// An in-memory netting channel that checks unlock proofs the way the contract does.
///
/// A batch of unlocks is applied only if every proof in it is valid.
#[derive(Debug, Clone)]
pub struct DummyNettingChannel {
    locksroot: LocksRoot,
    withdrawn: HashSet<Hashlock>,
    released: TokenAmount,
}

impl DummyNettingChannel {
    pub fn new(locksroot: LocksRoot) -> Self {
        DummyNettingChannel { locksroot, withdrawn: HashSet::new(), released: TokenAmount::ZERO }
    }

    /// A channel closed with the given balance proof.
    pub fn closed_with(transfer: &Transfer) -> Self {
        DummyNettingChannel::new(transfer.locksroot())
    }

    pub fn released(&self) -> TokenAmount {
        self.released
    }

    pub fn is_withdrawn(&self, hashlock: &Hashlock) -> bool {
        self.withdrawn.contains(hashlock)
    }

    fn check_unlock(&self, unlock: &UnlockProof) -> Result<Lock, SettlementError> {
        let lock = unlock.lock().map_err(|e| SettlementError::InvalidLockEncoding(e.to_string()))?;
        if unlock.secret.hashlock() != lock.hashlock {
            return Err(SettlementError::SecretMismatch(lock.hashlock));
        }
        if self.withdrawn.contains(&lock.hashlock) {
            return Err(SettlementError::AlreadyWithdrawn(lock.hashlock));
        }
        let leaf = keccak256(&unlock.lock_encoded);
        if !verify_proof(&unlock.merkle_proof, &self.locksroot, &leaf) {
            return Err(SettlementError::InvalidProof(lock.hashlock));
        }
        Ok(lock)
    }
}

impl NettingChannel for DummyNettingChannel {
    fn locksroot(&self) -> LocksRoot {
        self.locksroot
    }

    fn withdraw(&mut self, unlocks: &[UnlockProof]) -> Result<TokenAmount, SettlementError> {
        let mut batch = HashSet::new();
        let mut amount = TokenAmount::ZERO;
        for unlock in unlocks {
            let lock = self.check_unlock(unlock)?;
            if !batch.insert(lock.hashlock) {
                return Err(SettlementError::AlreadyWithdrawn(lock.hashlock));
            }
            amount = amount.checked_add(lock.amount).ok_or(SettlementError::AmountOverflow)?;
        }
        let released = self.released.checked_add(amount).ok_or(SettlementError::AmountOverflow)?;
        self.withdrawn.extend(batch);
        self.released = released;
        debug!("Withdrew {} locks worth {amount}", unlocks.len());
        Ok(amount)
    }
}
