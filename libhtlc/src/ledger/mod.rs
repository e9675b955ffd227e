//! The balance proof kept for one side of a channel.
//!
//! [`BalanceProof`] tracks the locks the partner owes us, checks every incoming transfer against its own view of
//! the locksroot and builds the unlock proofs used to claim locked funds on-chain.
//!
//! Every mutating call validates first and only then touches state, so a rejected transfer or secret leaves the
//! ledger exactly as it was. The ledger does no I/O and is not synchronised; callers must serialise access to a
//! single instance.

mod error;
mod state;

pub use error::LedgerError;
pub use state::{LockState, LockStatus, SecretRegistration, TrackedLock, UnlockProof};

use crate::amount::TokenAmount;
use crate::hashes::{keccak256, Hash256, Hashlock, LocksRoot};
use crate::lock::{HashedLock, Lock};
use crate::merkle::{merkleroot, MerkleTree};
use crate::secret::Secret;
use crate::transfer::{DirectTransfer, LockedTransfer, Transfer};
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The state required to settle a netting channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceProof {
    locks: BTreeMap<Hashlock, TrackedLock>,
    /// The latest transfer with a correct locksroot. This is the balance proof used when closing the channel.
    transfer: Option<Transfer>,
}

impl BalanceProof {
    pub fn new() -> Self {
        BalanceProof::default()
    }

    /// True if the secret for `hashlock` is not known.
    pub fn is_pending(&self, hashlock: &Hashlock) -> bool {
        self.status(hashlock) == Some(LockStatus::Pending)
    }

    /// True if the lock has not been released yet, whether or not its secret is known.
    pub fn is_unclaimed(&self, hashlock: &Hashlock) -> bool {
        self.locks.get(hashlock).is_some_and(|t| t.state.is_active())
    }

    /// True if a lock with this hashlock was registered and has not been discarded.
    pub fn is_known(&self, hashlock: &Hashlock) -> bool {
        self.locks.contains_key(hashlock)
    }

    pub fn status(&self, hashlock: &Hashlock) -> Option<LockStatus> {
        self.locks.get(hashlock).map(TrackedLock::status)
    }

    pub fn state_of(&self, hashlock: &Hashlock) -> Result<LockStatus, LedgerError> {
        self.status(hashlock).ok_or(LedgerError::UnknownHashlock(*hashlock))
    }

    /// Sum of the pending and unclaimed lock amounts.
    pub fn locked_amount(&self) -> TokenAmount {
        self.active_locks().fold(TokenAmount::ZERO, |acc, t| acc.saturating_add(t.lock.lock().amount))
    }

    pub fn lock_for(&self, hashlock: &Hashlock) -> Result<&Lock, LedgerError> {
        self.locks.get(hashlock).map(|t| t.lock.lock()).ok_or(LedgerError::UnknownHashlock(*hashlock))
    }

    /// The locks currently in the given state.
    pub fn locks_with_status(&self, status: LockStatus) -> impl Iterator<Item = &HashedLock> + '_ {
        self.locks.values().filter(move |t| t.status() == status).map(TrackedLock::lock)
    }

    pub fn authoritative_transfer(&self) -> Option<&Transfer> {
        self.transfer.as_ref()
    }

    /// The transferred amount of the latest accepted transfer, zero before the first one.
    pub fn transferred_amount(&self) -> TokenAmount {
        self.transfer.as_ref().map(Transfer::transferred_amount).unwrap_or_default()
    }

    pub fn nonce(&self) -> Option<u64> {
        self.transfer.as_ref().map(Transfer::nonce)
    }

    /// Lock hashes of the pending locks followed by the unclaimed ones.
    pub fn unclaimed_leaves(&self) -> Vec<Hash256> {
        self.leaves_for(&[LockStatus::Pending, LockStatus::Unclaimed])
    }

    /// The locksroot the partner's next transfer must carry (before any new lock is added).
    pub fn commitment_root_unclaimed(&self) -> Result<LocksRoot, LedgerError> {
        Ok(merkleroot(self.unclaimed_leaves())?)
    }

    /// The tree over every known lock, including unlocked ones. Unlock proofs are made against this tree.
    pub fn generate_merkle_tree(&self) -> Result<MerkleTree, LedgerError> {
        let leaves = self.leaves_for(&[LockStatus::Pending, LockStatus::Unclaimed, LockStatus::Unlocked]);
        Ok(MerkleTree::new(leaves)?)
    }

    /// Accepts a locked transfer from the partner.
    ///
    /// The transfer's locksroot must equal the root over the current unclaimed locks plus the new lock. On success
    /// the lock becomes pending, the transfer becomes the authoritative one and unlocked locks are dropped.
    pub fn register_locked_transfer(&mut self, transfer: LockedTransfer) -> Result<(), LedgerError> {
        let lock = HashedLock::new(transfer.lock);
        let hashlock = lock.hashlock();
        if self.is_known(&hashlock) {
            warn!("Rejecting locked transfer: hashlock {} is already registered", hashlock.pex());
            return Err(LedgerError::DuplicateLock(hashlock));
        }
        self.locked_amount().checked_add(lock.lock().amount).ok_or(LedgerError::AmountOverflow)?;

        let mut leaves = self.unclaimed_leaves();
        leaves.push(lock.lock_hash());
        let expected = merkleroot(leaves)?;
        if transfer.locksroot != expected {
            warn!(
                "Rejecting locked transfer: locksroot mismatch expected:{} got:{}",
                expected.pex(),
                transfer.locksroot.pex()
            );
            return Err(LedgerError::LocksRootMismatch { expected, got: transfer.locksroot });
        }

        self.drop_unlocked();
        self.locks.insert(hashlock, TrackedLock::pending(lock));
        debug!("Locked transfer accepted. nonce:{} hashlock:{}", transfer.nonce, hashlock.pex());
        self.transfer = Some(Transfer::Locked(transfer));
        Ok(())
    }

    /// Accepts a direct transfer from the partner. Its locksroot must equal [`Self::commitment_root_unclaimed`].
    pub fn register_direct_transfer(&mut self, transfer: DirectTransfer) -> Result<(), LedgerError> {
        let expected = self.commitment_root_unclaimed()?;
        if transfer.locksroot != expected {
            warn!(
                "Rejecting direct transfer: invalid locksroot expected:{} got:{}",
                expected.pex(),
                transfer.locksroot.pex()
            );
            return Err(LedgerError::InvalidLocksRoot { expected, got: transfer.locksroot });
        }
        self.drop_unlocked();
        debug!("Direct transfer accepted. nonce:{}", transfer.nonce);
        self.transfer = Some(Transfer::Direct(transfer));
        Ok(())
    }

    /// Records a secret learned for one of our locks. See [`Self::register_secret_for`].
    pub fn register_secret(&mut self, secret: &Secret) -> Result<SecretRegistration, LedgerError> {
        self.register_secret_for(secret, &secret.hashlock())
    }

    /// Records the secret for `hashlock`, moving a pending lock to unclaimed.
    ///
    /// Registering a secret that is already known is not an error; it is reported as
    /// [`SecretRegistration::AlreadyRegistered`] and leaves the ledger unchanged.
    pub fn register_secret_for(
        &mut self,
        secret: &Secret,
        hashlock: &Hashlock,
    ) -> Result<SecretRegistration, LedgerError> {
        let tracked = self.locks.get_mut(hashlock).ok_or(LedgerError::UnknownHashlock(*hashlock))?;
        if secret.hashlock() != *hashlock {
            return Err(LedgerError::SecretMismatch { hashlock: *hashlock });
        }
        match tracked.state {
            LockState::Pending => {
                tracked.state = LockState::Unclaimed { secret: secret.clone() };
                debug!("Secret registered. hashlock:{} is now unclaimed", hashlock.pex());
                Ok(SecretRegistration::Revealed)
            }
            _ => {
                let status = tracked.status();
                debug!("SECRET REGISTERED MORE THAN ONCE hashlock:{} status:{status}", hashlock.pex());
                Ok(SecretRegistration::AlreadyRegistered(status))
            }
        }
    }

    /// Releases the lock opened by `secret`. See [`Self::release_lock_for`].
    pub fn release_lock_by_secret(&mut self, secret: &Secret) -> Result<Lock, LedgerError> {
        self.release_lock_for(secret, &secret.hashlock())
    }

    /// Moves a pending or unclaimed lock to unlocked and returns it.
    ///
    /// Releasing a lock that is already unlocked fails with [`LedgerError::UnknownHashlock`].
    pub fn release_lock_for(&mut self, secret: &Secret, hashlock: &Hashlock) -> Result<Lock, LedgerError> {
        let tracked = self
            .locks
            .get_mut(hashlock)
            .filter(|t| t.state.is_active())
            .ok_or(LedgerError::UnknownHashlock(*hashlock))?;
        if secret.hashlock() != *hashlock {
            return Err(LedgerError::SecretMismatch { hashlock: *hashlock });
        }
        let secret = tracked.state.secret().cloned().unwrap_or_else(|| secret.clone());
        debug!("Releasing lock. hashlock:{} was {}", hashlock.pex(), tracked.status());
        tracked.state = LockState::Unlocked { secret };
        Ok(*tracked.lock.lock())
    }

    /// Unlock proofs for every lock whose secret is known, unclaimed locks first.
    ///
    /// A single tree over all known locks is built and shared by every proof.
    pub fn known_unlocks(&self) -> Result<Vec<UnlockProof>, LedgerError> {
        let tree = self.generate_merkle_tree()?;
        let unclaimed = self.locks.values().filter(|t| t.status() == LockStatus::Unclaimed);
        let unlocked = self.locks.values().filter(|t| t.status() == LockStatus::Unlocked);
        unclaimed
            .chain(unlocked)
            .filter_map(|t| t.state.secret().map(|secret| (secret, t.lock.lock())))
            .map(|(secret, lock)| self.compute_proof_for_lock(secret, lock, Some(&tree)))
            .collect()
    }

    /// Builds the unlock proof for `lock`, using `tree` if given or a fresh tree over all known locks otherwise.
    pub fn compute_proof_for_lock(
        &self,
        secret: &Secret,
        lock: &Lock,
        tree: Option<&MerkleTree>,
    ) -> Result<UnlockProof, LedgerError> {
        let fresh;
        let tree = match tree {
            Some(tree) => tree,
            None => {
                fresh = self.generate_merkle_tree()?;
                &fresh
            }
        };
        let lock_encoded = lock.as_bytes().to_vec();
        let lock_hash = keccak256(&lock_encoded);
        let merkle_proof = tree.make_proof(&lock_hash).ok_or_else(|| {
            error!("Lock {} is missing from the lock tree. The ledger is inconsistent", lock.hashlock.pex());
            LedgerError::internal(format!("lock {lock} is not in the lock tree"))
        })?;
        Ok(UnlockProof { merkle_proof, lock_encoded, secret: secret.clone() })
    }

    fn active_locks(&self) -> impl Iterator<Item = &TrackedLock> + '_ {
        self.locks.values().filter(|t| t.state.is_active())
    }

    fn leaves_for(&self, statuses: &[LockStatus]) -> Vec<Hash256> {
        statuses.iter().flat_map(|status| self.locks_with_status(*status).map(HashedLock::lock_hash)).collect()
    }

    fn drop_unlocked(&mut self) {
        self.locks.retain(|_, t| t.state.is_active());
    }
}
