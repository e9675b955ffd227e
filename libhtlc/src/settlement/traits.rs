use crate::amount::TokenAmount;
use crate::hashes::LocksRoot;
use crate::ledger::UnlockProof;
use crate::settlement::SettlementError;

/// A closed netting channel that accepts unlock proofs.
pub trait NettingChannel {
    /// The locksroot of the balance proof the channel was closed with.
    fn locksroot(&self) -> LocksRoot;

    /// Releases the locks proven by `unlocks` and returns the amount they were worth.
    fn withdraw(&mut self, unlocks: &[UnlockProof]) -> Result<TokenAmount, SettlementError>;
}
