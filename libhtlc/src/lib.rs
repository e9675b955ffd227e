//! Balance proofs for hash-time-locked payment channels.
//!
//! [`ledger::BalanceProof`] holds one side's view of a channel: the locks the partner owes, the latest accepted
//! transfer and the secrets learned so far. It checks every incoming transfer's locksroot against its own Merkle
//! tree of locks and produces the [`ledger::UnlockProof`]s handed to the netting channel contract at settlement.

pub mod amount;
pub mod config;
pub mod error;
pub mod hashes;
pub mod ledger;
pub mod lock;
pub mod merkle;
pub mod secret;
pub mod settlement;
pub mod storage;
pub mod transfer;


pub use amount::TokenAmount;
pub use hashes::{keccak256, Hash256, Hashlock, LocksRoot};
pub use ledger::{BalanceProof, LedgerError, UnlockProof};
pub use lock::Lock;
pub use secret::Secret;
