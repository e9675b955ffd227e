//! The on-chain side of settlement, as seen from the ledger.
//!
//! Contract calls are made elsewhere; this module only fixes the interface the ledger's unlock proofs are handed to.

pub mod dummy_impl;
mod error;
mod traits;

pub use dummy_impl::DummyNettingChannel;
pub use error::SettlementError;
pub use traits::NettingChannel;
