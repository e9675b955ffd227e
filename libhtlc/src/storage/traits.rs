use crate::ledger::BalanceProof;

pub trait LedgerStore {
    fn write_ledger(&mut self, name: &str, ledger: &BalanceProof) -> Result<(), anyhow::Error>;
    fn load_ledger(&self, name: &str) -> Result<BalanceProof, anyhow::Error>;
}
