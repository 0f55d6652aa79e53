//! Ledger client and mint orchestration

mod ledger;
mod orchestrator;

pub use ledger::*;
pub use orchestrator::*;
