//! Background workers.
//!
//! The balance worker runs Monte Carlo jobs on the blocking pool so a
//! session loop never stalls on a full sweep.

mod balance;

pub use balance::{BalanceCommand, BalanceWorker, BalanceWorkerHandle};
