//! Pure computation engine for the staking ledger.
//!
//! Ordered events are folded by [`EventReducer`] into a [`StakeLedger`], then
//! [`Aggregator`] derives pool totals, counts and wallet summaries.
//! [`StakeEngine`] ties both together and serves the last pass.

pub mod aggregator;
pub mod ledger;
pub mod reducer;
pub mod stake_engine;

pub use aggregator::{Aggregator, PoolCounts, PoolTotals, StakeSnapshot, TokenStake, WalletSummary};
pub use ledger::{PositionKey, StakeLedger, StakePosition};
pub use reducer::{EventReducer, PairCap};
pub use stake_engine::{EngineError, StakeEngine};
