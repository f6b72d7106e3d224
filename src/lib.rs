pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::Config;
pub use domain::{
    Address, Amount, AmountError, Decimal, LoggedEvent, PoolId, RawStakeLog, StakeEvent,
};
pub use engine::{
    EngineError, PairCap, PoolCounts, PoolTotals, StakeEngine, StakeSnapshot, WalletSummary,
};
pub use error::AppError;
