//! Domain types for the staking ledger.
//!
//! This module provides:
//! - Exact base-unit arithmetic via the Amount wrapper
//! - Display decimals produced only at the presentation boundary
//! - Domain primitives: Address, PoolId
//! - StakeEvent / LoggedEvent and the raw-log decoder that feeds them
//! - Stable (block, log index) ordering for deterministic folding

pub mod amount;
pub mod decimal;
pub mod event;
pub mod ordering;
pub mod primitives;
pub mod raw_log;

pub use amount::{Amount, AmountError, TOKEN_DECIMALS};
pub use decimal::Decimal;
pub use event::{LoggedEvent, StakeEvent};
pub use ordering::EventOrderingKey;
pub use primitives::{Address, PoolId};
pub use raw_log::{DecodeError, RawStakeLog};
