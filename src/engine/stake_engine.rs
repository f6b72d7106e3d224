use crate::domain::StakeEvent;
use thiserror::Error;
use tracing::info;

use super::{
    Aggregator, EventReducer, PairCap, PoolCounts, PoolTotals, StakeLedger, StakeSnapshot,
    WalletSummary,
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Stake data not yet computed; run a reduction first")]
    NotReady,
}

/// Result of the most recent reduction pass.
#[derive(Debug, Clone)]
struct Pass {
    ledger: StakeLedger,
    snapshot: StakeSnapshot,
}

/// Folds ordered events into a ledger and serves the derived figures.
///
/// Each `reduce` rebuilds everything from scratch. Callers serialize writers;
/// readers of the last snapshot may share the engine.
#[derive(Debug, Clone, Default)]
pub struct StakeEngine {
    reducer: EventReducer,
    last: Option<Pass>,
}

impl StakeEngine {
    pub fn new(pair_cap: PairCap) -> Self {
        Self {
            reducer: EventReducer::new(pair_cap),
            last: None,
        }
    }

    /// Run a full fold plus aggregation over `events`.
    ///
    /// Deterministic for the same ordered input. Any ordered input produces
    /// a snapshot; there is no failure mode.
    pub fn reduce<'a, I>(&mut self, events: I) -> &StakeSnapshot
    where
        I: IntoIterator<Item = &'a StakeEvent>,
    {
        let mut applied = 0usize;
        let ledger = self.reducer.fold(events.into_iter().inspect(|_| applied += 1));
        let snapshot = Aggregator::aggregate(&ledger);

        info!(
            "Reduced {} events into {} positions across {} wallets",
            applied,
            ledger.len(),
            ledger.wallet_count()
        );

        let pass = self.last.insert(Pass { ledger, snapshot });
        &pass.snapshot
    }

    /// Global pool figures of the last pass.
    pub fn totals(&self) -> Result<(&PoolTotals, &PoolCounts), EngineError> {
        let pass = self.last.as_ref().ok_or(EngineError::NotReady)?;
        Ok((&pass.snapshot.totals, &pass.snapshot.counts))
    }

    /// Summary for `address`, matched case-insensitively.
    ///
    /// `Ok(None)` when the wallet never appeared in the ledger.
    pub fn wallet_summary(&self, address: &str) -> Result<Option<&WalletSummary>, EngineError> {
        let pass = self.last.as_ref().ok_or(EngineError::NotReady)?;
        Ok(pass
            .snapshot
            .wallets
            .iter()
            .find(|w| w.address.matches(address)))
    }

    pub fn snapshot(&self) -> Result<&StakeSnapshot, EngineError> {
        self.last
            .as_ref()
            .map(|p| &p.snapshot)
            .ok_or(EngineError::NotReady)
    }

    pub fn ledger(&self) -> Result<&StakeLedger, EngineError> {
        self.last
            .as_ref()
            .map(|p| &p.ledger)
            .ok_or(EngineError::NotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.last.is_some()
    }

    pub fn pair_cap(&self) -> &PairCap {
        self.reducer.pair_cap()
    }
}
