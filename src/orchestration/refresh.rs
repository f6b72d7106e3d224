use crate::domain::RawStakeLog;
use crate::engine::StakeEngine;
use crate::orchestration::store::EventStore;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, trace, warn};

/// Feeds raw logs into the event store and re-runs a full reduction.
#[derive(Clone)]
pub struct Refresher {
    store: Arc<Mutex<EventStore>>,
    engine: Arc<RwLock<StakeEngine>>,
}

impl Refresher {
    pub fn new(engine: Arc<RwLock<StakeEngine>>) -> Self {
        Self {
            store: Arc::new(Mutex::new(EventStore::new())),
            engine,
        }
    }

    pub fn engine(&self) -> Arc<RwLock<StakeEngine>> {
        self.engine.clone()
    }

    /// Decode and store `logs`, then rebuild the ledger from every stored event.
    ///
    /// Unknown event kinds are filtered; malformed logs are skipped with a
    /// warning. Holding the store lock for the whole call keeps a single writer.
    pub async fn ingest(&self, logs: &[RawStakeLog]) -> IngestResult {
        let mut store = self.store.lock().await;

        let mut result = IngestResult {
            logs_received: logs.len(),
            ..Default::default()
        };

        for log in logs {
            match log.decode() {
                Ok(Some(event)) => {
                    result.events_decoded += 1;
                    if store.insert(event) {
                        result.events_new += 1;
                    }
                }
                Ok(None) => {
                    trace!(
                        "Filtered {:?} log at block {} log {:?}",
                        log.event,
                        log.block_number,
                        log.log_index
                    );
                    result.events_filtered += 1;
                }
                Err(e) => {
                    warn!("Failed to decode staking log: {}", e);
                    result.events_malformed += 1;
                }
            }
        }

        debug!(
            "Ingest: received={} decoded={} new={} filtered={} malformed={}",
            result.logs_received,
            result.events_decoded,
            result.events_new,
            result.events_filtered,
            result.events_malformed
        );

        let mut engine = self.engine.write().await;
        let snapshot = engine.reduce(store.events());

        result.events_total = store.len();
        result.wallets = snapshot.wallets.len();

        info!(
            "Stake ledger rebuilt from {} events ({} wallets)",
            result.events_total, result.wallets
        );

        result
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResult {
    pub logs_received: usize,
    pub events_decoded: usize,
    pub events_new: usize,
    pub events_filtered: usize,
    pub events_malformed: usize,
    pub events_total: usize,
    pub wallets: usize,
}
