use crate::api::AppState;
use crate::domain::{PoolId, RawStakeLog};
use crate::engine::WalletSummary;
use crate::error::AppError;
use crate::orchestration::IngestResult;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsResponse {
    /// Whole-token decimal strings per pool.
    pub pools: BTreeMap<PoolId, String>,
    pub counts: BTreeMap<PoolId, u64>,
}

pub async fn post_events(
    State(state): State<AppState>,
    Json(logs): Json<Vec<RawStakeLog>>,
) -> Json<IngestResult> {
    Json(state.refresher.ingest(&logs).await)
}

pub async fn get_totals(State(state): State<AppState>) -> Result<Json<TotalsResponse>, AppError> {
    let engine = state.engine.read().await;
    let (totals, counts) = engine.totals()?;

    Ok(Json(TotalsResponse {
        pools: totals.to_display(),
        counts: counts.0.clone(),
    }))
}

pub async fn get_wallet(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<WalletSummary>, AppError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(AppError::BadRequest("Invalid wallet address".into()));
    }

    let engine = state.engine.read().await;
    engine
        .wallet_summary(address)?
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No stakes for wallet {}", address)))
}
