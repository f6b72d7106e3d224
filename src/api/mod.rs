pub mod health;
pub mod stakes;

use crate::engine::StakeEngine;
use crate::orchestration::Refresher;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<StakeEngine>>,
    pub refresher: Refresher,
}

impl AppState {
    pub fn new(engine: StakeEngine) -> Self {
        let engine = Arc::new(RwLock::new(engine));
        let refresher = Refresher::new(engine.clone());
        Self { engine, refresher }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/stakes/events", post(stakes::post_events))
        .route("/v1/stakes/totals", get(stakes::get_totals))
        .route("/v1/stakes/wallets/:address", get(stakes::get_wallet))
        .layer(cors)
        .with_state(state)
}
