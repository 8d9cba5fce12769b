use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use ledger_core::Transfer;
use serde::{Deserialize, Serialize};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::service::{ChainSnapshot, LedgerService};

#[derive(Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub service: String,
}

#[derive(Serialize, Deserialize)]
pub struct TransferResponse {
    pub message: String,
    pub from: String,
    pub to: String,
    pub amount: u64,
    pub block_index: u64,
}

#[derive(Serialize, Deserialize)]
pub struct Balance {
    pub address: String,
    pub balance: i64,
}

pub fn router(service: LedgerService) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .route("/transfer", post(transfer))
        .route("/chain", get(chain))
        .route("/balance/{address}", get(balance));
    with_middleware(routes).with_state(service)
}

fn with_middleware<S>(routes: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    routes
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy".to_string(),
        service: "ledger-node".to_string(),
    })
}

async fn transfer(
    State(service): State<LedgerService>,
    body: Result<Json<Transfer>, JsonRejection>,
) -> Result<Json<TransferResponse>, ApiError> {
    let Json(transfer) = body.map_err(|_| ApiError::BadRequest("Invalid request format".into()))?;
    let block_index = service.transfer(&transfer).await?;
    Ok(Json(TransferResponse {
        message: "Transfer completed successfully".to_string(),
        from: transfer.from,
        to: transfer.to,
        amount: transfer.amount,
        block_index,
    }))
}

async fn chain(State(service): State<LedgerService>) -> Json<ChainSnapshot> {
    Json(service.snapshot().await)
}

async fn balance(
    State(service): State<LedgerService>,
    Path(address): Path<String>,
) -> Json<Balance> {
    let balance = service.balance(&address).await;
    Json(Balance { address, balance })
}
