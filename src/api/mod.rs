//! REST API over a running grid.
//!
//! Routes, all under `/energia`:
//! - `POST /simular` starts the simulation (idempotent)
//! - `GET /estado` returns the current snapshot
//! - `POST /renovable?tipo=<kind>&capacidad=<int>` registers a renewable source

mod handlers;
mod types;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::sim::SimulationManager;

pub use types::{ApiError, ErrorResponse, RenewableQuery, StartResponse};

/// Application state shared across all request handlers.
///
/// The manager synchronises internally, so no extra lock is needed here.
pub type AppState = Arc<SimulationManager>;

/// Builds the axum router with all API routes.
pub fn router(state: AppState) -> Router {
    let energia = Router::new()
        .route("/simular", post(handlers::start_simulation))
        .route("/estado", get(handlers::get_state))
        .route("/renovable", post(handlers::add_renewable));
    Router::new().nest("/energia", energia).with_state(state)
}

/// Binds to the given address and serves the API until `shutdown` resolves.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(
    state: AppState,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
