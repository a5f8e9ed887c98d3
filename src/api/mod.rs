//! REST API over the sizing engine.
//!
//! Provides two endpoints:
//! - `GET /api/init`: the full catalog (archetypes, packs by group, tiers, solar yields)
//! - `POST /api/calculate`: energy profile and ranked tier recommendations

mod error;
mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

pub use error::ApiError;
pub use types::ErrorResponse;

use crate::sizing::Sizer;

/// Builds the axum router with all API routes.
///
/// The sizer is read-only, so handlers share it through `Arc` without locks.
pub fn router(state: Arc<Sizer>) -> Router {
    Router::new()
        .route("/api/init", get(handlers::get_init))
        .route("/api/calculate", post(handlers::post_calculate))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<Sizer>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
