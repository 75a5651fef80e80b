//! Webhook HTTP server: the entry point of the review service.
//!
//! Provides the axum router with the `POST /webhook` dispatcher and
//! [`run`] which binds the listener and serves until shutdown. The webhook
//! sender always gets `200 OK` once an event is accepted; pipeline outcomes
//! never influence the HTTP response.

pub mod webhook;

use std::net::SocketAddr;

use vigil_core::VigilError;

pub use webhook::{router, AppState};

/// Bind `0.0.0.0:port` and serve webhook requests until the process exits.
///
/// # Errors
///
/// Returns [`VigilError::Io`] if the listener cannot be bound or the server
/// loop fails.
pub async fn run(port: u16, state: AppState) -> Result<(), VigilError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening for webhook events");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
