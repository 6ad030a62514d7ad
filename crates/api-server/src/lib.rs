use axum::{
    Router, middleware,
    routing::{get, post},
};
use common::AddressProvider;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod auth;
pub mod error;
pub mod handlers;
pub mod requests;
pub mod state;

pub use auth::ApiTokens;
pub use state::{AppState, GeoCache, GeoResolver};

pub fn router<P: AddressProvider>(state: AppState<P>) -> Router {
    let protected = Router::new()
        .route("/api/address/search", post(handlers::search_handler::<P>))
        .route("/api/address/geocode", post(handlers::geocode_handler::<P>))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            auth::require_bearer_token,
        ));

    Router::new()
        .route("/health", get(handlers::health_handler::<P>))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server<P: AddressProvider>(
    addr: SocketAddr,
    state: AppState<P>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "api server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down server");
}
