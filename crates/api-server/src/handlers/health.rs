use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{AddressProvider, data::AddressList};
use storage::KVCache;
use tracing::warn;

/// Outside the `search:` and `geocode:` namespaces.
pub const HEALTH_PROBE_KEY: &str = "healthcheck:probe";

/// Round-trips a probe entry through the cache.
pub async fn health_handler<P: AddressProvider>(State(state): State<AppState<P>>) -> Response {
    let cache = state.resolver.cache();
    cache.set(HEALTH_PROBE_KEY, AddressList::default()).await;
    if cache.get(HEALTH_PROBE_KEY).await.is_none() {
        warn!("cache probe failed");
        return (StatusCode::SERVICE_UNAVAILABLE, "cache probe failed").into_response();
    }
    (StatusCode::OK, "OK").into_response()
}
