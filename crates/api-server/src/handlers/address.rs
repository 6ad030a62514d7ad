use crate::{
    error::Result,
    requests::{GeocodeRequest, SearchRequest},
    state::AppState,
};
use axum::{Json, extract::State};
use common::{
    AddressProvider,
    data::{AddressList, Lookup},
};
use tracing::info;

pub async fn search_handler<P: AddressProvider>(
    State(state): State<AppState<P>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<AddressList>> {
    let lookup = req.into_lookup()?;
    resolve(&state, lookup).await.map(Json)
}

pub async fn geocode_handler<P: AddressProvider>(
    State(state): State<AppState<P>>,
    Json(req): Json<GeocodeRequest>,
) -> Result<Json<AddressList>> {
    let lookup = req.into_lookup()?;
    resolve(&state, lookup).await.map(Json)
}

async fn resolve<P: AddressProvider>(state: &AppState<P>, lookup: Lookup) -> Result<AddressList> {
    let key = lookup.cache_key();
    let provider = state.provider.clone();
    let addresses = state
        .resolver
        .resolve(key, move || async move { lookup.run(provider.as_ref()).await })
        .await?;
    info!(count = addresses.len(), "address lookup served");
    Ok(addresses)
}
