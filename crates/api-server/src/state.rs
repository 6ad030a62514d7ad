use crate::auth::ApiTokens;
use common::{AddressProvider, data::AddressList, error::Error};
use std::sync::Arc;
use storage::{AnyCache, CachedResolver};

pub type GeoCache = AnyCache<AddressList>;
pub type GeoResolver = CachedResolver<GeoCache, AddressList, Error>;

/// Shared by every handler. Built once in `main` and cloned per request.
pub struct AppState<P> {
    pub provider: Arc<P>,
    pub resolver: GeoResolver,
    pub tokens:   Arc<ApiTokens>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            resolver: self.resolver.clone(),
            tokens:   self.tokens.clone(),
        }
    }
}

impl<P: AddressProvider> AppState<P> {
    pub fn new(provider: P, cache: GeoCache, tokens: ApiTokens) -> Self {
        Self {
            provider: Arc::new(provider),
            resolver: CachedResolver::new(cache),
            tokens:   Arc::new(tokens),
        }
    }
}
