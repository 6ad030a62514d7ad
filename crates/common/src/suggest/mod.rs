mod client;
mod request;

pub use client::SuggestClient;
pub use request::RequestData;

use crate::{data::AddressList, error::Result};

/// Upstream lookup seam. The HTTP layer only depends on this trait so tests
/// can swap in a stub.
pub trait AddressProvider: Send + Sync + 'static {
    fn search(&self, query: &str) -> impl Future<Output = Result<AddressList>> + Send;

    fn geocode(&self, lat: f64, lng: f64) -> impl Future<Output = Result<AddressList>> + Send;
}
