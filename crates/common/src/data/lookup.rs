use super::AddressList;
use crate::{error::Result, suggest::AddressProvider};

/// Decimal places used for coordinates in cache keys.
pub const COORDINATE_PRECISION: usize = 6;

/// One logical request against the suggestion service.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Search { query: String },
    Geocode { lat: f64, lng: f64 },
}

impl Lookup {
    pub fn search(query: impl Into<String>) -> Self {
        Self::Search {
            query: query.into(),
        }
    }

    pub fn geocode(lat: f64, lng: f64) -> Self {
        Self::Geocode { lat, lng }
    }

    /// Stable key for the result of this lookup. Coordinates are rendered
    /// with a fixed number of decimals, queries are taken verbatim.
    pub fn cache_key(&self) -> String {
        match self {
            Self::Search { query } => format!("search:{query}"),
            Self::Geocode { lat, lng } => format!(
                "geocode:{:.prec$}:{:.prec$}",
                positive_zero(*lat),
                positive_zero(*lng),
                prec = COORDINATE_PRECISION
            ),
        }
    }

    pub async fn run<P: AddressProvider>(&self, provider: &P) -> Result<AddressList> {
        match self {
            Self::Search { query } => provider.search(query).await,
            Self::Geocode { lat, lng } => provider.geocode(*lat, *lng).await,
        }
    }
}

// -0.0 and 0.0 are the same point.
#[inline]
fn positive_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}
