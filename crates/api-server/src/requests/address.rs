use crate::error::{ApiError, Result};
use common::data::Lookup;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

impl SearchRequest {
    pub fn into_lookup(self) -> Result<Lookup> {
        if self.query.trim().is_empty() {
            return Err(ApiError::InvalidRequest("query must not be empty".into()));
        }
        Ok(Lookup::search(self.query))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GeocodeRequest {
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeRequest {
    pub fn into_lookup(self) -> Result<Lookup> {
        let Self { lat, lng } = self;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ApiError::InvalidRequest(format!(
                "lat must be within [-90, 90], got {lat}"
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(ApiError::InvalidRequest(format!(
                "lng must be within [-180, 180], got {lng}"
            )));
        }
        Ok(Lookup::geocode(lat, lng))
    }
}
