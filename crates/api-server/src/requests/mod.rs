mod address;

pub use address::{GeocodeRequest, SearchRequest};
