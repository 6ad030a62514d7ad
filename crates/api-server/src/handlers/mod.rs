mod address;
mod health;

pub use address::{geocode_handler, search_handler};
pub use health::{HEALTH_PROBE_KEY, health_handler};
