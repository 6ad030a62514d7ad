pub mod config;
pub mod data;
pub mod error;
pub mod suggest;

mod log;

pub use log::logging_stdout;
pub use suggest::{AddressProvider, SuggestClient};
