mod cache;
mod resolver;

pub mod error;

pub use cache::{AnyCache, KVCache, bounded::BoundedCache, ttl::TtlCache};
pub use resolver::CachedResolver;
