mod address;
mod lookup;

pub use address::{Address, AddressList};
pub use lookup::{COORDINATE_PRECISION, Lookup};
