//! Hydration support: island metadata and prop serialization.

mod islands;
mod serialize;

pub use islands::{DEFAULT_EXPORT, Island, IslandRegistry};
pub use serialize::{encode_props, island_props_to_value, serialize_island_props};
