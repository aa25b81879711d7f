//! World-facing interfaces consumed by the decision engine.
//!
//! Terrain generation, entity placement and movement are owned elsewhere; this
//! module only defines the read-only queries the engine needs.
mod map;
mod snapshot;

pub use map::{MapDimensions, TerrainGrid, TerrainKind, TerrainOracle};
pub use snapshot::{EntityLayout, Nearest, WorldSnapshot, nearest_of};
