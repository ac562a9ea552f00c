pub mod signal;
pub mod tile;
pub mod tile_registry;

pub use signal::{Signal, SubscriptionId};
pub use tile::{Tile, TileId, TileSignals};
pub use tile_registry::{RegistryError, TileRegistry};
