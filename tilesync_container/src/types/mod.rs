mod driver_registry;
mod tile_driver_trait;
mod tile_source_trait;

pub use driver_registry::*;
pub use tile_driver_trait::*;
pub use tile_source_trait::*;
