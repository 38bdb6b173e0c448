//! Tile addresses, tile blocks, bounding boxes, tile formats and byte buffers.

mod blob;
pub use blob::*;

mod geo_bbox;
pub use geo_bbox::*;

mod tile_block;
pub use tile_block::*;

mod tile_coord;
pub use tile_coord::*;

mod tile_format;
pub use tile_format::*;
