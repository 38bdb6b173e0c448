//! HTTP access to a single tile layer.
//!
//! | route              | response                                                       |
//! |--------------------|----------------------------------------------------------------|
//! | `/tiles/…/z/x/y.e` | the tile, a grey placeholder if missing, 404 on a bad path     |
//! | `/status`          | `ready!`                                                       |
//! | `/`                | an OpenLayers map of the layer                                 |

mod handlers;
mod tile_server;

pub use handlers::parse_tile_path;
pub use tile_server::*;
