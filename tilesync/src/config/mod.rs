//! YAML job files.
//!
//! ```yaml
//! http_timeout_seconds: 10
//! source:
//!   path: https://tiles.example.org/%d/%d/%d.png
//! server:
//!   port: 8085
//!   zero_is_top: true
//! sync:
//!   destination:
//!     path: world.mbtiles
//!     layer: world
//!   min_level: 0
//!   max_level: 5
//!   aoi: switzerland.geojson
//!   replace: false
//! ```

mod main;
mod server;
mod source;
mod sync;

pub use main::Config;
pub use server::ServerConfig;
pub use source::SourceConfig;
pub use sync::SyncConfig;
