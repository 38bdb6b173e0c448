//! Synchronise raster tile pyramids between tile servers, tile folders, MBTiles and GeoPackage files.
//!
//! The heavy lifting lives in the member crates:
//! - [`tilesync_core`]: tile addresses, bounding boxes, tile formats, filters and progress bars
//! - [`tilesync_container`]: the drivers, their registry and the tile copier
//! - [`tilesync_geometry`]: areas of interest
//! - [`tilesync_image`]: png/jpg transcoding
//!
//! This crate adds job configuration, level-by-level syncing and the tile server.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tilesync::{SyncParameters, config::SourceConfig, open_reader, open_writer, sync_layer};
//! use tilesync_container::DriverRegistry;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//! 	let registry = DriverRegistry::default();
//! 	let from = open_reader(&registry, &SourceConfig {
//! 		path: Some("https://tiles.example.org/%d/%d/%d.png".into()),
//! 		..Default::default()
//! 	}).await?;
//! 	let to = open_writer(&registry, &SourceConfig {
//! 		path: Some("world.mbtiles".into()),
//! 		..Default::default()
//! 	}, "data").await?;
//! 	sync_layer(from, to, &SyncParameters::default()).await?;
//! 	Ok(())
//! }
//! ```

pub mod config;
pub mod server;

mod open;
pub use open::{open_reader, open_writer};

mod sync;
pub use sync::*;
