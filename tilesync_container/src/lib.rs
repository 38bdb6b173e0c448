//! tilesync container: the capability model over tile stores, the driver registry, the
//! [`TileCopier`] and the built-in store drivers.
//!
//! ```rust,no_run
//! use tilesync_container::*;
//! use tilesync_core::TileBlock;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = DriverRegistry::default();
//!
//!     let source = registry.open("zxy", "https://tile.example.org/%d/%d/%d.png").await?;
//!     let from = open_layer_at(source.as_ref(), 0).await?;
//!
//!     let target = registry.open("mbtiles", "/tmp/world.mbtiles").await?;
//!     let to = target.as_writable().expect("mbtiles is writable").create_layer("data").await?;
//!
//!     let copier = TileCopier::new(from, to, None);
//!     let processed = copier.copy_block(&TileBlock::new_full(2), None).await?;
//!     println!("{processed} tiles copied");
//!     Ok(())
//! }
//! ```

mod container;
pub use container::*;

mod copier;
pub use copier::*;

mod types;
pub use types::*;
