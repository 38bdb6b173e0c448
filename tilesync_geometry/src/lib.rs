//! Areas of interest for restricting a sync to a region.
//!
//! An [`AreaOfInterest`] is a multipolygon in longitude/latitude degrees. It can be built from
//! a bounding box, a WKT `POLYGON`/`MULTIPOLYGON` or a GeoJSON document, and turned into a
//! tile filter with [`IntersectsFilter`].
//!
//! ```
//! use tilesync_geometry::AreaOfInterest;
//! use tilesync_core::TileCoord;
//!
//! let aoi: AreaOfInterest = "POLYGON((5.9 45.8, 10.5 45.8, 10.5 47.8, 5.9 47.8, 5.9 45.8))".parse().unwrap();
//! assert!(aoi.intersects_tile(&TileCoord::new(3, 4, 5).unwrap()));
//! assert!(!aoi.intersects_tile(&TileCoord::new(3, 0, 0).unwrap()));
//! ```

mod area;
pub use area::AreaOfInterest;

mod filter;
pub use filter::IntersectsFilter;

pub mod geojson;
pub mod wkt;
