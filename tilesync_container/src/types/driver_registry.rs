//! `DriverRegistry` maps short driver names to [`TileDriverTrait`] implementations.
//!
//! Names are kept sorted, so [`DriverRegistry::list`] and the driver sniffing of
//! [`DriverRegistry::find_driver_name`] are deterministic.
//!
//! ```rust
//! use tilesync_container::DriverRegistry;
//!
//! let registry = DriverRegistry::default();
//! assert_eq!(registry.list(), ["folder", "gpkg", "jpgfolder", "mbtiles", "zxy"]);
//! assert_eq!(registry.find_driver_name("world.mbtiles").as_deref(), Some("mbtiles"));
//! assert_eq!(registry.find_driver_name("http://a.tile.example/%d/%d/%d.png").as_deref(), Some("zxy"));
//! ```

use crate::{
	GeoPackageDriver, MBTilesDriver, TileDriverTrait, TileFolderDriver, TileReaderTrait, TileSourceTrait, ZxyDriver,
};
use anyhow::{Result, bail};
use itertools::Itertools;
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tilesync_core::{TileFormat, TileSyncError};

/// Request timeout of the zxy driver in a default registry.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct DriverRegistry {
	drivers: BTreeMap<String, Arc<dyn TileDriverTrait>>,
}

impl DriverRegistry {
	/// A registry without any drivers.
	pub fn new_empty() -> Self {
		Self {
			drivers: BTreeMap::new(),
		}
	}

	/// A registry with all built-in drivers. `http_timeout` applies to every request of the zxy driver.
	pub fn with_http_timeout(http_timeout: Duration) -> Self {
		let mut registry = Self::new_empty();
		registry.register("folder", Arc::new(TileFolderDriver::new(TileFormat::PNG)));
		registry.register("gpkg", Arc::new(GeoPackageDriver));
		registry.register("jpgfolder", Arc::new(TileFolderDriver::new(TileFormat::JPG)));
		registry.register("mbtiles", Arc::new(MBTilesDriver));
		registry.register("zxy", Arc::new(ZxyDriver::new(http_timeout)));
		registry
	}

	/// Adds a driver.
	///
	/// # Panics
	/// Registering the same name twice is a programming error and panics.
	pub fn register(&mut self, name: &str, driver: Arc<dyn TileDriverTrait>) {
		assert!(
			!self.drivers.contains_key(name),
			"driver '{name}' is registered twice"
		);
		log::trace!("register driver '{name}'");
		self.drivers.insert(name.to_string(), driver);
	}

	pub fn lookup(&self, name: &str) -> Option<Arc<dyn TileDriverTrait>> {
		self.drivers.get(name).cloned()
	}

	/// Names of all registered drivers in sorted order.
	pub fn list(&self) -> Vec<String> {
		self.drivers.keys().cloned().collect()
	}

	/// The first driver, in sorted name order, that can open `location`.
	pub fn find_driver_name(&self, location: &str) -> Option<String> {
		let name = self
			.drivers
			.iter()
			.find(|(_, driver)| driver.can_open(location))
			.map(|(name, _)| name.clone());
		log::debug!("driver for '{location}': {name:?}");
		name
	}

	/// Opens `location` with the driver `driver_name`. Errors of the driver are returned unchanged.
	pub async fn open(&self, driver_name: &str, location: &str) -> Result<Box<dyn TileSourceTrait>> {
		let Some(driver) = self.drivers.get(driver_name) else {
			return Err(TileSyncError::DriverNotFound(driver_name.to_string()).into());
		};
		log::debug!("open '{location}' with driver '{driver_name}'");
		driver.open_tile_source(location).await
	}

	/// Opens `location` with the given driver, or with the sniffed one if `driver_name` is `None` or empty.
	pub async fn open_auto(&self, driver_name: Option<&str>, location: &str) -> Result<Box<dyn TileSourceTrait>> {
		match driver_name.filter(|name| !name.is_empty()) {
			Some(name) => self.open(name, location).await,
			None => match self.find_driver_name(location) {
				Some(name) => self.open(&name, location).await,
				None => bail!(
					"no registered driver can open '{location}', known drivers: {}",
					self.drivers.keys().join(", ")
				),
			},
		}
	}
}

impl Default for DriverRegistry {
	fn default() -> Self {
		Self::with_http_timeout(DEFAULT_HTTP_TIMEOUT)
	}
}

/// Opens the layer at position `index` of `source`'s layer list.
pub async fn open_layer_at(source: &dyn TileSourceTrait, index: usize) -> Result<Arc<dyn TileReaderTrait>> {
	let layers = source.list_layers().await?;
	match layers.get(index) {
		Some(name) => source.open_layer(name).await,
		None => Err(TileSyncError::LayerNotFound(format!("#{index}")).into()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{MockTileSource, MockTileStore};
	use async_trait::async_trait;
	use pretty_assertions::assert_eq;

	#[derive(Debug)]
	struct PrefixDriver(&'static str);

	#[async_trait]
	impl TileDriverTrait for PrefixDriver {
		fn can_open(&self, location: &str) -> bool {
			location.starts_with(self.0)
		}

		async fn open_tile_source(&self, location: &str) -> Result<Box<dyn TileSourceTrait>> {
			if location.ends_with("broken") {
				bail!("cannot open {location}");
			}
			let source = MockTileSource::new(location);
			source.insert_layer("a", MockTileStore::new_png("a"));
			source.insert_layer("b", MockTileStore::new_png("b"));
			Ok(Box::new(source))
		}
	}

	fn registry() -> DriverRegistry {
		let mut registry = DriverRegistry::new_empty();
		registry.register("zeta", Arc::new(PrefixDriver("mem:")));
		registry.register("alpha", Arc::new(PrefixDriver("mem:")));
		registry.register("beta", Arc::new(PrefixDriver("other:")));
		registry
	}

	#[test]
	fn list_is_sorted() {
		assert_eq!(registry().list(), ["alpha", "beta", "zeta"]);
		assert!(DriverRegistry::new_empty().list().is_empty());
	}

	#[test]
	#[should_panic(expected = "driver 'alpha' is registered twice")]
	fn duplicate_registration_panics() {
		let mut registry = registry();
		registry.register("alpha", Arc::new(PrefixDriver("x")));
	}

	#[test]
	fn find_first_sorted_match() {
		let registry = registry();
		assert_eq!(registry.find_driver_name("mem:data").as_deref(), Some("alpha"));
		assert_eq!(registry.find_driver_name("other:data").as_deref(), Some("beta"));
		assert_eq!(registry.find_driver_name("file:data"), None);
		assert!(registry.lookup("beta").is_some());
		assert!(registry.lookup("gamma").is_none());
	}

	#[tokio::test]
	async fn open_unknown_driver() {
		let err = registry().open("gamma", "mem:data").await.unwrap_err();
		assert_eq!(
			err.downcast_ref::<TileSyncError>(),
			Some(&TileSyncError::DriverNotFound("gamma".to_string()))
		);
	}

	#[tokio::test]
	async fn open_passes_driver_errors_through() {
		let err = registry().open("alpha", "mem:broken").await.unwrap_err();
		assert_eq!(err.to_string(), "cannot open mem:broken");
	}

	#[tokio::test]
	async fn open_auto() -> Result<()> {
		let registry = registry();
		assert_eq!(registry.open_auto(None, "mem:x").await?.list_layers().await?, ["a", "b"]);
		assert!(registry.open_auto(Some(""), "mem:x").await.is_ok());
		assert!(registry.open_auto(Some("gamma"), "mem:x").await.is_err());
		assert_eq!(
			registry.open_auto(None, "file:x").await.unwrap_err().to_string(),
			"no registered driver can open 'file:x', known drivers: alpha, beta, zeta"
		);
		Ok(())
	}

	#[tokio::test]
	async fn layer_at_index() -> Result<()> {
		let source = registry().open("alpha", "mem:x").await?;
		assert_eq!(open_layer_at(source.as_ref(), 1).await?.source_name(), "b");

		let err = open_layer_at(source.as_ref(), 2).await.unwrap_err();
		assert_eq!(
			err.downcast_ref::<TileSyncError>(),
			Some(&TileSyncError::LayerNotFound("#2".to_string()))
		);
		Ok(())
	}

	#[test]
	fn default_registry() {
		let registry = DriverRegistry::default();
		assert_eq!(registry.list(), ["folder", "gpkg", "jpgfolder", "mbtiles", "zxy"]);
		assert_eq!(registry.find_driver_name("data/world.gpkg").as_deref(), Some("gpkg"));
		assert_eq!(registry.find_driver_name("ftp://x/%d/%d/%d.png"), None);
	}
}
