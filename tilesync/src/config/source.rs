use serde::Deserialize;
use std::path::Path;

/// Where tiles are read from, or written to when used as a sync destination.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
	/// File, directory or URL template.
	pub path: Option<String>,

	/// Driver name. Sniffed from `path` if missing.
	pub driver: Option<String>,

	/// Layer name. Sources default to their first layer.
	pub layer: Option<String>,
}

impl SourceConfig {
	/// Makes a relative file path absolute against `base`. URLs are kept.
	pub fn resolve_paths(&mut self, base: &Path) {
		if let Some(path) = &self.path
			&& !path.contains("://")
			&& Path::new(path).is_relative()
		{
			self.path = Some(base.join(path).to_string_lossy().to_string());
		}
	}

	pub fn override_optional_path(&mut self, path: &Option<String>) {
		if path.is_some() {
			self.path.clone_from(path);
		}
	}

	pub fn override_optional_driver(&mut self, driver: &Option<String>) {
		if driver.is_some() {
			self.driver.clone_from(driver);
		}
	}

	pub fn override_optional_layer(&mut self, layer: &Option<String>) {
		if layer.is_some() {
			self.layer.clone_from(layer);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("world.mbtiles", "/jobs/world.mbtiles")]
	#[case("tiles/a", "/jobs/tiles/a")]
	#[case("/data/world.mbtiles", "/data/world.mbtiles")]
	#[case("https://a/%d/%d/%d.png", "https://a/%d/%d/%d.png")]
	fn resolve_paths(#[case] path: &str, #[case] expected: &str) {
		let mut config = SourceConfig {
			path: Some(path.to_string()),
			..Default::default()
		};
		config.resolve_paths(Path::new("/jobs"));
		assert_eq!(config.path.as_deref(), Some(expected));
	}

	#[test]
	fn overrides() {
		let mut config = SourceConfig {
			path: Some("a.mbtiles".into()),
			driver: Some("mbtiles".into()),
			layer: None,
		};
		config.override_optional_path(&None);
		config.override_optional_driver(&Some("gpkg".into()));
		config.override_optional_layer(&Some("roads".into()));
		assert_eq!(
			config,
			SourceConfig {
				path: Some("a.mbtiles".into()),
				driver: Some("gpkg".into()),
				layer: Some("roads".into()),
			}
		);
	}
}
