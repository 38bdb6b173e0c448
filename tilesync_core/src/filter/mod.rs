//! Tile filters decide which tiles a copy run skips.
//!
//! A filter answers `excludes(coord)`: `true` skips the tile, `false` keeps it. Filters are
//! composed with [`AnyFilter`] (skip if any member skips) and [`AllFilter`] (skip only if every
//! member skips). Both evaluate members in order and stop at the first decisive answer or the
//! first error.

use crate::TileCoord;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

#[async_trait]
pub trait TileFilterTrait: Debug + Send + Sync {
	/// Returns `true` if the tile at `coord` must be skipped.
	async fn excludes(&self, coord: &TileCoord) -> Result<bool>;
}

/// Excludes a tile if at least one member excludes it. An empty `AnyFilter` excludes nothing.
#[derive(Debug, Default)]
pub struct AnyFilter {
	filters: Vec<Box<dyn TileFilterTrait>>,
}

impl AnyFilter {
	pub fn new(filters: Vec<Box<dyn TileFilterTrait>>) -> AnyFilter {
		AnyFilter { filters }
	}

	pub fn push(&mut self, filter: Box<dyn TileFilterTrait>) {
		self.filters.push(filter);
	}

	pub fn len(&self) -> usize {
		self.filters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.filters.is_empty()
	}
}

#[async_trait]
impl TileFilterTrait for AnyFilter {
	async fn excludes(&self, coord: &TileCoord) -> Result<bool> {
		for filter in &self.filters {
			if filter.excludes(coord).await? {
				return Ok(true);
			}
		}
		Ok(false)
	}
}

/// Excludes a tile only if every member excludes it. An empty `AllFilter` excludes everything.
#[derive(Debug, Default)]
pub struct AllFilter {
	filters: Vec<Box<dyn TileFilterTrait>>,
}

impl AllFilter {
	pub fn new(filters: Vec<Box<dyn TileFilterTrait>>) -> AllFilter {
		AllFilter { filters }
	}

	pub fn push(&mut self, filter: Box<dyn TileFilterTrait>) {
		self.filters.push(filter);
	}
}

#[async_trait]
impl TileFilterTrait for AllFilter {
	async fn excludes(&self, coord: &TileCoord) -> Result<bool> {
		for filter in &self.filters {
			if !filter.excludes(coord).await? {
				return Ok(false);
			}
		}
		Ok(true)
	}
}

/// A filter with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct ConstFilter(pub bool);

#[async_trait]
impl TileFilterTrait for ConstFilter {
	async fn excludes(&self, _coord: &TileCoord) -> Result<bool> {
		Ok(self.0)
	}
}
