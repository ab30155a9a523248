//! Tile coordinates in a tiled-map pyramid.
//!
//! This module provides the [`TileCoord`] type for addressing a single tile
//! by zoom level and x/y indices. The canonical path form
//! `"{level}/{x}/{y}"` is used both as the remote resource suffix and as the
//! local directory suffix of a tile record.
//!
//! # Examples
//!
//! ```
//! use tilemirror_core::TileCoord;
//!
//! let coord = TileCoord::new(5, 6, 7).unwrap();
//! assert_eq!(coord.level, 5);
//! assert_eq!(coord.as_path(), "5/6/7");
//! ```

use anyhow::{Result, ensure};
use std::fmt::{self, Debug};

/// A tile coordinate in a tiled-map pyramid, with zoom level, x, and y indices.
#[derive(Eq, PartialEq, Clone, Hash, Copy)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub level: u8,
	/// The x index of the tile.
	pub x: u32,
	/// The y index of the tile.
	pub y: u32,
}

impl TileCoord {
	/// Create a new `TileCoord` at the given zoom `level` and tile indices `x`, `y`.
	///
	/// # Errors
	/// Returns an error if `level` > 31 or if an index is out of bounds for the level.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(level <= 31, "level ({level}) must be <= 31");
		let max = 2u32.pow(u32::from(level));
		ensure!(x < max, "x ({x}) out of bounds for level {level}");
		ensure!(y < max, "y ({y}) out of bounds for level {level}");
		Ok(TileCoord { level, x, y })
	}

	/// The canonical `"{level}/{x}/{y}"` form of this coordinate.
	///
	/// This string doubles as the remote resource suffix and the relative
	/// directory path of the on-disk tile record.
	pub fn as_path(&self) -> String {
		format!("{}/{}/{}", self.level, self.x, self.y)
	}

	/// Number of tiles per axis at this coordinate's zoom level.
	pub fn max_count(&self) -> u32 {
		2u32.pow(u32::from(self.level))
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_fmt(format_args!("TileCoord({}, [{}, {}])", &self.level, &self.x, &self.y))
	}
}

impl PartialOrd for TileCoord {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for TileCoord {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self
			.level
			.cmp(&other.level)
			.then(self.y.cmp(&other.y))
			.then(self.x.cmp(&other.x))
	}
}
