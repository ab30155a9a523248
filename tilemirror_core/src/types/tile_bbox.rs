//! Tile-aligned bounding boxes for a single zoom level.
//!
//! A `TileBBox` describes a rectangular region of tiles at a specific zoom
//! level. The internal representation stores `(x_min, y_min, width, height)`;
//! the derived maximum coordinates are inclusive.
//!
//! Job configurations describe their region with half-open bounds
//! `[min, max)`; use [`TileBBox::from_bounds`] for those.
//!
//! ## Examples
//! ```
//! use tilemirror_core::TileBBox;
//!
//! let bb = TileBBox::from_bounds(5, 0, 2, 0, 2).unwrap();
//! assert_eq!(bb.count_tiles(), 4);
//! assert_eq!((bb.x_min(), bb.y_min(), bb.x_max(), bb.y_max()), (0, 0, 1, 1));
//! ```

use crate::TileCoord;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use std::fmt::{self, Debug};

/// A rectangular region of tiles at a specific zoom level.
///
/// The bbox stores the minimum tile coordinates and dimensions. A bbox
/// constructed by this module is never empty.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct TileBBox {
	/// Zoom level of the bounding box.
	pub level: u8,
	x_min: u32,
	y_min: u32,
	width: u32,
	height: u32,
}

impl TileBBox {
	/// Create from minimum tile and a size, validating bounds for the given level.
	///
	/// # Errors
	/// Returns an error if the size is zero or if any coordinate or extent
	/// exceeds the valid range for the level.
	pub fn from_min_and_size(level: u8, x_min: u32, y_min: u32, width: u32, height: u32) -> Result<TileBBox> {
		ensure!(level <= 31, "level ({level}) must be <= 31");

		let size = 1u32 << level;

		ensure!(width > 0, "width must be > 0");
		ensure!(height > 0, "height must be > 0");
		ensure!(x_min < size, "x_min ({x_min}) must be < size ({size})");
		ensure!(y_min < size, "y_min ({y_min}) must be < size ({size})");
		ensure!(
			width + x_min <= size,
			"width ({width}) + x_min ({x_min}) must be <= size ({size})"
		);
		ensure!(
			height + y_min <= size,
			"height ({height}) + y_min ({y_min}) must be <= size ({size})"
		);

		Ok(TileBBox {
			level,
			x_min,
			y_min,
			width,
			height,
		})
	}

	/// Create from half-open coordinate ranges `[min_x, max_x)` × `[min_y, max_y)`.
	///
	/// This is the constructor job configurations go through; a malformed
	/// range fails here, before any I/O happens.
	///
	/// # Errors
	/// Returns an error if `min >= max` on either axis or if the range
	/// exceeds the valid extent of the level.
	pub fn from_bounds(level: u8, min_x: u32, max_x: u32, min_y: u32, max_y: u32) -> Result<TileBBox> {
		ensure!(min_x < max_x, "min_x ({min_x}) must be < max_x ({max_x})");
		ensure!(min_y < max_y, "min_y ({min_y}) must be < max_y ({max_y})");

		TileBBox::from_min_and_size(level, min_x, min_y, max_x - min_x, max_y - min_y).with_context(|| {
			format!("invalid tile range [{min_x},{max_x})x[{min_y},{max_y}) at level {level}")
		})
	}

	/// Width (in tiles) of the bounding box.
	#[inline]
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height (in tiles) of the bounding box.
	#[inline]
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Minimum x-tile (column) coordinate.
	#[inline]
	pub fn x_min(&self) -> u32 {
		self.x_min
	}

	/// Minimum y-tile (row) coordinate.
	#[inline]
	pub fn y_min(&self) -> u32 {
		self.y_min
	}

	/// Maximum x-tile coordinate, inclusive.
	pub fn x_max(&self) -> u32 {
		self.x_min + self.width - 1
	}

	/// Maximum y-tile coordinate, inclusive.
	pub fn y_max(&self) -> u32 {
		self.y_min + self.height - 1
	}

	/// Total number of tiles covered by the bounding box.
	pub fn count_tiles(&self) -> u64 {
		u64::from(self.width) * u64::from(self.height)
	}

	/// Returns an iterator over all tile coordinates within the bounding box.
	///
	/// Enumeration is deterministic: the x axis is the outer loop, the y
	/// axis the inner one, so downstream sharding and tests are reproducible.
	pub fn iter_coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
		let x_range = self.x_min()..=self.x_max();
		let y_range = self.y_min()..=self.y_max();
		x_range
			.cartesian_product(y_range)
			.map(|(x, y)| TileCoord::new(self.level, x, y).unwrap())
	}

	/// Consumes the bounding box and returns an iterator over all tile
	/// coordinates within it, in the same order as [`iter_coords`](Self::iter_coords).
	pub fn into_iter_coords(self) -> impl Iterator<Item = TileCoord> {
		let x_range = self.x_min()..=self.x_max();
		let y_range = self.y_min()..=self.y_max();
		x_range
			.cartesian_product(y_range)
			.map(move |(x, y)| TileCoord::new(self.level, x, y).unwrap())
	}
}

impl Debug for TileBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_fmt(format_args!(
			"TileBBox({}, [{}, {}, {}, {}])",
			self.level,
			self.x_min(),
			self.y_min(),
			self.x_max(),
			self.y_max()
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashSet;

	fn tc(z: u8, x: u32, y: u32) -> TileCoord {
		TileCoord::new(z, x, y).unwrap()
	}

	#[rstest]
	#[case((1, 0, 0, 1, 1))]
	#[case((2, 0, 0, 2, 2))]
	#[case((4, 5, 6, 3, 2))]
	fn from_min_and_size_valid(#[case] args: (u8, u32, u32, u32, u32)) -> Result<()> {
		let (lvl, x0, y0, w, h) = args;
		let bb = TileBBox::from_min_and_size(lvl, x0, y0, w, h)?;
		assert_eq!(bb.level, lvl);
		assert_eq!(bb.x_min(), x0);
		assert_eq!(bb.y_min(), y0);
		assert_eq!(bb.width(), w);
		assert_eq!(bb.height(), h);
		assert_eq!(bb.x_max(), x0 + w - 1);
		assert_eq!(bb.y_max(), y0 + h - 1);
		Ok(())
	}

	#[rstest]
	#[case((32, 0, 0, 1, 1))] // invalid level
	#[case((3, 8, 0, 1, 1))] // x_min > max
	#[case((3, 0, 8, 1, 1))] // y_min > max
	#[case((2, 2, 2, 3, 2))] // x_max > max
	#[case((2, 0, 2, 2, 3))] // y_max > max
	#[case((2, 0, 0, 0, 1))] // zero width
	#[case((2, 0, 0, 1, 0))] // zero height
	fn from_min_and_size_invalid(#[case] args: (u8, u32, u32, u32, u32)) {
		let (lvl, x0, y0, w, h) = args;
		assert!(TileBBox::from_min_and_size(lvl, x0, y0, w, h).is_err());
	}

	#[rstest]
	#[case((5, 0, 2, 0, 2), 4)]
	#[case((5, 3, 4, 7, 8), 1)]
	#[case((16, 100, 110, 200, 205), 50)]
	fn from_bounds_counts_tiles(#[case] args: (u8, u32, u32, u32, u32), #[case] expected: u64) {
		let (lvl, x0, x1, y0, y1) = args;
		let bb = TileBBox::from_bounds(lvl, x0, x1, y0, y1).unwrap();
		assert_eq!(bb.count_tiles(), expected);
		assert_eq!(bb.count_tiles(), u64::from(x1 - x0) * u64::from(y1 - y0));
	}

	#[rstest]
	#[case((5, 2, 2, 0, 2))] // min_x == max_x
	#[case((5, 3, 2, 0, 2))] // min_x > max_x
	#[case((5, 0, 2, 2, 2))] // min_y == max_y
	#[case((5, 0, 2, 3, 2))] // min_y > max_y
	#[case((2, 0, 5, 0, 2))] // max_x beyond level extent
	#[case((32, 0, 1, 0, 1))] // invalid level
	fn from_bounds_invalid(#[case] args: (u8, u32, u32, u32, u32)) {
		let (lvl, x0, x1, y0, y1) = args;
		assert!(TileBBox::from_bounds(lvl, x0, x1, y0, y1).is_err());
	}

	#[test]
	fn iter_coords_column_major_and_count() -> Result<()> {
		// z=4, x=2..5 (3 cols), y=5..7 (2 rows): x runs outer, y inner
		let bb = TileBBox::from_bounds(4, 2, 5, 5, 7)?;
		let v: Vec<_> = bb.iter_coords().collect();
		let exp = vec![
			tc(4, 2, 5),
			tc(4, 2, 6),
			tc(4, 3, 5),
			tc(4, 3, 6),
			tc(4, 4, 5),
			tc(4, 4, 6),
		];
		assert_eq!(v, exp);
		Ok(())
	}

	#[test]
	fn iter_coords_distinct_and_in_bounds() -> Result<()> {
		let bb = TileBBox::from_bounds(7, 10, 17, 20, 25)?;
		let coords: Vec<_> = bb.iter_coords().collect();
		assert_eq!(coords.len() as u64, bb.count_tiles());

		let distinct: HashSet<_> = coords.iter().copied().collect();
		assert_eq!(distinct.len(), coords.len());

		for c in coords {
			assert_eq!(c.level, 7);
			assert!((10..17).contains(&c.x));
			assert!((20..25).contains(&c.y));
		}
		Ok(())
	}

	#[test]
	fn into_iter_coords_consumes_and_matches() -> Result<()> {
		let bb = TileBBox::from_bounds(5, 10, 12, 20, 23)?;
		let a: Vec<_> = bb.iter_coords().collect();
		let b: Vec<_> = bb.into_iter_coords().collect();
		assert_eq!(a, b);
		assert_eq!(a.len(), 6);
		Ok(())
	}

	#[test]
	fn debug_format() {
		let bb = TileBBox::from_bounds(5, 0, 2, 0, 2).unwrap();
		assert_eq!(format!("{bb:?}"), "TileBBox(5, [0, 0, 1, 1])");
	}
}
