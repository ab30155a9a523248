//! On-disk tile records.
//!
//! Each tile owns the directory `<root>/<zoom>/<x>/<y>/`, which after a
//! completed operation contains exactly one of:
//!
//! | File      | Meaning                      |
//! |-----------|------------------------------|
//! | `200.png` | the fetched image bytes      |
//! | `404.txt` | zero-byte marker, confirmed absent upstream |
//!
//! No directory exists for a tile that was never attempted. Because every
//! tile has its own directory and the engine never assigns one tile to two
//! workers, no locking is needed here; directory creation is still
//! idempotent so a duplicate attempt degrades to a rewrite instead of an
//! error.

use anyhow::{Context, Result, ensure};
use std::{
	collections::BTreeMap,
	fs,
	path::{Path, PathBuf},
};
use tilemirror_core::TileCoord;

/// File name of a fetched tile image inside its tile directory.
pub const IMAGE_FILENAME: &str = "200.png";

/// File name of the absence marker inside its tile directory.
pub const MARKER_FILENAME: &str = "404.txt";

/// The kind of record present for a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileRecord {
	/// `200.png` exists.
	Image,
	/// `404.txt` exists.
	Marker,
}

/// Access to the local tile tree under a fixed output root.
#[derive(Debug, Clone)]
pub struct TileStore {
	root: PathBuf,
}

impl TileStore {
	pub fn new(root: impl Into<PathBuf>) -> TileStore {
		TileStore { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Directory owned by the given tile.
	pub fn tile_dir(&self, coord: &TileCoord) -> PathBuf {
		self
			.root
			.join(coord.level.to_string())
			.join(coord.x.to_string())
			.join(coord.y.to_string())
	}

	pub fn image_path(&self, coord: &TileCoord) -> PathBuf {
		self.tile_dir(coord).join(IMAGE_FILENAME)
	}

	pub fn marker_path(&self, coord: &TileCoord) -> PathBuf {
		self.tile_dir(coord).join(MARKER_FILENAME)
	}

	/// The existing record for a tile, if any. The marker is checked first,
	/// matching the order of the skip decision.
	pub fn lookup(&self, coord: &TileCoord) -> Option<TileRecord> {
		if self.marker_path(coord).exists() {
			Some(TileRecord::Marker)
		} else if self.image_path(coord).exists() {
			Some(TileRecord::Image)
		} else {
			None
		}
	}

	/// Persist fetched image bytes for a tile.
	///
	/// A stale absence marker is removed before the image is written, so a
	/// reader never observes both files at once.
	pub fn write_image(&self, coord: &TileCoord, bytes: &[u8]) -> Result<()> {
		let marker = self.marker_path(coord);
		if marker.exists() {
			fs::remove_file(&marker).with_context(|| format!("failed to remove stale marker {marker:?}"))?;
		}

		let dir = self.tile_dir(coord);
		fs::create_dir_all(&dir).with_context(|| format!("failed to create tile directory {dir:?}"))?;

		let path = dir.join(IMAGE_FILENAME);
		fs::write(&path, bytes).with_context(|| format!("failed to write tile image {path:?}"))?;
		Ok(())
	}

	/// Persist the absence marker for a tile.
	///
	/// A stale image is removed first; at most one record may exist per tile.
	pub fn write_marker(&self, coord: &TileCoord) -> Result<()> {
		let image = self.image_path(coord);
		if image.exists() {
			fs::remove_file(&image).with_context(|| format!("failed to remove stale image {image:?}"))?;
		}

		let dir = self.tile_dir(coord);
		fs::create_dir_all(&dir).with_context(|| format!("failed to create tile directory {dir:?}"))?;

		let path = dir.join(MARKER_FILENAME);
		fs::write(&path, []).with_context(|| format!("failed to write marker {path:?}"))?;
		Ok(())
	}

	/// Walk the tile tree and count records per zoom level.
	///
	/// Entries that do not look like `<zoom>/<x>/<y>` are skipped.
	pub fn scan(&self) -> Result<StoreScan> {
		ensure!(self.root.exists(), "tile directory {:?} does not exist", self.root);
		ensure!(self.root.is_dir(), "{:?} is not a directory", self.root);

		let mut levels: BTreeMap<u8, LevelStats> = BTreeMap::new();

		for level_entry in fs::read_dir(&self.root)? {
			let level_entry = level_entry?;
			let Ok(level) = level_entry.file_name().to_string_lossy().parse::<u8>() else {
				log::trace!("skipping {:?}", level_entry.path());
				continue;
			};
			if !level_entry.path().is_dir() {
				continue;
			}

			for x_entry in fs::read_dir(level_entry.path())? {
				let x_entry = x_entry?;
				if x_entry.file_name().to_string_lossy().parse::<u32>().is_err() || !x_entry.path().is_dir() {
					continue;
				}

				for y_entry in fs::read_dir(x_entry.path())? {
					let y_entry = y_entry?;
					if y_entry.file_name().to_string_lossy().parse::<u32>().is_err() {
						continue;
					}
					let stats = levels.entry(level).or_default();
					if y_entry.path().join(IMAGE_FILENAME).exists() {
						stats.images += 1;
					}
					if y_entry.path().join(MARKER_FILENAME).exists() {
						stats.markers += 1;
					}
				}
			}
		}

		Ok(StoreScan { levels })
	}
}

/// Record counts for one zoom level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStats {
	pub images: u64,
	pub markers: u64,
}

/// Result of [`TileStore::scan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreScan {
	pub levels: BTreeMap<u8, LevelStats>,
}

impl StoreScan {
	pub fn totals(&self) -> LevelStats {
		let mut totals = LevelStats::default();
		for stats in self.levels.values() {
			totals.images += stats.images;
			totals.markers += stats.markers;
		}
		totals
	}
}
