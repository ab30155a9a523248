//! Job configuration for tile mirror runs.
//!
//! A job is described by a YAML file with two sections:
//! - `job`: the remote endpoint, the tile range to cover, and the cache
//!   policy
//! - `output`: where tile records are written
//!
//! ```yaml
//! job:
//!   url: "https://tiles.example.org/layer/"
//!   tile:
//!     zoom_level: 16
//!     min_x: 58000
//!     max_x: 58200
//!     min_y: 25600
//!     max_y: 25800
//!   refetch: false
//! output:
//!   dir: "./tiles"
//! ```
//!
//! The tile range uses half-open bounds: `min_x <= x < max_x` and
//! `min_y <= y < max_y`. A malformed range is rejected when the range is
//! converted into a [`TileBBox`], before any network or filesystem work.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::{Path, PathBuf},
};
use tilemirror_core::TileBBox;

/// Top-level job configuration, deserialized from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
	/// What to fetch and from where
	pub job: JobSection,

	/// Where to write tile records
	pub output: OutputSection,
}

/// The `job` section: endpoint, tile range and cache policy.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JobSection {
	/// Base URL of the tile endpoint; tiles are fetched from
	/// `{url}{zoom}/{x}/{y}.png`
	pub url: String,

	/// Rectangular tile range to cover
	pub tile: TileRangeConfig,

	/// When true, existing on-disk tile records are ignored and every tile
	/// is fetched again. When false (the default), existing records are
	/// treated as authoritative and their tiles are skipped.
	#[serde(default)]
	pub refetch: bool,

	/// Optional capabilities document; noted for reference, never parsed
	#[serde(default)]
	pub metadata_file: Option<PathBuf>,
}

/// The `output` section.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
	/// Root directory of the local tile tree
	pub dir: PathBuf,
}

/// Half-open tile index ranges at a fixed zoom level.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TileRangeConfig {
	/// Zoom level of the range (0..=31)
	pub zoom_level: u8,
	/// Minimum x index, inclusive
	pub min_x: u32,
	/// Maximum x index, exclusive
	pub max_x: u32,
	/// Minimum y index, inclusive
	pub min_y: u32,
	/// Maximum y index, exclusive
	pub max_y: u32,
}

impl TileRangeConfig {
	/// Convert the configured range into a validated [`TileBBox`].
	///
	/// # Errors
	/// Returns an error if `min >= max` on either axis or if the range does
	/// not fit the zoom level.
	pub fn to_bbox(&self) -> Result<TileBBox> {
		TileBBox::from_bounds(self.zoom_level, self.min_x, self.max_x, self.min_y, self.max_y)
	}
}

impl JobConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("failed to open job configuration {path:?}"))?;
		JobConfig::from_reader(BufReader::new(file)).with_context(|| format!("failed to parse job configuration {path:?}"))
	}
}
