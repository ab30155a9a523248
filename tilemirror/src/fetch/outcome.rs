//! Per-tile outcomes and their aggregation.

use std::fmt::{self, Display};
use tilemirror_core::TileCoord;

/// The result of attempting one tile.
///
/// Outcomes are translated into filesystem state by the engine and only
/// survive in aggregated form. `TransientFailure` and `UnknownStatus` leave
/// the tile unresolved for a future run; every other variant is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileOutcome {
	/// HTTP 200; the image was written, with its size in bytes.
	Fetched(u64),
	/// HTTP 404; the absence marker was written.
	Absent,
	/// An on-disk record already existed and the cache policy trusts it.
	AlreadyCached,
	/// Transport or local I/O fault; no file was created.
	TransientFailure(String),
	/// Any other HTTP status; reported per tile, no file was created.
	UnknownStatus(u16),
}

impl TileOutcome {
	/// True unless the tile is left unresolved for a future run.
	pub fn is_resolved(&self) -> bool {
		!matches!(self, TileOutcome::TransientFailure(_) | TileOutcome::UnknownStatus(_))
	}
}

/// Aggregated counts of one engine run.
///
/// Each shard folds its outcomes locally; the engine merges the shard
/// summaries, so no counter is shared between workers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
	pub fetched: u64,
	pub absent: u64,
	pub cached: u64,
	pub transient_failures: u64,
	pub unknown_status: u64,
	/// Coordinates left unresolved, with the reason.
	pub failures: Vec<(TileCoord, String)>,
}

impl FetchSummary {
	/// Record one tile's outcome.
	pub fn record(&mut self, coord: TileCoord, outcome: &TileOutcome) {
		match outcome {
			TileOutcome::Fetched(_) => self.fetched += 1,
			TileOutcome::Absent => self.absent += 1,
			TileOutcome::AlreadyCached => self.cached += 1,
			TileOutcome::TransientFailure(reason) => {
				self.transient_failures += 1;
				self.failures.push((coord, reason.clone()));
			}
			TileOutcome::UnknownStatus(code) => {
				self.unknown_status += 1;
				self.failures.push((coord, format!("HTTP status {code}")));
			}
		}
	}

	/// Fold another summary into this one.
	pub fn merge(&mut self, other: FetchSummary) {
		self.fetched += other.fetched;
		self.absent += other.absent;
		self.cached += other.cached;
		self.transient_failures += other.transient_failures;
		self.unknown_status += other.unknown_status;
		self.failures.extend(other.failures);
	}

	/// Number of tiles processed, resolved or not.
	pub fn total(&self) -> u64 {
		self.fetched + self.absent + self.cached + self.transient_failures + self.unknown_status
	}

	/// Number of tiles left unresolved.
	pub fn unresolved(&self) -> u64 {
		self.transient_failures + self.unknown_status
	}
}

impl Display for FetchSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} fetched, {} absent, {} already cached, {} transient failures, {} unexpected statuses",
			self.fetched, self.absent, self.cached, self.transient_failures, self.unknown_status
		)
	}
}
