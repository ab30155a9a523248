//! Concurrency orchestration and per-tile fetch classification.
//!
//! The engine enumerates the configured bounding box once, splits the
//! coordinate sequence into contiguous shards (one per reserved-adjusted CPU
//! core), and runs every shard as an independent task. Within a shard, a
//! bounded pool of concurrent fetch tasks performs the per-tile operation:
//! on-disk state check, conditional HTTP GET, classified persistence.
//!
//! There is no coordination between tiles beyond the shared progress bar:
//! shards own disjoint coordinate ranges and every tile owns its directory,
//! so workers never contend on filesystem state.

use crate::fetch::{FetchSummary, TileOutcome, TileStore, split_into_shards};
use anyhow::{Context, Result, bail};
use futures::{StreamExt, stream};
use reqwest::{Client, StatusCode, Url};
use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	time::Duration,
};
use tilemirror_core::{TileBBox, TileCoord, progress::ProgressBar};

/// Upper bound on concurrent fetches within one shard.
const FETCH_POOL_SIZE: usize = 6;

/// Cores left free for the controlling process.
const RESERVED_CORES: usize = 2;

/// File extension requested from the remote endpoint.
const TILE_EXT: &str = "png";

/// Number of shard workers: the available parallelism minus a reserved
/// margin, but always at least one.
pub fn default_worker_count() -> usize {
	num_cpus::get().saturating_sub(RESERVED_CORES).max(1)
}

/// The concurrent fetch-and-persist engine for one mirror job.
pub struct FetchEngine {
	client: Client,
	base_url: String,
	store: TileStore,
	refetch: bool,
	worker_count: usize,
	cancel: Arc<AtomicBool>,
}

impl FetchEngine {
	/// Create an engine for the given endpoint, tile store and cache policy.
	///
	/// # Errors
	/// Returns an error if the base URL is malformed, uses a scheme other
	/// than `http`/`https`, or if the HTTP client cannot be constructed.
	pub fn new(base_url: &str, store: TileStore, refetch: bool) -> Result<FetchEngine> {
		let url = Url::parse(base_url).with_context(|| format!("invalid base url '{base_url}'"))?;
		match url.scheme() {
			"http" | "https" => (),
			other => bail!("unsupported URL scheme '{other}' in '{url}', expected 'http' or 'https'"),
		}

		let mut base_url = url.to_string();
		if !base_url.ends_with('/') {
			base_url.push('/');
		}

		let client = Client::builder()
			.tcp_keepalive(Duration::from_secs(600))
			.use_rustls_tls()
			.build()?;

		Ok(FetchEngine {
			client,
			base_url,
			store,
			refetch,
			worker_count: default_worker_count(),
			cancel: Arc::new(AtomicBool::new(false)),
		})
	}

	/// Override the number of shard workers.
	pub fn with_worker_count(mut self, worker_count: usize) -> FetchEngine {
		self.worker_count = worker_count.max(1);
		self
	}

	/// Shared cancellation flag. Once set, tiles that have not started their
	/// network request resolve as transient failures and the run drains to
	/// an orderly partial completion.
	pub fn cancel_flag(&self) -> Arc<AtomicBool> {
		Arc::clone(&self.cancel)
	}

	/// Fetch every tile of `bbox`, returning the aggregated outcome counts.
	///
	/// Per-tile anomalies never abort the run; they are reported in the
	/// summary and leave their tile unresolved for a future run.
	pub async fn run(&self, bbox: TileBBox) -> FetchSummary {
		let coords: Vec<TileCoord> = bbox.into_iter_coords().collect();
		log::info!(
			"fetching {} tiles at level {} from '{}' with {} workers",
			coords.len(),
			bbox.level,
			self.base_url,
			self.worker_count
		);

		let progress = ProgressBar::new("fetching tiles", coords.len() as u64);
		let shard_runs = split_into_shards(coords, self.worker_count)
			.into_iter()
			.map(|shard| self.run_shard(shard, progress.clone()));

		let mut summary = FetchSummary::default();
		for shard_summary in futures::future::join_all(shard_runs).await {
			summary.merge(shard_summary);
		}
		progress.finish();

		log::info!("done: {summary}");
		summary
	}

	async fn run_shard(&self, shard: Vec<TileCoord>, progress: ProgressBar) -> FetchSummary {
		stream::iter(shard)
			.map(|coord| {
				let client = self.client.clone();
				let base_url = self.base_url.clone();
				let store = self.store.clone();
				let refetch = self.refetch;
				let cancel = Arc::clone(&self.cancel);
				tokio::spawn(async move {
					let outcome = fetch_one(&client, &base_url, &store, coord, refetch, &cancel).await;
					(coord, outcome)
				})
			})
			.buffer_unordered(FETCH_POOL_SIZE)
			.fold(FetchSummary::default(), |mut summary, joined| {
				let progress = progress.clone();
				async move {
					match joined {
						Ok((coord, outcome)) => {
							log::trace!("{coord:?}: {outcome:?}");
							summary.record(coord, &outcome);
						}
						Err(e) => log::error!("fetch task failed to join: {e}"),
					}
					progress.inc(1);
					summary
				}
			})
			.await
	}
}

fn tile_url(base_url: &str, coord: &TileCoord) -> String {
	format!("{base_url}{}.{TILE_EXT}", coord.as_path())
}

/// Resolve a single tile against its on-disk record and the remote endpoint.
///
/// At most one network request is made. Every outcome is local to the tile:
/// failures are classified, logged, and returned, never propagated.
async fn fetch_one(
	client: &Client,
	base_url: &str,
	store: &TileStore,
	coord: TileCoord,
	refetch: bool,
	cancel: &AtomicBool,
) -> TileOutcome {
	if !refetch && store.lookup(&coord).is_some() {
		return TileOutcome::AlreadyCached;
	}

	if cancel.load(Ordering::Relaxed) {
		return TileOutcome::TransientFailure("cancelled before request".to_string());
	}

	let url = tile_url(base_url, &coord);
	let response = match client.get(&url).send().await {
		Ok(response) => response,
		Err(e) => {
			log::warn!("transport error fetching {coord:?} from '{url}': {e}");
			return TileOutcome::TransientFailure(e.to_string());
		}
	};

	match response.status() {
		StatusCode::OK => {
			let bytes = match response.bytes().await {
				Ok(bytes) => bytes,
				Err(e) => {
					log::warn!("failed to read body for {coord:?} from '{url}': {e}");
					return TileOutcome::TransientFailure(e.to_string());
				}
			};
			match store.write_image(&coord, &bytes) {
				Ok(()) => TileOutcome::Fetched(bytes.len() as u64),
				Err(e) => {
					log::error!("failed to persist tile {coord:?}: {e:#}");
					TileOutcome::TransientFailure(e.to_string())
				}
			}
		}
		StatusCode::NOT_FOUND => match store.write_marker(&coord) {
			Ok(()) => TileOutcome::Absent,
			Err(e) => {
				log::error!("failed to persist absence marker for {coord:?}: {e:#}");
				TileOutcome::TransientFailure(e.to_string())
			}
		},
		status => {
			log::error!("unexpected HTTP status {status} for '{url}'");
			TileOutcome::UnknownStatus(status.as_u16())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tile_urls_follow_endpoint_layout() {
		let coord = TileCoord::new(16, 58209, 25698).unwrap();
		assert_eq!(
			tile_url("https://tiles.example.org/layer/", &coord),
			"https://tiles.example.org/layer/16/58209/25698.png"
		);
	}

	#[test]
	fn base_url_gets_trailing_slash() {
		let engine = FetchEngine::new("https://tiles.example.org/layer", TileStore::new("/tmp/tiles"), false).unwrap();
		assert_eq!(engine.base_url, "https://tiles.example.org/layer/");

		let engine = FetchEngine::new("https://tiles.example.org/layer/", TileStore::new("/tmp/tiles"), false).unwrap();
		assert_eq!(engine.base_url, "https://tiles.example.org/layer/");
	}

	#[test]
	fn rejects_unsupported_schemes() {
		assert!(FetchEngine::new("ftp://tiles.example.org/", TileStore::new("/tmp/tiles"), false).is_err());
		assert!(FetchEngine::new("not a url", TileStore::new("/tmp/tiles"), false).is_err());
	}

	#[test]
	fn worker_count_is_reserved_adjusted_but_positive() {
		assert!(default_worker_count() >= 1);

		let engine = FetchEngine::new("http://localhost/", TileStore::new("/tmp/tiles"), false)
			.unwrap()
			.with_worker_count(0);
		assert_eq!(engine.worker_count, 1);
	}
}
