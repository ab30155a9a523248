use anyhow::{Result, ensure};
use std::{path::Path, sync::atomic::Ordering};
use tilemirror::config::JobConfig;
use tilemirror::fetch::{FetchEngine, TileStore};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// path to the YAML job configuration
	#[arg()]
	config_file: String,

	/// override the output directory from the configuration
	#[arg(long, value_name = "DIR", display_order = 1)]
	output_dir: Option<String>,

	/// ignore existing on-disk tile records and re-fetch every tile
	#[arg(long, display_order = 1)]
	refetch: bool,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let config = JobConfig::from_path(Path::new(&arguments.config_file))?;

	// a malformed range fails here, before any network or filesystem work
	let bbox = config.job.tile.to_bbox()?;

	let output_dir = arguments
		.output_dir
		.clone()
		.map_or(config.output.dir.clone(), Into::into);
	let refetch = arguments.refetch || config.job.refetch;

	if let Some(path) = &config.job.metadata_file {
		log::debug!("metadata file {path:?} is noted but not parsed");
	}

	eprintln!(
		"mirroring {} tiles at zoom {} from {:?} into {:?}",
		bbox.count_tiles(),
		bbox.level,
		config.job.url,
		output_dir
	);

	let engine = FetchEngine::new(&config.job.url, TileStore::new(output_dir), refetch)?;

	let cancel = engine.cancel_flag();
	ctrlc::set_handler(move || {
		log::warn!("interrupt received, draining in-flight tiles");
		cancel.store(true, Ordering::Relaxed);
	})?;

	let summary = engine.run(bbox).await;
	eprintln!("{summary}");

	for (coord, reason) in &summary.failures {
		log::warn!("unresolved tile {coord:?}: {reason}");
	}
	ensure!(
		summary.unresolved() == 0,
		"{} of {} tiles left unresolved, re-run to pick them up",
		summary.unresolved(),
		summary.total()
	);

	Ok(())
}
