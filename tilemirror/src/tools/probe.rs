use anyhow::Result;
use tilemirror::fetch::TileStore;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// root of a local tile tree to inspect
	#[arg()]
	directory: String,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let store = TileStore::new(&arguments.directory);
	let scan = store.scan()?;

	for (level, stats) in &scan.levels {
		println!("zoom {level:>2}: {} tiles, {} absent", stats.images, stats.markers);
	}

	let totals = scan.totals();
	println!("total:   {} tiles, {} absent", totals.images, totals.markers);

	Ok(())
}
