mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

// Define the command-line interface using the clap crate
#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	#[clap(alias = "download")]
	/// Mirror a rectangular tile range to a local directory tree
	Fetch(tools::fetch::Subcommand),

	/// Show record counts of a local tile tree
	Probe(tools::probe::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	// Initialize logger and set log level based on verbosity flag
	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Fetch(arguments) => tools::fetch::run(arguments),
		Commands::Probe(arguments) => tools::probe::run(arguments),
	}
}

#[cfg(test)]
mod tests {
	use crate::{Cli, run};
	use anyhow::Result;
	use clap::Parser;

	fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = Cli::try_parse_from(arg_vec)?;
		let msg = format!("{:?}", cli);
		run(cli)?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["tilemirror"]).unwrap_err().to_string();
		assert!(err.contains("Usage: tilemirror [OPTIONS] <COMMAND>"));
	}

	#[test]
	fn version() {
		let err = run_command(vec!["tilemirror", "-V"]).unwrap_err().to_string();
		assert!(err.starts_with("tilemirror "));
	}

	#[test]
	fn fetch_subcommand() {
		let output = run_command(vec!["tilemirror", "fetch"]).unwrap_err().to_string();
		assert!(output.starts_with("Mirror a rectangular tile range to a local directory tree"));
	}

	#[test]
	fn probe_subcommand() {
		let output = run_command(vec!["tilemirror", "probe"]).unwrap_err().to_string();
		assert!(output.starts_with("Show record counts of a local tile tree"));
	}
}
