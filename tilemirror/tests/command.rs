use assert_cmd::{Command, cargo};
use predicates::str;
use rstest::rstest;

const BINARY_NAME: &str = "tilemirror";

#[test]
fn command() -> Result<(), Box<dyn std::error::Error>> {
	let mut cmd = Command::new(cargo::cargo_bin!("tilemirror"));
	cmd.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} [OPTIONS] <COMMAND>")));
	Ok(())
}

#[rstest]
#[case("fetch", "<CONFIG_FILE>")]
#[case("probe", "<DIRECTORY>")]
fn subcommand(#[case] sub_command: &str, #[case] usage: &str) -> Result<(), Box<dyn std::error::Error>> {
	Command::new(cargo::cargo_bin!("tilemirror"))
		.arg(sub_command)
		.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} {sub_command}")))
		.stderr(str::contains(usage));
	Ok(())
}

#[test]
fn fetch_rejects_missing_config() -> Result<(), Box<dyn std::error::Error>> {
	Command::new(cargo::cargo_bin!("tilemirror"))
		.args(["fetch", "/no/such/config.yml"])
		.assert()
		.failure()
		.stderr(str::contains("failed to open job configuration"));
	Ok(())
}

#[test]
fn probe_rejects_missing_directory() -> Result<(), Box<dyn std::error::Error>> {
	Command::new(cargo::cargo_bin!("tilemirror"))
		.args(["probe", "/no/such/tiles"])
		.assert()
		.failure()
		.stderr(str::contains("does not exist"));
	Ok(())
}
