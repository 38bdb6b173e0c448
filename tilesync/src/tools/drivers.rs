use anyhow::Result;
use tilesync_container::DriverRegistry;

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true)]
pub struct Subcommand {}

pub fn run(_arguments: &Subcommand) -> Result<()> {
	for name in DriverRegistry::default().list() {
		println!("{name}");
	}
	Ok(())
}
