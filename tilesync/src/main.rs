mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

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
	#[clap(alias = "init")]
	/// Copy tiles of an area from one store into another
	Sync(tools::sync::Subcommand),

	#[clap(alias = "server")]
	/// Serve the tiles of a layer via http
	Serve(tools::serve::Subcommand),

	/// List the available drivers
	Drivers(tools::drivers::Subcommand),

	/// List the layers of a tile store
	Layers(tools::layers::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Sync(arguments) => tools::sync::run(arguments),
		Commands::Serve(arguments) => tools::serve::run(arguments),
		Commands::Drivers(arguments) => tools::drivers::run(arguments),
		Commands::Layers(arguments) => tools::layers::run(arguments),
	}
}
