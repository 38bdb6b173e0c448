use anyhow::Result;
use futures::future::try_join_all;
use tilesync_container::DriverRegistry;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// file, directory or http URL template with three %d
	#[arg()]
	source: String,

	/// driver to open the source with, sniffed from the source if missing
	#[arg(long, short)]
	driver: Option<String>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let registry = DriverRegistry::default();
	let source = registry
		.open_auto(arguments.driver.as_deref(), &arguments.source)
		.await?;
	let names = source.list_layers().await?;
	let layers = try_join_all(names.iter().map(|name| source.open_layer(name))).await?;
	for (name, layer) in names.iter().zip(layers) {
		println!("{name}\t{}", layer.tile_format());
	}
	Ok(())
}
