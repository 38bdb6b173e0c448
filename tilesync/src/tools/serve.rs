use anyhow::Result;
use std::path::PathBuf;
use tilesync::{
	config::Config,
	open_reader,
	server::{DEFAULT_IP, TileServer},
};
use tilesync_container::DriverRegistry;
use tokio::time::{Duration, sleep};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// source: a file, a directory or an http URL template with three %d
	#[arg(long, display_order = 0)]
	pub src: Option<String>,

	/// source driver, sniffed from --src if missing
	#[arg(long, display_order = 0)]
	pub src_driver: Option<String>,

	/// source layer, the first layer if missing
	#[arg(long, display_order = 0)]
	pub src_layer: Option<String>,

	/// Serve via socket ip. Default: 0.0.0.0
	#[arg(short = 'i', long, display_order = 1)]
	pub ip: Option<String>,

	/// Serve via port. Default: 8085
	#[arg(short, long, display_order = 1)]
	pub port: Option<u16>,

	/// requested rows count from the top (OSM) instead of the bottom (TMS)
	#[arg(long, display_order = 1)]
	pub zero_is_top: bool,

	/// YAML job file. Command line arguments override its settings.
	#[arg(short = 'c', long, value_name = "FILE", display_order = 2)]
	pub config: Option<PathBuf>,

	/// Shutdown server automatically after x milliseconds.
	#[arg(long, display_order = 3)]
	pub auto_shutdown: Option<u64>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let config = Config::from_optional_path(arguments.config.as_deref())?;
	let registry = DriverRegistry::with_http_timeout(config.http_timeout());

	let mut source = config.source.clone();
	source.override_optional_path(&arguments.src);
	source.override_optional_driver(&arguments.src_driver);
	source.override_optional_layer(&arguments.src_layer);

	let mut server_config = config.server.clone();
	server_config.override_optional_ip(&arguments.ip);
	server_config.override_optional_port(&arguments.port);
	server_config.override_optional_zero_is_top(&arguments.zero_is_top.then_some(true));

	let reader = open_reader(&registry, &source).await?;
	let mut server = TileServer::from_config(&server_config, reader.clone());
	server.start().await?;
	eprintln!(
		"serving '{}' at http://{}:{}/",
		reader.source_name(),
		server_config.ip.as_deref().unwrap_or(DEFAULT_IP),
		server.port()
	);

	if let Some(milliseconds) = arguments.auto_shutdown {
		sleep(Duration::from_millis(milliseconds)).await;
	} else {
		loop {
			sleep(Duration::from_secs(60)).await;
		}
	}

	server.stop().await;
	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::tests::run_command;
	use anyhow::Result;
	use assert_fs::{TempDir, prelude::*};

	#[test]
	fn serve_folder() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("layer").create_dir_all()?;
		run_command(vec![
			"tilesync",
			"serve",
			"--src",
			dir.path().to_str().unwrap(),
			"-i",
			"127.0.0.1",
			"-p",
			"0",
			"--zero-is-top",
			"--auto-shutdown",
			"300",
		])?;
		Ok(())
	}

	#[test]
	fn serve_from_job_file() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/layer").create_dir_all()?;
		dir.child("job.yml")
			.write_str("source:\n  path: tiles\nserver:\n  ip: 127.0.0.1\n  port: 0\n")?;
		let job = dir.child("job.yml").path().to_string_lossy().to_string();
		run_command(vec!["tilesync", "serve", "-c", &job, "--auto-shutdown", "300"])?;
		Ok(())
	}

	#[test]
	fn missing_source() {
		let err = run_command(vec!["tilesync", "serve", "-p", "0", "--auto-shutdown", "1"]).unwrap_err();
		assert_eq!(err.to_string(), "no source path given");
	}
}
