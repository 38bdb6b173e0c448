use anyhow::{Context, Result, bail};
use std::{path::PathBuf, sync::Arc};
use tilesync::{
	DEFAULT_MAX_LEVEL, DEFAULT_MIN_LEVEL, SyncParameters,
	config::{Config, SyncConfig},
	open_reader, open_writer, sync_layer,
};
use tilesync_container::DriverRegistry;
use tilesync_core::GeoBBox;
use tilesync_derive::context;
use tilesync_geometry::AreaOfInterest;

const DEFAULT_LAYER: &str = "data";

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// source: a file, a directory or an http URL template with three %d
	#[arg(long, display_order = 0)]
	src: Option<String>,

	/// source driver, sniffed from --src if missing
	#[arg(long, display_order = 0)]
	src_driver: Option<String>,

	/// source layer, the first layer if missing
	#[arg(long, display_order = 0)]
	src_layer: Option<String>,

	/// destination: a file or a directory
	#[arg(long, display_order = 1)]
	dst: Option<String>,

	/// destination driver, sniffed from --dst if missing
	#[arg(long, display_order = 1)]
	dst_driver: Option<String>,

	/// destination layer [default: data]
	#[arg(long, display_order = 1)]
	dst_layer: Option<String>,

	/// minimum zoom level [default: 0]
	#[arg(long, value_name = "int", display_order = 2)]
	min_level: Option<u8>,

	/// maximum zoom level [default: 3]
	#[arg(long, value_name = "int", display_order = 2)]
	max_level: Option<u8>,

	/// area of interest as WKT or GeoJSON, inline or in a file [default: the whole world]
	#[arg(long, allow_hyphen_values = true, display_order = 2, conflicts_with = "bbox")]
	aoi: Option<String>,

	/// use a bounding box as area of interest
	#[arg(
		long,
		value_name = "lon_min,lat_min,lon_max,lat_max",
		allow_hyphen_values = true,
		display_order = 2
	)]
	bbox: Option<String>,

	/// clear each level and overwrite existing tiles
	#[arg(long, display_order = 3)]
	replace: bool,

	/// YAML job file. Command line arguments override its settings.
	#[arg(short = 'c', long, value_name = "FILE", display_order = 4)]
	config: Option<PathBuf>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let config = Config::from_optional_path(arguments.config.as_deref())?;
	let registry = DriverRegistry::with_http_timeout(config.http_timeout());

	let mut source = config.source.clone();
	source.override_optional_path(&arguments.src);
	source.override_optional_driver(&arguments.src_driver);
	source.override_optional_layer(&arguments.src_layer);

	let mut sync = config.sync.clone();
	merge_arguments(&mut sync, arguments);
	let parameters = get_parameters(&sync)?;

	let from = open_reader(&registry, &source).await?;
	let to = open_writer(&registry, &sync.destination, DEFAULT_LAYER).await?;
	eprintln!("sync from '{}' to '{}'", from.source_name(), to.source_name());

	let reports = sync_layer(from, to, &parameters).await?;
	let processed: u64 = reports.iter().map(|report| report.processed).sum();
	eprintln!("finished syncing, {processed} tiles written");

	Ok(())
}

fn merge_arguments(sync: &mut SyncConfig, arguments: &Subcommand) {
	sync.destination.override_optional_path(&arguments.dst);
	sync.destination.override_optional_driver(&arguments.dst_driver);
	sync.destination.override_optional_layer(&arguments.dst_layer);
	if arguments.min_level.is_some() {
		sync.min_level = arguments.min_level;
	}
	if arguments.max_level.is_some() {
		sync.max_level = arguments.max_level;
	}
	if arguments.aoi.is_some() || arguments.bbox.is_some() {
		sync.aoi.clone_from(&arguments.aoi);
		sync.bbox.clone_from(&arguments.bbox);
	}
	if arguments.replace {
		sync.replace = Some(true);
	}
}

#[context("invalid sync parameters")]
fn get_parameters(sync: &SyncConfig) -> Result<SyncParameters> {
	let area = match (&sync.aoi, &sync.bbox) {
		(Some(_), Some(_)) => bail!("use either an area of interest or a bounding box, not both"),
		(Some(aoi), None) => AreaOfInterest::from_path_or_text(aoi)?,
		(None, Some(bbox)) => AreaOfInterest::from_bbox(&bbox.parse::<GeoBBox>().context("parsing bbox")?),
		(None, None) => AreaOfInterest::world(),
	};
	Ok(SyncParameters {
		min_level: sync.min_level.unwrap_or(DEFAULT_MIN_LEVEL),
		max_level: sync.max_level.unwrap_or(DEFAULT_MAX_LEVEL),
		area: Arc::new(area),
		replace: sync.replace.unwrap_or(false),
	})
}
