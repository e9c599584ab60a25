use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use carrec_service::RecommendService;
use carrec_storage::db::Db;

/// Rebuilds the vehicle index from the catalog database and exits.
#[derive(Debug, Parser)]
#[command(
	version = carrec_cli::VERSION,
	rename_all = "kebab",
	styles = carrec_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = carrec_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	tracing::info!(
		config = %args.config.display(),
		index_path = %config.storage.index.path.display(),
		"Starting index build."
	);

	let db = Db::connect(&config.storage.postgres).await?;
	let service = RecommendService::new(config, db);
	let report = service.build_index(None).await?;

	println!("{}", serde_json::to_string_pretty(&report)?);

	Ok(())
}
