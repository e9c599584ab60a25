use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = carrec_indexer::Args::parse();

	carrec_indexer::run(args).await
}
