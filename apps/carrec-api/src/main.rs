use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = carrec_api::Args::parse();

	carrec_api::run(args).await
}
