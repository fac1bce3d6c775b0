use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = bella_api::Args::parse();

	bella_api::run(args).await
}
