use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = maplejuris_api::Args::parse();
	maplejuris_api::run(args).await
}
