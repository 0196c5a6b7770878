use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = dossier_api::Args::parse();

	dossier_api::run(args).await
}
