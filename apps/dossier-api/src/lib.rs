pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf};

use clap::{
	Parser,
	builder::{Styles, styling::AnsiColor},
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

const HELP_STYLES: Styles = Styles::styled()
	.header(AnsiColor::Yellow.on_default().bold())
	.usage(AnsiColor::Yellow.on_default().bold())
	.literal(AnsiColor::Green.on_default().bold())
	.placeholder(AnsiColor::Cyan.on_default())
	.error(AnsiColor::Red.on_default().bold());

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab", styles = HELP_STYLES)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = dossier_config::load(&args.config)?;

	init_tracing(&config)?;

	// Loopback enforcement for trusted-header mode already ran during config validation.
	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let auth_mode = config.security.auth_mode.clone();
	let state = AppState::new(config).await?;
	let app = routes::router(state);
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, %auth_mode, "HTTP server listening.");

	axum::serve(listener, app).await?;

	Ok(())
}

fn init_tracing(config: &dossier_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).try_init().map_err(|err| {
		color_eyre::eyre::eyre!("Failed to install tracing subscriber: {err}")
	})?;

	Ok(())
}
