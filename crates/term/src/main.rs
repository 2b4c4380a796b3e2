//! Scout terminal driver.
//!
//! Reads one edit of the search field per stdin line, runs the latest-query
//! pipeline against the simulated backend, and prints each delivered result.

mod cli;
mod input;
mod present;

use std::sync::Arc;

use clap::Parser;
use cli::Cli;
use scout_pipeline::{LatestQueryPipeline, SimulatedApi};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let config = cli.resolve_config()?;
	info!(
		cap = config.pipeline.cap,
		min_query_len = config.pipeline.min_query_len,
		latency_ms = config.simulation.latency_ms,
		"starting scout"
	);

	let api = Arc::new(SimulatedApi::from_config(&config.simulation));
	let pipeline = LatestQueryPipeline::new(api.clone(), api, config.pipeline);
	pipeline.run(input::stdin_edits(), present::print_event).await;

	info!("input closed; scout exiting");
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("scout_pipeline=trace,scout_term=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}
