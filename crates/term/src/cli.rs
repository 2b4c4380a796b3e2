use std::path::PathBuf;

use clap::Parser;
use scout_pipeline::{ConfigError, ScoutConfig};

#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(about = "Search venues as you type; one edit per stdin line")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// TOML configuration file
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Maximum number of items printed per query
	#[arg(long)]
	pub cap: Option<usize>,

	/// Shortest edit, in grapheme clusters, that triggers a search
	#[arg(long)]
	pub min_query_len: Option<usize>,

	/// Simulated backend latency in milliseconds
	#[arg(long)]
	pub latency_ms: Option<u64>,

	/// Seed for simulated item counts
	#[arg(long)]
	pub seed: Option<u64>,

	/// Verbose logging
	#[arg(long, short = 'v')]
	pub verbose: bool,
}

impl Cli {
	/// Loads the config file, if any, and applies flag overrides on top.
	pub fn resolve_config(&self) -> Result<ScoutConfig, ConfigError> {
		let mut config = match &self.config {
			Some(path) => ScoutConfig::load(path)?,
			None => ScoutConfig::default(),
		};

		if let Some(cap) = self.cap {
			config.pipeline.cap = cap;
		}
		if let Some(min_query_len) = self.min_query_len {
			config.pipeline.min_query_len = min_query_len;
		}
		if let Some(latency_ms) = self.latency_ms {
			config.simulation.latency_ms = latency_ms;
		}
		if self.seed.is_some() {
			config.simulation.seed = self.seed;
		}

		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_without_flags() {
		let cli = Cli::parse_from(["scout"]);
		let config = cli.resolve_config().expect("default config is valid");
		assert_eq!(config, ScoutConfig::default());
		assert!(!cli.verbose);
	}

	#[test]
	fn flags_override_defaults() {
		let cli = Cli::parse_from(["scout", "--cap", "5", "--min-query-len", "2", "--latency-ms", "10", "--seed", "3", "-v"]);
		let config = cli.resolve_config().expect("config is valid");
		assert_eq!(config.pipeline.cap, 5);
		assert_eq!(config.pipeline.min_query_len, 2);
		assert_eq!(config.simulation.latency_ms, 10);
		assert_eq!(config.simulation.seed, Some(3));
		assert!(cli.verbose);
	}

	#[test]
	fn zero_cap_flag_is_rejected() {
		let cli = Cli::parse_from(["scout", "--cap", "0"]);
		assert!(matches!(cli.resolve_config(), Err(ConfigError::Invalid(_))));
	}
}
