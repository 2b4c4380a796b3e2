//! TOML configuration for the pipeline and the simulated backend.
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! [pipeline]
//! cap = 10
//! min_query_len = 4
//!
//! [simulation]
//! latency_ms = 3000
//! seed = 7
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::aggregate::DEFAULT_CAP;
use crate::error::ConfigError;
use crate::filter::DEFAULT_MIN_QUERY_LEN;

/// Settings for query filtering and aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
	/// Maximum number of items delivered for one query.
	pub cap: usize,
	/// Shortest edit, in grapheme clusters, that gets searched.
	pub min_query_len: usize,
}

impl PipelineConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.cap == 0 {
			return Err(ConfigError::Invalid("pipeline.cap must be greater than 0".into()));
		}
		if self.min_query_len == 0 {
			return Err(ConfigError::Invalid("pipeline.min_query_len must be greater than 0".into()));
		}
		Ok(())
	}
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self {
			cap: DEFAULT_CAP,
			min_query_len: DEFAULT_MIN_QUERY_LEN,
		}
	}
}

/// Settings for [`crate::SimulatedApi`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
	/// Delay applied to every simulated search and fetch.
	pub latency_ms: u64,
	/// Seed for item counts; `None` seeds from the OS.
	pub seed: Option<u64>,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self { latency_ms: 3000, seed: None }
	}
}

impl SimulationConfig {
	pub fn latency(&self) -> Duration {
		Duration::from_millis(self.latency_ms)
	}
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoutConfig {
	pub pipeline: PipelineConfig,
	pub simulation: SimulationConfig,
}

impl ScoutConfig {
	/// Parses and validates configuration from TOML text.
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a configuration file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		self.pipeline.validate()
	}
}
