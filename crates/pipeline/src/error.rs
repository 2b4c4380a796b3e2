//! Error types for pipeline runs and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::VenueId;
use crate::service::ServiceError;

/// Reasons a pipeline run ends without a result.
///
/// Reaching the item cap is not an error; see [`crate::StopReason`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
	/// The venue search failed.
	#[error("search failed: {0}")]
	Search(#[source] ServiceError),

	/// Fetching one venue's items failed.
	#[error("fetching items for venue {venue} failed: {source}")]
	Fetch {
		/// Venue whose fetch failed.
		venue: VenueId,
		/// The collaborator failure.
		#[source]
		source: ServiceError,
	},

	/// The run task panicked or was torn down by the runtime.
	#[error("run task failed: {0}")]
	TaskFailed(String),

	/// The run was superseded or shut down.
	#[error("run cancelled")]
	Cancelled,
}

impl RunError {
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// A value is outside its accepted range.
	#[error("invalid configuration: {0}")]
	Invalid(String),
}
