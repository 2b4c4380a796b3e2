//! Latest-query venue search with ordered, capped item aggregation.
//!
//! Raw text edits flow through a [`QueryFilter`] into a [`LatestQueryPipeline`].
//! Every committed query starts a new pipeline run that searches for venues,
//! then fetches each venue's items one venue at a time through the
//! [`OrderedFanoutAggregator`] until the item cap would be exceeded. Starting a
//! run cancels the previous one; only the newest run can deliver a
//! [`PipelineEvent`].
//!
//! Collaborators are injected as [`SearchService`] and [`FetchService`] trait
//! objects. [`SimulatedApi`] implements both with fixed latency and random item
//! counts.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use scout_pipeline::{LatestQueryPipeline, PipelineConfig, PipelineEvent, SimulatedApi};
//!
//! # async fn demo() {
//! let api = Arc::new(SimulatedApi::default());
//! let mut pipeline = LatestQueryPipeline::new(api.clone(), api, PipelineConfig::default());
//! pipeline.push("coffee");
//! if let Some(PipelineEvent::Results { result, .. }) = pipeline.next_event().await {
//! 	assert!(result.len() <= 10);
//! }
//! # }
//! ```

mod aggregate;
mod config;
mod error;
mod filter;
mod model;
mod pipeline;
mod run;
mod service;
mod sim;

#[cfg(test)]
mod testing;

pub use aggregate::{AccumulatedResult, Accumulator, DEFAULT_CAP, OrderedFanoutAggregator, Step, StopReason};
pub use config::{PipelineConfig, ScoutConfig, SimulationConfig};
pub use error::{ConfigError, RunError};
pub use filter::{DEFAULT_MIN_QUERY_LEN, QueryFilter};
pub use model::{Query, Venue, VenueId, VenueItem};
pub use pipeline::{LatestQueryPipeline, PipelineEvent};
pub use run::{RunClock, RunToken};
pub use service::{FetchService, SearchService, ServiceError};
pub use sim::{MAX_ITEMS_PER_VENUE, SimulatedApi, items_for_venue, sample_venues};
