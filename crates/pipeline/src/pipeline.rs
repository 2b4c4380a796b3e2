//! Latest-query pipeline driver.
//!
//! # Purpose
//!
//! * Turns raw text edits into committed queries and runs one search plus
//!   ordered aggregation per committed query.
//! * Delivers at most one [`PipelineEvent`] per run, and only for the newest
//!   run.
//!
//! # Mental model
//!
//! * The driver owns a [`RunClock`]. Each committed query supersedes the live
//!   run: its token is cancelled, its task aborted, and a new generation is
//!   spawned.
//! * A run task searches, then folds venue batches through
//!   [`OrderedFanoutAggregator`]. It never touches driver state; its outcome is
//!   returned through its `JoinHandle`.
//! * The driver settles a finished task only if its generation is still
//!   current on the clock.
//!
//! # Invariants
//!
//! * Must cancel the previous run before spawning the next one.
//! * Must never deliver an outcome whose generation is not current.
//! * Must never deliver [`RunError::Cancelled`].
//! * Must keep accepting queries after any run fails.
//! * Must stop delivering once [`LatestQueryPipeline::shutdown`] ran.
//!
//! # Concurrency & ordering
//!
//! * One driver, at most one live run task. Folding happens inside the run
//!   task and delivery decisions happen in the driver, so no state is shared.
//! * In [`LatestQueryPipeline::run`], pending input wins over a finished run:
//!   a newer edit supersedes a result that has not been delivered yet.
//!
//! # Failure modes & recovery
//!
//! * Search or fetch failure: delivered as [`PipelineEvent::Failed`] and logged;
//!   the next query runs normally, including a retry of the same text.
//! * Run task panic: delivered as [`RunError::TaskFailed`].
//! * Input stream ends: the live run finishes and delivers, then the pipeline
//!   shuts down.

use std::pin::pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, trace, warn};

use crate::aggregate::{AccumulatedResult, OrderedFanoutAggregator};
use crate::config::PipelineConfig;
use crate::error::RunError;
use crate::filter::QueryFilter;
use crate::model::Query;
use crate::run::{RunClock, RunToken, spawn_run};
use crate::service::{FetchService, SearchService};

type RunResult = Result<AccumulatedResult, RunError>;

/// Output of one surviving pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
	/// The run completed, possibly stopped early at the cap.
	Results {
		generation: u64,
		query: Query,
		result: AccumulatedResult,
	},
	/// A collaborator failed; no items are delivered for this query.
	Failed { generation: u64, query: Query, error: RunError },
}

impl PipelineEvent {
	pub fn generation(&self) -> u64 {
		match self {
			Self::Results { generation, .. } | Self::Failed { generation, .. } => *generation,
		}
	}

	pub fn query(&self) -> &Query {
		match self {
			Self::Results { query, .. } | Self::Failed { query, .. } => query,
		}
	}
}

struct LiveRun {
	generation: u64,
	query: Query,
	task: JoinHandle<RunResult>,
}

/// Switch-to-latest search pipeline.
pub struct LatestQueryPipeline {
	search: Arc<dyn SearchService>,
	fetch: Arc<dyn FetchService>,
	config: PipelineConfig,
	filter: QueryFilter,
	clock: RunClock,
	live: Option<LiveRun>,
}

impl LatestQueryPipeline {
	/// Builds a pipeline over the given collaborators.
	///
	/// `config` is used as given except for `min_query_len`, which the filter
	/// raises to 1 so empty text is never searched. Use
	/// [`PipelineConfig::validate`] to reject such values up front.
	pub fn new(search: Arc<dyn SearchService>, fetch: Arc<dyn FetchService>, config: PipelineConfig) -> Self {
		Self {
			search,
			fetch,
			filter: QueryFilter::new(config.min_query_len),
			config,
			clock: RunClock::new(),
			live: None,
		}
	}

	pub fn config(&self) -> &PipelineConfig {
		&self.config
	}

	/// Latest generation started.
	pub fn generation(&self) -> u64 {
		self.clock.generation()
	}

	/// Whether a run is in flight or finished but not yet settled.
	pub fn is_busy(&self) -> bool {
		self.live.is_some()
	}

	/// Offers one raw edit; starts a run if the filter commits it.
	///
	/// Returns the generation of the started run.
	pub fn push(&mut self, raw: &str) -> Option<u64> {
		let query = self.filter.offer(raw)?;
		self.commit(query)
	}

	/// Starts a run for `query`, superseding the live run.
	pub fn commit(&mut self, query: Query) -> Option<u64> {
		if self.clock.is_shut_down() {
			trace!(query = %query, "pipeline.commit_after_shutdown");
			return None;
		}

		self.abort_live();
		let token = self.clock.supersede();
		let generation = token.generation();
		debug!(generation, query = %query, "pipeline.run_start");

		let search = Arc::clone(&self.search);
		let fetch = Arc::clone(&self.fetch);
		let cap = self.config.cap;
		let run_query = query.clone();
		let task = spawn_run(generation, async move {
			execute(search.as_ref(), fetch.as_ref(), &run_query, cap, &token).await
		});

		self.live = Some(LiveRun { generation, query, task });
		Some(generation)
	}

	/// Cancels the live run without starting another.
	///
	/// The filter forgets the cancelled query, so the same text can be
	/// committed again.
	pub fn cancel(&mut self) {
		self.abort_live();
		self.clock.cancel_live();
		self.filter.reset();
	}

	/// Cancels all work; later commits are ignored.
	pub fn shutdown(&mut self) {
		self.abort_live();
		self.clock.shutdown();
	}

	/// Waits for the live run and returns its event.
	///
	/// Returns `None` when no run is live, or when the live run ended without
	/// anything to deliver.
	pub async fn next_event(&mut self) -> Option<PipelineEvent> {
		self.live.as_ref()?;
		let joined = join_live(&mut self.live).await;
		self.settle(joined)
	}

	/// Drives `edits` to completion, handing every delivered event to `consumer`.
	pub async fn run<S, C>(mut self, edits: S, mut consumer: C)
	where
		S: Stream<Item = String>,
		C: FnMut(PipelineEvent),
	{
		let mut edits = pin!(edits);
		let mut edits_open = true;

		loop {
			tokio::select! {
				biased;
				edit = edits.next(), if edits_open => match edit {
					Some(raw) => {
						self.push(&raw);
					}
					None => {
						debug!(generation = self.clock.generation(), "pipeline.input_closed");
						edits_open = false;
					}
				},
				joined = join_live(&mut self.live), if self.live.is_some() => {
					if let Some(event) = self.settle(joined) {
						consumer(event);
					}
				}
				else => break,
			}
		}

		self.shutdown();
	}

	fn abort_live(&mut self) {
		if let Some(live) = self.live.take() {
			debug!(generation = live.generation, query = %live.query, "pipeline.superseded");
			live.task.abort();
		}
	}

	fn settle(&mut self, joined: Result<RunResult, JoinError>) -> Option<PipelineEvent> {
		let LiveRun { generation, query, .. } = self.live.take()?;
		if !self.clock.retire(generation) {
			trace!(generation, "pipeline.stale_outcome");
			return None;
		}

		let result = joined.unwrap_or_else(|err| {
			if err.is_cancelled() {
				Err(RunError::Cancelled)
			} else {
				Err(RunError::TaskFailed(err.to_string()))
			}
		});

		match result {
			Ok(result) => {
				debug!(
					generation,
					query = %query,
					items = result.len(),
					capped = result.is_capped(),
					"pipeline.deliver"
				);
				Some(PipelineEvent::Results { generation, query, result })
			}
			Err(RunError::Cancelled) => {
				trace!(generation, "pipeline.run_cancelled");
				None
			}
			Err(error) => {
				warn!(generation, query = %query, %error, "pipeline.run_failed");
				self.filter.reset();
				Some(PipelineEvent::Failed { generation, query, error })
			}
		}
	}
}

impl Drop for LatestQueryPipeline {
	fn drop(&mut self) {
		self.shutdown();
	}
}

async fn join_live(live: &mut Option<LiveRun>) -> Result<RunResult, JoinError> {
	match live {
		Some(run) => (&mut run.task).await,
		None => std::future::pending().await,
	}
}

async fn execute(search: &dyn SearchService, fetch: &dyn FetchService, query: &Query, cap: usize, token: &RunToken) -> RunResult {
	let venues = tokio::select! {
		biased;
		_ = token.cancelled() => return Err(RunError::Cancelled),
		res = search.search(query) => res.map_err(RunError::Search)?,
	};
	debug!(generation = token.generation(), query = %query, venues = venues.len(), "pipeline.search_done");

	OrderedFanoutAggregator::new(fetch, cap).run(&venues, token).await
}
