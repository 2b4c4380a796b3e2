//! Sequential per-venue item fetching folded into a capped result.
//!
//! Venues are fetched strictly one after another, in the order the search
//! ranked them. Each batch is folded into an [`Accumulator`]; the first batch
//! that would push the total past the cap is discarded whole and ends the run
//! successfully with the prefix accumulated so far.

use tracing::debug;

use crate::error::RunError;
use crate::model::{Venue, VenueItem};
use crate::run::RunToken;
use crate::service::FetchService;

/// Maximum number of items accumulated for one query.
pub const DEFAULT_CAP: usize = 10;

/// Continuation directive from one fold step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
	/// The batch was kept; fetch the next venue.
	Continue,
	/// The batch would overflow the cap and was discarded.
	Stop,
}

/// Why an aggregation run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
	/// Every venue's batch was folded in.
	Exhausted,
	/// A batch would have exceeded the cap.
	CapReached,
}

/// Final items for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatedResult {
	pub items: Vec<VenueItem>,
	pub stop: StopReason,
	/// Number of venues whose batches made it into `items`.
	pub venues_kept: usize,
}

impl AccumulatedResult {
	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn is_capped(&self) -> bool {
		self.stop == StopReason::CapReached
	}
}

/// Running total for one aggregation run.
#[derive(Debug, Clone)]
pub struct Accumulator {
	cap: usize,
	items: Vec<VenueItem>,
	venues_kept: usize,
}

impl Accumulator {
	pub fn new(cap: usize) -> Self {
		Self {
			cap,
			items: Vec::with_capacity(cap),
			venues_kept: 0,
		}
	}

	/// Folds one venue's batch, keeping it only if the total stays within the cap.
	pub fn fold(&mut self, batch: Vec<VenueItem>) -> Step {
		if self.items.len() + batch.len() > self.cap {
			return Step::Stop;
		}
		self.items.extend(batch);
		self.venues_kept += 1;
		Step::Continue
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn finish(self, stop: StopReason) -> AccumulatedResult {
		AccumulatedResult {
			items: self.items,
			stop,
			venues_kept: self.venues_kept,
		}
	}
}

/// Fetches venue items one venue at a time until the cap would be exceeded.
pub struct OrderedFanoutAggregator<'a> {
	fetch: &'a dyn FetchService,
	cap: usize,
}

impl<'a> OrderedFanoutAggregator<'a> {
	pub fn new(fetch: &'a dyn FetchService, cap: usize) -> Self {
		Self { fetch, cap }
	}

	/// Runs the fold over `venues`.
	///
	/// Returns [`RunError::Cancelled`] as soon as `token` is cancelled, dropping
	/// any fetch in flight. A fetch failure aborts the whole run.
	pub async fn run(&self, venues: &[Venue], token: &RunToken) -> Result<AccumulatedResult, RunError> {
		let generation = token.generation();
		let mut acc = Accumulator::new(self.cap);

		for venue in venues {
			if token.is_cancelled() {
				return Err(RunError::Cancelled);
			}

			let batch = tokio::select! {
				biased;
				_ = token.cancelled() => return Err(RunError::Cancelled),
				res = self.fetch.fetch_items(venue.id) => res.map_err(|source| RunError::Fetch { venue: venue.id, source })?,
			};

			let size = batch.len();
			match acc.fold(batch) {
				Step::Continue => {
					debug!(generation, venue = %venue, batch = size, total = acc.len(), "aggregate.fold");
				}
				Step::Stop => {
					debug!(generation, venue = %venue, batch = size, total = acc.len(), cap = self.cap, "aggregate.cap_reached");
					return Ok(acc.finish(StopReason::CapReached));
				}
			}
		}

		Ok(acc.finish(StopReason::Exhausted))
	}
}
