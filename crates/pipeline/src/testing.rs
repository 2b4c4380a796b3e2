//! Scripted collaborators for pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::model::{Query, Venue, VenueId, VenueItem};
use crate::service::{FetchService, SearchService, ServiceError};
use crate::sim::items_for_venue;

pub fn venues(ids: &[u64]) -> Vec<Venue> {
	ids.iter().map(|&id| Venue::new(VenueId(id), format!("venue{id}"))).collect()
}

pub fn ids(items: &[VenueItem]) -> Vec<u64> {
	items.iter().map(|item| item.id).collect()
}

/// Search backend answering from a per-query script.
#[derive(Default)]
pub struct ScriptedSearch {
	answers: HashMap<String, (Duration, Result<Vec<Venue>, ServiceError>)>,
	calls: Mutex<Vec<String>>,
	completed: Mutex<Vec<String>>,
}

impl ScriptedSearch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn answer(mut self, query: &str, latency: Duration, venue_ids: &[u64]) -> Self {
		self.answers.insert(query.to_string(), (latency, Ok(venues(venue_ids))));
		self
	}

	pub fn fail(mut self, query: &str, latency: Duration, error: ServiceError) -> Self {
		self.answers.insert(query.to_string(), (latency, Err(error)));
		self
	}

	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().clone()
	}

	pub fn completed(&self) -> Vec<String> {
		self.completed.lock().clone()
	}
}

#[async_trait]
impl SearchService for ScriptedSearch {
	async fn search(&self, query: &Query) -> Result<Vec<Venue>, ServiceError> {
		self.calls.lock().push(query.to_string());
		let (latency, answer) = self
			.answers
			.get(query.as_str())
			.cloned()
			.unwrap_or((Duration::ZERO, Ok(Vec::new())));
		tokio::time::sleep(latency).await;
		self.completed.lock().push(query.to_string());
		answer
	}
}

#[derive(Clone)]
enum FetchScript {
	Batch(usize),
	Fail(ServiceError),
}

/// Item backend returning fixed batch sizes per venue.
pub struct ScriptedFetch {
	latency: Duration,
	scripts: HashMap<VenueId, FetchScript>,
	calls: Mutex<Vec<VenueId>>,
	completed: Mutex<Vec<VenueId>>,
	in_flight: AtomicUsize,
	max_in_flight: AtomicUsize,
}

impl ScriptedFetch {
	pub fn new(latency: Duration) -> Self {
		Self {
			latency,
			scripts: HashMap::new(),
			calls: Mutex::new(Vec::new()),
			completed: Mutex::new(Vec::new()),
			in_flight: AtomicUsize::new(0),
			max_in_flight: AtomicUsize::new(0),
		}
	}

	/// Venues `1..=sizes.len()` return batches of the given sizes, in order.
	pub fn with_sizes(latency: Duration, sizes: &[usize]) -> Self {
		sizes
			.iter()
			.enumerate()
			.fold(Self::new(latency), |fetch, (index, &size)| fetch.batch(index as u64 + 1, size))
	}

	pub fn batch(mut self, venue: u64, size: usize) -> Self {
		self.scripts.insert(VenueId(venue), FetchScript::Batch(size));
		self
	}

	pub fn fail(mut self, venue: u64, error: ServiceError) -> Self {
		self.scripts.insert(VenueId(venue), FetchScript::Fail(error));
		self
	}

	pub fn calls(&self) -> Vec<u64> {
		self.calls.lock().iter().map(|id| id.0).collect()
	}

	pub fn completed(&self) -> Vec<u64> {
		self.completed.lock().iter().map(|id| id.0).collect()
	}

	pub fn max_in_flight(&self) -> usize {
		self.max_in_flight.load(Ordering::SeqCst)
	}
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
	fn drop(&mut self) {
		self.0.fetch_sub(1, Ordering::SeqCst);
	}
}

#[async_trait]
impl FetchService for ScriptedFetch {
	async fn fetch_items(&self, venue: VenueId) -> Result<Vec<VenueItem>, ServiceError> {
		self.calls.lock().push(venue);
		let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
		self.max_in_flight.fetch_max(now, Ordering::SeqCst);
		let _guard = InFlight(&self.in_flight);

		tokio::time::sleep(self.latency).await;
		self.completed.lock().push(venue);
		match self.scripts.get(&venue).cloned().unwrap_or(FetchScript::Batch(0)) {
			FetchScript::Batch(size) => Ok(items_for_venue(venue, size)),
			FetchScript::Fail(error) => Err(error),
		}
	}
}
