//! Simulated venue backend with fixed latency and random item counts.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::SimulationConfig;
use crate::model::{Query, Venue, VenueId, VenueItem};
use crate::service::{FetchService, SearchService, ServiceError};

/// Upper bound on items the simulation returns per venue.
pub const MAX_ITEMS_PER_VENUE: usize = 5;

const SAMPLE_VENUE_COUNT: u64 = 11;

/// The fixed venue list every simulated search returns.
pub fn sample_venues() -> Vec<Venue> {
	(1..=SAMPLE_VENUE_COUNT)
		.map(|id| Venue::new(VenueId(id), format!("venue{id}")))
		.collect()
}

/// Items `id * 100 + i` for `i in 0..count`.
///
/// Ids saturate at `u64::MAX` for venue ids above `u64::MAX / 100`.
pub fn items_for_venue(venue: VenueId, count: usize) -> Vec<VenueItem> {
	(0..count as u64)
		.map(|offset| {
			let id = venue.0.saturating_mul(100).saturating_add(offset);
			VenueItem::new(id, format!("item {id}"))
		})
		.collect()
}

/// Backend that ignores the query text and waits `latency` before answering.
pub struct SimulatedApi {
	latency: Duration,
	rng: Mutex<StdRng>,
}

impl Default for SimulatedApi {
	fn default() -> Self {
		Self::from_config(&SimulationConfig::default())
	}
}

impl SimulatedApi {
	pub fn new(latency: Duration, seed: Option<u64>) -> Self {
		let rng = match seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		};
		Self {
			latency,
			rng: Mutex::new(rng),
		}
	}

	pub fn from_config(config: &SimulationConfig) -> Self {
		Self::new(config.latency(), config.seed)
	}

	pub fn latency(&self) -> Duration {
		self.latency
	}

	fn latency_ms(&self) -> u64 {
		u64::try_from(self.latency.as_millis()).unwrap_or(u64::MAX)
	}
}

#[async_trait]
impl SearchService for SimulatedApi {
	async fn search(&self, query: &Query) -> Result<Vec<Venue>, ServiceError> {
		debug!(query = %query, latency_ms = self.latency_ms(), "simulated.search");
		tokio::time::sleep(self.latency).await;
		Ok(sample_venues())
	}
}

#[async_trait]
impl FetchService for SimulatedApi {
	async fn fetch_items(&self, venue: VenueId) -> Result<Vec<VenueItem>, ServiceError> {
		let count = self.rng.lock().random_range(1..=MAX_ITEMS_PER_VENUE);
		debug!(venue = %venue, count, latency_ms = self.latency_ms(), "simulated.fetch_items");
		tokio::time::sleep(self.latency).await;
		Ok(items_for_venue(venue, count))
	}
}
