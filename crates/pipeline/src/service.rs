//! Collaborator boundaries for searching venues and fetching their items.
//!
//! Both calls may be slow. Cancellation is expressed by dropping the returned
//! future, so implementations must not rely on running to completion.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Query, Venue, VenueId, VenueItem};

/// Failure reported by a [`SearchService`] or [`FetchService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
	/// The backend could not serve the request.
	#[error("service unavailable: {0}")]
	Unavailable(String),

	/// The venue is unknown to the backend.
	#[error("venue {0} not found")]
	NotFound(VenueId),

	/// The request failed in transit.
	#[error("transport error: {0}")]
	Transport(String),
}

/// Maps one query to the venues matching it, in rank order.
#[async_trait]
pub trait SearchService: Send + Sync + 'static {
	async fn search(&self, query: &Query) -> Result<Vec<Venue>, ServiceError>;
}

/// Maps one venue to the items belonging to it.
#[async_trait]
pub trait FetchService: Send + Sync + 'static {
	async fn fetch_items(&self, venue: VenueId) -> Result<Vec<VenueItem>, ServiceError>;
}
