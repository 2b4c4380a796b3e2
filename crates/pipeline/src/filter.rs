use futures::{Stream, StreamExt, future};
use tracing::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

use crate::model::Query;

/// Shortest text, in grapheme clusters, worth searching for.
pub const DEFAULT_MIN_QUERY_LEN: usize = 4;

/// Turns raw text edits into committed queries.
///
/// Text shorter than the minimum length is dropped, and text equal to the last
/// committed query is not committed again.
#[derive(Debug, Clone)]
pub struct QueryFilter {
	min_len: usize,
	last: Option<Query>,
}

impl Default for QueryFilter {
	fn default() -> Self {
		Self::new(DEFAULT_MIN_QUERY_LEN)
	}
}

impl QueryFilter {
	/// `min_len` is raised to 1; empty text is never a query.
	pub fn new(min_len: usize) -> Self {
		Self {
			min_len: min_len.max(1),
			last: None,
		}
	}

	pub fn min_len(&self) -> usize {
		self.min_len
	}

	/// Offers one edit, returning the query if it should be searched.
	pub fn offer(&mut self, raw: &str) -> Option<Query> {
		let len = raw.graphemes(true).count();
		if len < self.min_len {
			trace!(len, min_len = self.min_len, "query.too_short");
			return None;
		}
		if self.last.as_ref().is_some_and(|last| last.as_str() == raw) {
			trace!(query = raw, "query.unchanged");
			return None;
		}

		let query = Query::new(raw);
		debug!(query = %query, "query.committed");
		self.last = Some(query.clone());
		Some(query)
	}

	/// Forgets the last committed query.
	pub fn reset(&mut self) {
		self.last = None;
	}

	/// Applies the filter lazily to a stream of edits.
	pub fn filter_stream<S>(self, edits: S) -> impl Stream<Item = Query>
	where
		S: Stream<Item = String>,
	{
		edits
			.scan(self, |filter, raw| future::ready(Some(filter.offer(&raw))))
			.filter_map(future::ready)
	}
}
