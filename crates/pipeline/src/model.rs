use std::fmt;
use std::hash::{Hash, Hasher};

/// Committed search text.
///
/// Queries compare by their full text; the filter decides which edits become
/// queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Query(String);

impl Query {
	pub fn new(text: impl Into<String>) -> Self {
		Self(text.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for Query {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Query {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Stable venue identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VenueId(pub u64);

impl fmt::Display for VenueId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Venue matched by a search. Identity is [`Venue::id`].
#[derive(Debug, Clone)]
pub struct Venue {
	pub id: VenueId,
	pub name: String,
}

impl Venue {
	pub fn new(id: VenueId, name: impl Into<String>) -> Self {
		Self { id, name: name.into() }
	}
}

impl PartialEq for Venue {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for Venue {}

impl Hash for Venue {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Display for Venue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Venue{}", self.id)
	}
}

/// Item belonging to one venue. Identity is [`VenueItem::id`].
#[derive(Debug, Clone)]
pub struct VenueItem {
	pub id: u64,
	pub name: String,
}

impl VenueItem {
	pub fn new(id: u64, name: impl Into<String>) -> Self {
		Self { id, name: name.into() }
	}
}

impl PartialEq for VenueItem {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for VenueItem {}

impl Hash for VenueItem {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Display for VenueItem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Item{}", self.id)
	}
}
