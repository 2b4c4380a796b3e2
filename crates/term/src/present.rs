use scout_pipeline::{PipelineEvent, VenueItem};

/// `[Item101, Item102]`
pub fn format_items(items: &[VenueItem]) -> String {
	let names: Vec<String> = items.iter().map(ToString::to_string).collect();
	format!("[{}]", names.join(", "))
}

/// Prints results to stdout and failures to stderr.
pub fn print_event(event: PipelineEvent) {
	match event {
		PipelineEvent::Results { result, .. } => println!("{}", format_items(&result.items)),
		PipelineEvent::Failed { query, error, .. } => eprintln!("search for {query:?} failed: {error}"),
	}
}

#[cfg(test)]
mod tests {
	use scout_pipeline::{VenueId, items_for_venue};

	use super::*;

	#[test]
	fn formats_like_a_list() {
		let mut items = items_for_venue(VenueId(1), 2);
		items.extend(items_for_venue(VenueId(3), 1));
		assert_eq!(format_items(&items), "[Item100, Item101, Item300]");
		assert_eq!(format_items(&[]), "[]");
	}
}
