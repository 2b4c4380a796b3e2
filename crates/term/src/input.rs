//! Adapts line-oriented input into a stream of text edits.

use futures::Stream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Every stdin line is one edit of the search field.
pub fn stdin_edits() -> impl Stream<Item = String> {
	line_edits(BufReader::new(tokio::io::stdin()))
}

/// Streams lines from `reader` until EOF or the first read error.
pub fn line_edits<R>(reader: R) -> impl Stream<Item = String>
where
	R: AsyncBufRead + Unpin,
{
	futures::stream::unfold(reader.lines(), |mut lines| async move {
		match lines.next_line().await {
			Ok(Some(line)) => Some((line, lines)),
			Ok(None) => None,
			Err(error) => {
				tracing::warn!(%error, "input.read_failed");
				None
			}
		}
	})
}

#[cfg(test)]
mod tests {
	use futures::StreamExt;

	use super::*;

	#[tokio::test]
	async fn splits_lines_and_strips_terminators() {
		let input: &[u8] = b"pi\npizz\r\npizza";
		let edits: Vec<_> = line_edits(input).collect().await;
		assert_eq!(edits, vec!["pi", "pizz", "pizza"]);
	}

	#[tokio::test]
	async fn empty_input_yields_nothing() {
		let input: &[u8] = b"";
		let edits: Vec<String> = line_edits(input).collect().await;
		assert!(edits.is_empty());
	}
}
