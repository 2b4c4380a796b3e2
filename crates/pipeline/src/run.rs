use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Generation-scoped cancellation token for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunToken {
	generation: u64,
	stop: CancellationToken,
}

impl RunToken {
	/// A token for a run outside any pipeline, such as a direct aggregator call.
	pub fn detached(generation: u64) -> Self {
		Self {
			generation,
			stop: CancellationToken::new(),
		}
	}

	/// Which run this token belongs to; later runs carry larger values.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Whether the run was superseded, cancelled, or the pipeline shut down.
	pub fn is_cancelled(&self) -> bool {
		self.stop.is_cancelled()
	}

	/// Stops this run only; the clock's root and later runs are unaffected.
	pub fn cancel(&self) {
		self.stop.cancel();
	}

	/// Resolves once the run should stop. Raced against every search and fetch.
	pub async fn cancelled(&self) {
		self.stop.cancelled().await;
	}
}

/// Hands out run tokens and keeps exactly one of them live.
///
/// Every token is a child of the clock's root, so [`RunClock::shutdown`]
/// cancels whatever run is still in flight.
#[derive(Debug)]
pub struct RunClock {
	root: CancellationToken,
	generation: u64,
	live: Option<RunToken>,
}

impl Default for RunClock {
	fn default() -> Self {
		Self::new()
	}
}

impl RunClock {
	pub fn new() -> Self {
		Self {
			root: CancellationToken::new(),
			generation: 0,
			live: None,
		}
	}

	/// Cancels the live run and returns the token for the next generation.
	pub fn supersede(&mut self) -> RunToken {
		self.cancel_live();
		self.generation = self.generation.wrapping_add(1);
		let token = RunToken {
			generation: self.generation,
			stop: self.root.child_token(),
		};
		self.live = Some(token.clone());
		token
	}

	/// Cancels the live run, returning its generation.
	pub fn cancel_live(&mut self) -> Option<u64> {
		let live = self.live.take()?;
		live.cancel();
		Some(live.generation)
	}

	/// Marks the live run as finished without cancelling it.
	///
	/// Returns false when `generation` is not the live run.
	pub fn retire(&mut self, generation: u64) -> bool {
		if self.is_current(generation) {
			self.live = None;
			true
		} else {
			false
		}
	}

	/// Latest generation handed out, live or not.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Whether `generation` is the live, uncancelled run.
	pub fn is_current(&self, generation: u64) -> bool {
		self.live
			.as_ref()
			.is_some_and(|live| live.generation == generation && !live.is_cancelled())
	}

	/// Cancels every run, current and future.
	pub fn shutdown(&mut self) {
		self.root.cancel();
		self.live = None;
	}

	pub fn is_shut_down(&self) -> bool {
		self.root.is_cancelled()
	}
}

/// Spawns the task driving one pipeline run.
pub(crate) fn spawn_run<F>(generation: u64, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(generation, "scout.spawn_run");
	tokio::spawn(fut)
}
