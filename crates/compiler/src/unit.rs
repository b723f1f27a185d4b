//! Memoized once-only processing shared by every compiler.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use trellis_worker::TaskClass;

use crate::completion::{Completion, CompletionState};
use crate::error::CompileError;

/// Lifecycle of a [`Unit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
	Unprocessed,
	InFlight,
	Succeeded,
	Failed,
}

/// Runs a unit of work at most once and lets every caller observe its outcome.
///
/// The work is spawned as its own task, so it runs to completion even when the
/// caller that started it stops awaiting. Errors and panics both arrive through
/// the same `Result` as success.
#[derive(Debug)]
pub struct Unit<R> {
	started: AtomicBool,
	completion: Completion<R, CompileError>,
}

impl<R> Default for Unit<R> {
	fn default() -> Self {
		Self {
			started: AtomicBool::new(false),
			completion: Completion::new(),
		}
	}
}

impl<R> Unit<R>
where
	R: Clone + Send + Sync + 'static,
{
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts `work` on the first call; every call waits for the one outcome.
	pub async fn process<F, Fut>(&self, class: TaskClass, work: F) -> Result<R, CompileError>
	where
		F: FnOnce() -> Fut + Send + 'static,
		Fut: Future<Output = Result<R, CompileError>> + Send + 'static,
	{
		if !self.started.swap(true, Ordering::AcqRel) {
			// Built inside the task so a panicking `work` still settles.
			let task = trellis_worker::spawn(class, async move { work().await });
			let completion = self.completion.clone();
			trellis_worker::spawn(TaskClass::Settle, async move {
				let outcome = match task.await {
					Ok(outcome) => outcome,
					Err(err) => Err(CompileError::Aborted(trellis_worker::join_error_message(err))),
				};
				if let Err(err) = completion.settle(outcome) {
					tracing::error!(error = %err, "unit.settled_twice");
				}
			});
		}
		self.completion.wait().await
	}

	pub fn state(&self) -> UnitState {
		match self.completion.state() {
			CompletionState::Resolved => UnitState::Succeeded,
			CompletionState::Rejected => UnitState::Failed,
			CompletionState::Pending if self.started.load(Ordering::Acquire) => UnitState::InFlight,
			CompletionState::Pending => UnitState::Unprocessed,
		}
	}

	/// Returns the successful result.
	///
	/// Reading before the unit settled logs a warning and yields `None`, as
	/// does reading a failed unit.
	pub fn result(&self) -> Option<R> {
		match self.completion.peek() {
			Some(Ok(value)) => Some(value),
			Some(Err(_)) => None,
			None => {
				tracing::warn!(state = ?self.state(), "unit.result_read_before_settled");
				None
			}
		}
	}

	/// Returns the successful result without warning when unsettled.
	pub fn peek_success(&self) -> Option<R> {
		self.completion.peek().and_then(Result::ok)
	}

	/// Returns the failure, if the unit failed.
	pub fn error(&self) -> Option<CompileError> {
		self.completion.peek().and_then(Result::err)
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::AtomicUsize;

	use super::*;

	#[tokio::test]
	async fn work_runs_once_for_many_calls() {
		let unit = Arc::new(Unit::<u32>::new());
		let runs = Arc::new(AtomicUsize::new(0));
		assert_eq!(unit.state(), UnitState::Unprocessed);

		let mut outcomes = Vec::new();
		for _ in 0..5 {
			let runs = runs.clone();
			let outcome = unit
				.process(TaskClass::Element, move || async move {
					runs.fetch_add(1, Ordering::SeqCst);
					Ok(9)
				})
				.await;
			outcomes.push(outcome.unwrap());
		}

		assert_eq!(outcomes, vec![9; 5]);
		assert_eq!(runs.load(Ordering::SeqCst), 1);
		assert_eq!(unit.state(), UnitState::Succeeded);
		assert_eq!(unit.result(), Some(9));
	}

	#[tokio::test]
	async fn concurrent_callers_share_one_run() {
		let unit = Arc::new(Unit::<u32>::new());
		let runs = Arc::new(AtomicUsize::new(0));

		let callers: Vec<_> = (0..3)
			.map(|_| {
				let unit = unit.clone();
				let runs = runs.clone();
				tokio::spawn(async move {
					unit.process(TaskClass::Element, move || async move {
						runs.fetch_add(1, Ordering::SeqCst);
						tokio::task::yield_now().await;
						Ok(1)
					})
					.await
				})
			})
			.collect();

		for caller in callers {
			assert_eq!(caller.await.unwrap().unwrap(), 1);
		}
		assert_eq!(runs.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn failures_are_memoized_too() {
		let unit = Unit::<u32>::new();
		let first = unit
			.process(TaskClass::Attribute, || async { Err(CompileError::message("bad")) })
			.await;
		let second = unit.process(TaskClass::Attribute, || async { Ok(1) }).await;

		assert!(matches!(first, Err(CompileError::Message(ref m)) if m == "bad"));
		assert!(matches!(second, Err(CompileError::Message(ref m)) if m == "bad"));
		assert_eq!(unit.state(), UnitState::Failed);
		assert_eq!(unit.result(), None);
		assert!(unit.error().is_some());
	}

	#[tokio::test]
	async fn panics_become_aborted_failures() {
		let unit = Unit::<u32>::new();
		let outcome = unit
			.process(TaskClass::Attribute, || async {
				if true {
					panic!("kaboom");
				}
				Ok(0)
			})
			.await;
		assert!(matches!(outcome, Err(CompileError::Aborted(ref m)) if m.contains("kaboom")));
	}

	#[tokio::test]
	async fn panic_while_building_work_still_settles() {
		let unit = Unit::<u32>::new();
		let first = unit
			.process(TaskClass::Element, || -> std::future::Ready<Result<u32, CompileError>> {
				panic!("no future for you")
			})
			.await;
		assert!(matches!(first, Err(CompileError::Aborted(ref m)) if m.contains("no future for you")));
		assert_eq!(unit.state(), UnitState::Failed);

		let second = tokio::time::timeout(
			std::time::Duration::from_secs(5),
			unit.process(TaskClass::Element, || std::future::ready(Ok(1))),
		)
		.await
		.expect("second caller must observe the settled failure");
		assert!(matches!(second, Err(CompileError::Aborted(_))));
	}

	#[tokio::test]
	async fn dropped_caller_does_not_cancel_work() {
		let unit = Arc::new(Unit::<u32>::new());
		let (tx, rx) = tokio::sync::oneshot::channel::<()>();

		let caller = {
			let unit = unit.clone();
			tokio::spawn(async move {
				unit.process(TaskClass::Element, move || async move {
					let _ = rx.await;
					Ok(5)
				})
				.await
			})
		};
		while unit.state() != UnitState::InFlight {
			tokio::task::yield_now().await;
		}
		caller.abort();
		let _ = caller.await;

		tx.send(()).unwrap();
		assert_eq!(unit.process(TaskClass::Element, || async { Ok(0) }).await.unwrap(), 5);
	}

	#[derive(Clone, Default)]
	struct Captured(Arc<parking_lot::Mutex<Vec<u8>>>);

	impl std::io::Write for Captured {
		fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
			self.0.lock().extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn result_before_processing_warns_and_is_none() {
		let captured = Captured::default();
		let writer = captured.clone();
		let subscriber = tracing_subscriber::fmt()
			.with_max_level(tracing::Level::WARN)
			.with_ansi(false)
			.with_writer(move || writer.clone())
			.finish();

		let unit = Unit::<u32>::new();
		let result = tracing::subscriber::with_default(subscriber, || unit.result());
		assert_eq!(result, None);

		let logs = String::from_utf8(captured.0.lock().clone()).unwrap();
		assert!(logs.contains("unit.result_read_before_settled"), "missing warning in {logs:?}");
		assert!(logs.contains("Unprocessed"), "missing state field in {logs:?}");
	}
}
