//! Single-settlement completion primitive.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::ProtocolViolation;

/// Observable state of a [`Completion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionState {
	Pending,
	Resolved,
	Rejected,
}

impl fmt::Display for CompletionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Pending => "pending",
			Self::Resolved => "resolved",
			Self::Rejected => "rejected",
		})
	}
}

struct Inner<T, E> {
	outcome: Mutex<Option<Result<T, E>>>,
	notify: Notify,
}

/// A result holder that settles exactly once.
///
/// Handles are cheap clones of one shared slot. Any number of tasks may
/// [`wait`](Self::wait) on it; settling twice is a [`ProtocolViolation`].
pub struct Completion<T, E> {
	inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for Completion<T, E> {
	fn clone(&self) -> Self {
		Self { inner: self.inner.clone() }
	}
}

impl<T, E> Default for Completion<T, E> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T, E> fmt::Debug for Completion<T, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Completion").field("state", &self.state()).finish()
	}
}

impl<T, E> Completion<T, E> {
	pub fn new() -> Self {
		Self {
			inner: Arc::new(Inner {
				outcome: Mutex::new(None),
				notify: Notify::new(),
			}),
		}
	}

	#[must_use = "settling a completed primitive is a protocol violation"]
	pub fn resolve(&self, value: T) -> Result<(), ProtocolViolation> {
		self.settle(Ok(value))
	}

	#[must_use = "settling a completed primitive is a protocol violation"]
	pub fn reject(&self, reason: E) -> Result<(), ProtocolViolation> {
		self.settle(Err(reason))
	}

	/// Settles with either outcome.
	#[must_use = "settling a completed primitive is a protocol violation"]
	pub fn settle(&self, outcome: Result<T, E>) -> Result<(), ProtocolViolation> {
		{
			let mut slot = self.inner.outcome.lock();
			if let Some(existing) = slot.as_ref() {
				return Err(ProtocolViolation {
					state: state_of(existing),
				});
			}
			*slot = Some(outcome);
		}
		self.inner.notify.notify_waiters();
		Ok(())
	}

	pub fn state(&self) -> CompletionState {
		self.inner.outcome.lock().as_ref().map_or(CompletionState::Pending, state_of)
	}

	pub fn is_pending(&self) -> bool {
		self.state() == CompletionState::Pending
	}

	pub fn is_resolved(&self) -> bool {
		self.state() == CompletionState::Resolved
	}

	pub fn is_rejected(&self) -> bool {
		self.state() == CompletionState::Rejected
	}

	pub fn is_complete(&self) -> bool {
		!self.is_pending()
	}
}

impl<T: Clone, E: Clone> Completion<T, E> {
	/// Returns the outcome if already settled.
	pub fn peek(&self) -> Option<Result<T, E>> {
		self.inner.outcome.lock().clone()
	}

	/// Waits for settlement and returns a clone of the outcome.
	pub async fn wait(&self) -> Result<T, E> {
		loop {
			let notified = self.inner.notify.notified();
			tokio::pin!(notified);
			// Register before checking so a settle in between still wakes us.
			notified.as_mut().enable();
			if let Some(outcome) = self.peek() {
				return outcome;
			}
			notified.await;
		}
	}
}

fn state_of<T, E>(outcome: &Result<T, E>) -> CompletionState {
	match outcome {
		Ok(_) => CompletionState::Resolved,
		Err(_) => CompletionState::Rejected,
	}
}
