//! Per-pass record of contained failures.

use parking_lot::Mutex;
use trellis_markup::NodeId;

use crate::error::CompileError;

/// One recoverable failure that a compile pass contained.
#[derive(Debug, Clone)]
pub struct Diagnostic {
	/// Element whose processing recorded the failure.
	pub node: NodeId,
	pub tag: Box<str>,
	/// Set for attribute failures; `None` for child element failures.
	pub attribute: Option<Box<str>>,
	pub error: CompileError,
}

/// Collects contained failures so callers can inspect exactly what went wrong.
#[derive(Debug, Default)]
pub struct Diagnostics {
	entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a failure and logs it as a warning.
	pub fn push(&self, diagnostic: Diagnostic) {
		match diagnostic.attribute.as_deref() {
			Some(attribute) => tracing::warn!(
				node = %diagnostic.node,
				tag = %diagnostic.tag,
				attribute,
				error = %diagnostic.error,
				"compile.attribute_failed"
			),
			None => tracing::warn!(
				node = %diagnostic.node,
				tag = %diagnostic.tag,
				error = %diagnostic.error,
				"compile.child_failed"
			),
		}
		self.entries.lock().push(diagnostic);
	}

	pub fn snapshot(&self) -> Vec<Diagnostic> {
		self.entries.lock().clone()
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}
}
