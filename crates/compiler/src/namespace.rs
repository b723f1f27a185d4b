//! Dotted-path symbol namespace.

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

use crate::error::{CompileError, ReferenceKind};
use crate::value::Value;

#[derive(Debug, Default)]
struct Scope {
	entries: HashMap<Box<str>, Entry>,
}

#[derive(Debug)]
enum Entry {
	Scope(Scope),
	Value(Value),
}

impl Scope {
	fn lookup(&self, path: &str) -> Option<&Entry> {
		let mut parts = path.split('.');
		let mut entry = self.entries.get(parts.next()?)?;
		for part in parts {
			match entry {
				Entry::Scope(scope) => entry = scope.entries.get(part)?,
				Entry::Value(_) => return None,
			}
		}
		Some(entry)
	}
}

/// Process-wide symbol root that `class`, `constructor` and `instance`
/// attributes resolve against.
#[derive(Debug, Default)]
pub struct Namespace {
	root: RwLock<Scope>,
}

impl Namespace {
	pub fn new() -> Self {
		Self::default()
	}

	/// Defines `value` at `path`, creating intermediate scopes.
	///
	/// Returns `false` without changes when the path holds a value and
	/// `overwrite` is off, when it holds a scope, or when a prefix of the path
	/// already holds a value.
	pub fn define(&self, path: &str, value: impl Into<Value>, overwrite: bool) -> bool {
		let mut parts: Vec<&str> = path.split('.').collect();
		let Some(last) = parts.pop().filter(|p| !p.is_empty()) else {
			return false;
		};

		let mut root = self.root.write();
		let mut scope = &mut *root;
		for part in parts {
			let entry = scope
				.entries
				.entry(part.into())
				.or_insert_with(|| Entry::Scope(Scope::default()));
			match entry {
				Entry::Scope(next) => scope = next,
				Entry::Value(_) => return false,
			}
		}

		match scope.entries.get(last) {
			Some(Entry::Scope(_)) => {
				tracing::warn!(path, "namespace.scope_not_replaced");
				return false;
			}
			Some(Entry::Value(_)) if !overwrite => return false,
			_ => {}
		}
		scope.entries.insert(last.into(), Entry::Value(value.into()));
		true
	}

	/// Whether anything, value or scope, lives at `path`.
	pub fn defined(&self, path: &str) -> bool {
		!path.is_empty() && self.root.read().lookup(path).is_some()
	}

	/// Returns the value at `path`.
	pub fn reflect(&self, path: &str) -> Result<Value, CompileError> {
		let root = self.root.read();
		match root.lookup(path) {
			Some(Entry::Value(value)) => Ok(value.clone()),
			Some(Entry::Scope(_)) => Err(CompileError::mismatch(path, path, "symbol")),
			None => Err(CompileError::unresolved(ReferenceKind::Symbol, path)),
		}
	}
}
