use std::fmt;
use std::sync::Arc;

use crate::completion::CompletionState;
use crate::fetch::FetchError;

/// A completion primitive was settled a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("completion already settled as {state}")]
pub struct ProtocolViolation {
	/// State the completion was already in.
	pub state: CompletionState,
}

/// What an [`CompileError::UnresolvedReference`] failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
	/// An element tag with no registered element kind.
	Tag,
	/// An attribute type with no registered attribute kind.
	Type,
	/// A dotted path with nothing defined in the namespace.
	Symbol,
}

impl fmt::Display for ReferenceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Tag => "tag",
			Self::Type => "attribute type",
			Self::Symbol => "symbol",
		})
	}
}

/// Errors produced while compiling markup.
///
/// Cloneable because one settled outcome is observed by every waiter of a
/// processing unit.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompileError {
	#[error(transparent)]
	Protocol(#[from] ProtocolViolation),

	/// A kind left a required hook unimplemented.
	#[error("{kind} does not implement {hook}")]
	NotImplemented { kind: &'static str, hook: &'static str },

	/// A raw attribute value could not be coerced to its declared type.
	#[error("attribute [{name}=\"{value}\"] could not be parsed to {ty}")]
	TypeMismatch { name: Box<str>, value: Box<str>, ty: Box<str> },

	#[error("unresolved {kind} '{name}'")]
	UnresolvedReference { kind: ReferenceKind, name: Box<str> },

	/// `construct` or `post_construct` of an element kind failed.
	#[error("<{tag}> failed to construct: {source}")]
	ConstructionFailure {
		tag: Box<str>,
		#[source]
		source: Arc<CompileError>,
	},

	#[error(transparent)]
	Fetch(#[from] FetchError),

	/// The task running a step panicked or was cancelled.
	#[error("compile step aborted: {0}")]
	Aborted(String),

	/// An element compiler was processed after its compile pass was dropped.
	#[error("element compiler outlived its compile pass")]
	Detached,

	#[error("{0}")]
	Message(String),
}

impl CompileError {
	pub fn message(msg: impl Into<String>) -> Self {
		Self::Message(msg.into())
	}

	pub(crate) fn unresolved(kind: ReferenceKind, name: &str) -> Self {
		Self::UnresolvedReference { kind, name: name.into() }
	}

	pub(crate) fn mismatch(name: &str, value: &str, ty: &str) -> Self {
		Self::TypeMismatch {
			name: name.into(),
			value: value.into(),
			ty: ty.into(),
		}
	}

	/// Wraps a construction-phase error, leaving already wrapped ones alone.
	pub(crate) fn construction(tag: &str, err: CompileError) -> Self {
		match err {
			err @ Self::ConstructionFailure { .. } => err,
			err => Self::ConstructionFailure {
				tag: tag.into(),
				source: Arc::new(err),
			},
		}
	}

	/// Programmer errors that no phase contains.
	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::Protocol(_) | Self::NotImplemented { .. } | Self::Detached)
	}
}
