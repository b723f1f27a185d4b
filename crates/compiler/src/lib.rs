//! Asynchronous compiler from markup trees to live object graphs.
//!
//! A [`DocumentCompiler`] walks a [`trellis_markup::Document`]. Every element
//! is handled by an [`ElementCompiler`] chosen by tag through the
//! [`Registry`], and every typed attribute by a shared [`AttributeCompiler`]
//! chosen by declared type. Each element processes its attributes, then its
//! children, then constructs itself; every step runs as its own task and is
//! awaited before the next one starts.
//!
//! Recoverable failures (a bad attribute value, an unknown child tag, a
//! failing child) are contained and recorded in the pass [`Diagnostics`].
//! Failures while constructing an element propagate to whoever awaits it.

#![cfg_attr(test, allow(unused_crate_dependencies))]

mod attribute;
mod completion;
mod diagnostics;
mod document;
mod element;
mod environment;
mod error;
mod fetch;
pub mod kinds;
mod namespace;
mod pass;
mod registry;
mod schema;
mod unit;
mod value;

pub use attribute::{AttributeCompiler, AttributeKey, AttributeKind};
pub use completion::{Completion, CompletionState};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use document::DocumentCompiler;
pub use element::{ElementCompiler, ElementKind};
pub use environment::Environment;
pub use error::{CompileError, ProtocolViolation, ReferenceKind};
pub use fetch::{Fetch, FetchError, FileFetcher, MemoryFetcher, resolve_locator};
pub use namespace::Namespace;
pub use pass::CompilePass;
pub use registry::{Association, Registry};
pub use schema::{AttributeDef, AttributeFlags, Schema};
pub use unit::{Unit, UnitState};
pub use value::{Constructor, Object, Resource, Value};

/// Re-exported so kind implementations need no direct dependency.
pub use async_trait::async_trait;
