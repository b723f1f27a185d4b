//! Attribute compilers: one raw attribute value to one typed [`Value`].

use std::sync::Arc;

use async_trait::async_trait;
use trellis_worker::TaskClass;
use url::Url;

use crate::environment::Environment;
use crate::error::CompileError;
use crate::unit::{Unit, UnitState};
use crate::value::Value;

/// Behaviour registered for one or more attribute type names.
///
/// Kinds are stateless and shared; per-attribute data lives on the
/// [`AttributeCompiler`] passed to every hook.
#[async_trait]
pub trait AttributeKind: Send + Sync + 'static {
	/// Short name used in logs and errors.
	fn name(&self) -> &'static str;

	fn pre_construct(&self, _attr: &AttributeCompiler) {}

	/// Produces the typed value. May suspend on I/O.
	async fn construct(&self, _attr: &AttributeCompiler) -> Result<Value, CompileError> {
		Err(CompileError::NotImplemented {
			kind: self.name(),
			hook: "construct",
		})
	}

	fn post_construct(&self, _attr: &AttributeCompiler, value: Value) -> Result<Value, CompileError> {
		Ok(value)
	}
}

/// Cache key of attribute compilers: equal triples share one compiler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeKey {
	pub name: Box<str>,
	pub ty: Box<str>,
	pub value: Box<str>,
}

impl AttributeKey {
	pub fn new(name: &str, ty: &str, value: &str) -> Self {
		Self {
			name: name.into(),
			ty: ty.trim().to_lowercase().into(),
			value: value.into(),
		}
	}
}

/// Compiles one (name, type, raw value) triple, at most once.
pub struct AttributeCompiler {
	key: AttributeKey,
	base: Option<Url>,
	kind: Arc<dyn AttributeKind>,
	env: Environment,
	unit: Unit<Value>,
}

impl std::fmt::Debug for AttributeCompiler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AttributeCompiler")
			.field("key", &self.key)
			.field("kind", &self.kind.name())
			.field("state", &self.unit.state())
			.finish()
	}
}

impl AttributeCompiler {
	pub(crate) fn new(key: AttributeKey, base: Option<Url>, kind: Arc<dyn AttributeKind>, env: Environment) -> Self {
		Self {
			key,
			base,
			kind,
			env,
			unit: Unit::new(),
		}
	}

	pub fn key(&self) -> &AttributeKey {
		&self.key
	}

	/// Name of the owning attribute.
	pub fn name(&self) -> &str {
		&self.key.name
	}

	/// Raw string value.
	pub fn value(&self) -> &str {
		&self.key.value
	}

	/// Declared type, lower-cased.
	pub fn ty(&self) -> &str {
		&self.key.ty
	}

	/// Locator relative references in the value resolve against.
	pub fn base_uri(&self) -> Option<&Url> {
		self.base.as_ref()
	}

	pub fn env(&self) -> &Environment {
		&self.env
	}

	/// Shorthand for a [`CompileError::TypeMismatch`] on this attribute.
	pub fn mismatch(&self) -> CompileError {
		CompileError::mismatch(self.name(), self.value(), self.ty())
	}

	/// Runs the kind's construction protocol once; later calls share the outcome.
	pub async fn process(self: &Arc<Self>) -> Result<Value, CompileError> {
		let this = Arc::clone(self);
		self.unit
			.process(TaskClass::Attribute, move || async move {
				this.kind.pre_construct(&this);
				let value = this.kind.construct(&this).await?;
				this.kind.post_construct(&this, value)
			})
			.await
	}

	pub fn result(&self) -> Option<Value> {
		self.unit.result()
	}

	pub fn state(&self) -> UnitState {
		self.unit.state()
	}
}
