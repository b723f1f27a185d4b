//! Element compilers: one markup element to one constructed [`Value`].

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use trellis_markup::{Attribute, Element, NodeId};
use trellis_worker::TaskClass;
use url::Url;

use crate::diagnostics::Diagnostic;
use crate::error::CompileError;
use crate::pass::CompilePass;
use crate::schema::Schema;
use crate::unit::{Unit, UnitState};
use crate::value::{Object, Value};

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Behaviour registered for one or more element tags.
///
/// Kinds are stateless and shared by every element with a matching tag; the
/// per-element state lives on the [`ElementCompiler`] handed to each hook.
#[async_trait]
pub trait ElementKind: Send + Sync + 'static {
	/// Short name used in logs and errors.
	fn name(&self) -> &'static str;

	/// Declares the attribute schema. Runs once, when the compiler is created.
	fn define(&self, _element: &Element, _schema: &mut Schema) {}

	fn before_attributes(&self, _compiler: &ElementCompiler) {}

	fn after_attributes(&self, _compiler: &ElementCompiler) {}

	/// Builds the result once attributes and children have settled.
	async fn construct(&self, compiler: &ElementCompiler) -> Result<Value, CompileError> {
		Ok(Object::new(compiler.tag()).into())
	}

	/// Finishes the result, typically by gathering child results into it.
	async fn post_construct(&self, _compiler: &ElementCompiler, value: Value) -> Result<Value, CompileError> {
		Ok(value)
	}
}

/// Compiles one markup element: attributes, then children, then itself.
pub struct ElementCompiler {
	element: Arc<Element>,
	kind: Arc<dyn ElementKind>,
	owner: Weak<CompilePass>,
	schema: Schema,
	values: Mutex<IndexMap<Box<str>, Value>>,
	children: Mutex<Vec<Arc<ElementCompiler>>>,
	unit: Unit<Value>,
}

impl std::fmt::Debug for ElementCompiler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ElementCompiler")
			.field("node", &self.element.id())
			.field("tag", &self.element.tag())
			.field("kind", &self.kind.name())
			.field("state", &self.unit.state())
			.finish()
	}
}

impl ElementCompiler {
	pub(crate) fn new(element: Arc<Element>, kind: Arc<dyn ElementKind>, owner: Weak<CompilePass>) -> Self {
		let mut schema = Schema::new();
		kind.define(&element, &mut schema);
		Self {
			element,
			kind,
			owner,
			schema,
			values: Mutex::default(),
			children: Mutex::default(),
			unit: Unit::new(),
		}
	}

	pub fn id(&self) -> NodeId {
		self.element.id()
	}

	pub fn tag(&self) -> &str {
		self.element.tag()
	}

	pub fn element(&self) -> &Arc<Element> {
		&self.element
	}

	pub fn kind_name(&self) -> &'static str {
		self.kind.name()
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	/// The compile pass base when attached, otherwise the element's own base.
	pub fn base_uri(&self) -> Option<Url> {
		self.owner
			.upgrade()
			.and_then(|pass| pass.base_uri().cloned())
			.or_else(|| self.element.base_uri().cloned())
	}

	/// Stores a resolved value, bypassing any type coercion.
	pub fn set_attribute(&self, name: &str, value: impl Into<Value>) {
		self.values.lock().insert(name.into(), value.into());
	}

	pub fn has_attribute(&self, name: &str) -> bool {
		self.values.lock().contains_key(name)
	}

	pub fn attribute(&self, name: &str) -> Option<Value> {
		self.values.lock().get(name).cloned()
	}

	pub fn attribute_or(&self, name: &str, default: impl Into<Value>) -> Value {
		self.attribute(name).unwrap_or_else(|| default.into())
	}

	/// Snapshot of the resolved values in insertion order.
	pub fn attributes(&self) -> Vec<(String, Value)> {
		self.values.lock().iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
	}

	/// Compilers of the children visited so far, in document order.
	pub fn children(&self) -> Vec<Arc<ElementCompiler>> {
		self.children.lock().clone()
	}

	/// Results of the children that compiled successfully, in document order.
	pub fn child_results(&self) -> Vec<Value> {
		self.children().iter().filter_map(|child| child.unit.peek_success()).collect()
	}

	/// Runs the processing algorithm once; later calls share the outcome.
	pub async fn process(self: &Arc<Self>) -> Result<Value, CompileError> {
		let this = Arc::clone(self);
		let pass = self.owner.upgrade();
		self.unit
			.process(TaskClass::Element, move || -> BoxFuture<Result<Value, CompileError>> {
				match pass {
					Some(pass) => this.run(pass),
					None => Box::pin(async { Err(CompileError::Detached) }),
				}
			})
			.await
	}

	pub fn result(&self) -> Option<Value> {
		self.unit.result()
	}

	/// The failure, if processing failed.
	pub fn error(&self) -> Option<CompileError> {
		self.unit.error()
	}

	pub fn state(&self) -> UnitState {
		self.unit.state()
	}

	/// Descendant compilers whose tag matches, in pre-order.
	pub fn query_by_tag(&self, tag: &str) -> Result<Vec<Arc<ElementCompiler>>, CompileError> {
		let pass = self.pass()?;
		self.element
			.descendants()
			.filter(|e| e.tag().eq_ignore_ascii_case(tag))
			.map(|e| pass.element(e))
			.collect()
	}

	/// First descendant compiler whose raw `id` attribute equals `id`.
	pub fn query_by_id(&self, id: &str) -> Result<Option<Arc<ElementCompiler>>, CompileError> {
		let pass = self.pass()?;
		self.element
			.descendants()
			.find(|e| e.attribute("id") == Some(id))
			.map(|e| pass.element(e))
			.transpose()
	}

	fn pass(&self) -> Result<Arc<CompilePass>, CompileError> {
		self.owner.upgrade().ok_or(CompileError::Detached)
	}

	// Boxed so the recursion through child `process` calls has a named type.
	fn run(self: Arc<Self>, pass: Arc<CompilePass>) -> BoxFuture<Result<Value, CompileError>> {
		Box::pin(async move {
			self.kind.before_attributes(&self);
			for attr in self.element.attributes() {
				self.process_attribute(&pass, attr).await?;
			}
			self.kind.after_attributes(&self);

			for child in self.element.children() {
				self.process_child(&pass, child).await;
			}

			self.construct().await
		})
	}

	async fn process_attribute(&self, pass: &Arc<CompilePass>, attr: &Attribute) -> Result<(), CompileError> {
		let ty = self.schema.get(attr.name()).map_or("string", |def| def.ty());
		if ty == "string" {
			self.set_attribute(attr.name(), attr.value());
			return Ok(());
		}

		let compiler = match pass.attribute(attr.name(), attr.value(), ty, self.element.base_uri()) {
			Ok(compiler) => compiler,
			Err(err) => {
				self.record_attribute(pass, attr.name(), err);
				return Ok(());
			}
		};

		let step = trellis_worker::defer(TaskClass::Attribute, async move { compiler.process().await });
		match joined(step.await) {
			Ok(value) => self.set_attribute(attr.name(), value),
			Err(err) if err.is_fatal() => return Err(err),
			Err(err) => self.record_attribute(pass, attr.name(), err),
		}
		Ok(())
	}

	async fn process_child(&self, pass: &Arc<CompilePass>, child: &Arc<Element>) {
		let compiler = match pass.element(child) {
			Ok(compiler) => compiler,
			Err(err) => {
				record_child(pass, child, err);
				return;
			}
		};

		for name in self.schema.forwarded() {
			if let Some(value) = self.attribute(name) {
				compiler.set_attribute(name, value);
			}
		}

		let step = {
			let compiler = compiler.clone();
			trellis_worker::defer(TaskClass::Element, async move { compiler.process().await })
		};
		if let Err(err) = joined(step.await) {
			record_child(pass, child, err);
		}
		self.children.lock().push(compiler);
	}

	async fn construct(&self) -> Result<Value, CompileError> {
		let value = self
			.kind
			.construct(self)
			.await
			.map_err(|err| CompileError::construction(self.tag(), err))?;

		if let Value::Object(object) = &value {
			self.auto_assign(object);
		}

		self.kind
			.post_construct(self, value)
			.await
			.map_err(|err| CompileError::construction(self.tag(), err))
	}

	fn auto_assign(&self, object: &Object) {
		let values = self.values.lock();
		for (name, def) in self.schema.iter() {
			if !def.auto_assign() {
				continue;
			}
			if let Some(value) = values.get(name) {
				object.set(name, value.clone());
			}
		}
	}

	fn record_attribute(&self, pass: &CompilePass, attribute: &str, error: CompileError) {
		pass.diagnostics().push(Diagnostic {
			node: self.id(),
			tag: self.tag().into(),
			attribute: Some(attribute.into()),
			error,
		});
	}
}

fn record_child(pass: &CompilePass, child: &Element, error: CompileError) {
	pass.diagnostics().push(Diagnostic {
		node: child.id(),
		tag: child.tag().into(),
		attribute: None,
		error,
	});
}

fn joined<T>(outcome: Result<Result<T, CompileError>, tokio::task::JoinError>) -> Result<T, CompileError> {
	outcome.unwrap_or_else(|err| Err(CompileError::Aborted(trellis_worker::join_error_message(err))))
}
