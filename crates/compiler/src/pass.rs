//! Per-document compile context: instance caches and diagnostics.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;
use trellis_markup::{Element, NodeId};
use url::Url;

use crate::attribute::{AttributeCompiler, AttributeKey};
use crate::diagnostics::Diagnostics;
use crate::element::ElementCompiler;
use crate::environment::Environment;
use crate::error::CompileError;

/// State owned by one compile pass.
///
/// Separate passes never share caches, so concurrently compiled documents
/// cannot observe each other's compilers.
#[derive(Debug)]
pub struct CompilePass {
	env: Environment,
	base: Option<Url>,
	elements: Mutex<HashMap<NodeId, Arc<ElementCompiler>>>,
	attributes: Mutex<HashMap<AttributeKey, Arc<AttributeCompiler>>>,
	diagnostics: Diagnostics,
}

impl CompilePass {
	pub fn new(env: Environment, base: Option<Url>) -> Arc<Self> {
		Arc::new(Self {
			env,
			base,
			elements: Mutex::default(),
			attributes: Mutex::default(),
			diagnostics: Diagnostics::new(),
		})
	}

	pub fn env(&self) -> &Environment {
		&self.env
	}

	/// Effective base locator of the document being compiled.
	pub fn base_uri(&self) -> Option<&Url> {
		self.base.as_ref()
	}

	pub fn diagnostics(&self) -> &Diagnostics {
		&self.diagnostics
	}

	/// Returns the one element compiler for `node`, creating it on first use.
	pub fn element(self: &Arc<Self>, node: &Arc<Element>) -> Result<Arc<ElementCompiler>, CompileError> {
		if let Some(existing) = self.elements.lock().get(&node.id()) {
			return Ok(existing.clone());
		}

		let kind = self.env.registry().element_kind(node.tag())?;
		// Built outside the lock: schema definition runs kind code.
		let compiler = Arc::new(ElementCompiler::new(node.clone(), kind, Arc::downgrade(self)));
		let mut elements = self.elements.lock();
		Ok(elements.entry(node.id()).or_insert(compiler).clone())
	}

	/// Returns the attribute compiler shared by every attribute with the same
	/// name, type and raw value.
	pub fn attribute(&self, name: &str, value: &str, ty: &str, base: Option<&Url>) -> Result<Arc<AttributeCompiler>, CompileError> {
		let key = AttributeKey::new(name, ty, value);
		if let Some(existing) = self.attributes.lock().get(&key) {
			return Ok(existing.clone());
		}

		let kind = self.env.registry().attribute_kind(&key.ty)?;
		let base = self.base.as_ref().or(base).cloned();
		let compiler = Arc::new(AttributeCompiler::new(key.clone(), base, kind, self.env.clone()));
		let mut attributes = self.attributes.lock();
		Ok(attributes.entry(key).or_insert(compiler).clone())
	}

	/// Number of cached element compilers.
	pub fn element_count(&self) -> usize {
		self.elements.lock().len()
	}
}
