//! Entry point: compiles a whole markup document.

use std::sync::{Arc, OnceLock};

use trellis_markup::{Document, Element};
use trellis_worker::TaskClass;
use url::Url;

use crate::diagnostics::Diagnostic;
use crate::element::ElementCompiler;
use crate::environment::Environment;
use crate::error::CompileError;
use crate::pass::CompilePass;
use crate::unit::{Unit, UnitState};
use crate::value::Value;

/// Compiles a [`Document`] through one [`CompilePass`].
///
/// ```no_run
/// # async fn demo(document: trellis_markup::Document) -> Result<(), trellis_compiler::CompileError> {
/// use trellis_compiler::{DocumentCompiler, Environment};
///
/// let env = Environment::default();
/// let compiler = DocumentCompiler::new(&env, document, None).process().await?;
/// println!("{:?}", compiler.result());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DocumentCompiler {
	document: Document,
	pass: Arc<CompilePass>,
	root: OnceLock<Arc<ElementCompiler>>,
	unit: Unit<Value>,
}

impl DocumentCompiler {
	/// The effective base is `base`, else the document's base, else the
	/// current directory.
	pub fn new(env: &Environment, document: Document, base: Option<Url>) -> Arc<Self> {
		let base = base.or_else(|| document.base_uri().cloned()).or_else(working_directory);
		tracing::debug!(base = ?base.as_ref().map(Url::as_str), root = document.root().tag(), "document.created");
		Arc::new(Self {
			pass: CompilePass::new(env.clone(), base),
			document,
			root: OnceLock::new(),
			unit: Unit::new(),
		})
	}

	/// Compiles the root element once. Later calls share the outcome.
	pub async fn process(self: &Arc<Self>) -> Result<Arc<Self>, CompileError> {
		let this = Arc::clone(self);
		self.unit
			.process(TaskClass::Document, move || async move {
				let root = this.pass.element(this.document.root())?;
				let root = this.root.get_or_init(|| root).clone();
				let outcome = root.process().await;
				match &outcome {
					Ok(_) => tracing::info!(
						root = root.tag(),
						elements = this.pass.element_count(),
						diagnostics = this.pass.diagnostics().len(),
						"document.compiled"
					),
					Err(err) => tracing::warn!(root = root.tag(), error = %err, "document.failed"),
				}
				outcome
			})
			.await?;
		Ok(Arc::clone(self))
	}

	/// The compiled root value.
	pub fn result(&self) -> Option<Value> {
		self.unit.result()
	}

	pub fn error(&self) -> Option<CompileError> {
		self.unit.error()
	}

	pub fn state(&self) -> UnitState {
		self.unit.state()
	}

	/// Root element compiler, once processing has resolved it.
	pub fn root(&self) -> Option<&Arc<ElementCompiler>> {
		self.root.get()
	}

	pub fn document(&self) -> &Document {
		&self.document
	}

	pub fn base_uri(&self) -> Option<&Url> {
		self.pass.base_uri()
	}

	pub fn pass(&self) -> &Arc<CompilePass> {
		&self.pass
	}

	/// Failures contained while compiling, in the order they happened.
	pub fn diagnostics(&self) -> Vec<Diagnostic> {
		self.pass.diagnostics().snapshot()
	}

	/// The compiler of `node` within this document's pass.
	pub fn element(&self, node: &Arc<Element>) -> Result<Arc<ElementCompiler>, CompileError> {
		self.pass.element(node)
	}
}

fn working_directory() -> Option<Url> {
	let dir = std::env::current_dir().ok()?;
	Url::from_directory_path(dir).ok()
}
