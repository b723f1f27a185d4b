use std::sync::Arc;

use crate::fetch::{Fetch, FileFetcher};
use crate::namespace::Namespace;
use crate::registry::Registry;

/// Process-wide collaborators shared by reference into every compile pass.
#[derive(Clone)]
pub struct Environment {
	registry: Arc<Registry>,
	namespace: Arc<Namespace>,
	fetcher: Arc<dyn Fetch>,
}

impl std::fmt::Debug for Environment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Environment")
			.field("registry", &self.registry)
			.field("namespace", &self.namespace)
			.finish_non_exhaustive()
	}
}

impl Default for Environment {
	fn default() -> Self {
		Self::new(Arc::new(Registry::with_builtins()))
	}
}

impl Environment {
	/// Uses `registry`, an empty namespace and [`FileFetcher`].
	pub fn new(registry: Arc<Registry>) -> Self {
		Self {
			registry,
			namespace: Arc::new(Namespace::new()),
			fetcher: Arc::new(FileFetcher),
		}
	}

	pub fn with_namespace(mut self, namespace: Arc<Namespace>) -> Self {
		self.namespace = namespace;
		self
	}

	pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetch>) -> Self {
		self.fetcher = fetcher;
		self
	}

	pub fn registry(&self) -> &Arc<Registry> {
		&self.registry
	}

	pub fn namespace(&self) -> &Arc<Namespace> {
		&self.namespace
	}

	pub fn fetcher(&self) -> &Arc<dyn Fetch> {
		&self.fetcher
	}
}
