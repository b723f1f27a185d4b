//! Resource fetching for attribute kinds that load external data.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;
use url::Url;

use crate::value::Resource;

/// Failures reported by a [`Fetch`] implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
	#[error("unsupported scheme '{scheme}' in {url}")]
	UnsupportedScheme { scheme: String, url: Url },

	#[error("resource not found: {0}")]
	NotFound(Url),

	#[error("failed to read {url}: {source}")]
	Io {
		url: Url,
		#[source]
		source: Arc<std::io::Error>,
	},
}

/// Loads the resource at a resolved locator.
#[async_trait]
pub trait Fetch: Send + Sync {
	async fn fetch(&self, url: &Url) -> Result<Resource, FetchError>;
}

/// Resolves `value` against `base` following the URL standard.
///
/// Absolute values ignore the base. Without a base only absolute values
/// resolve.
pub fn resolve_locator(value: &str, base: Option<&Url>) -> Result<Url, url::ParseError> {
	match base {
		Some(base) => base.join(value),
		None => Url::parse(value),
	}
}

/// Reads `file://` locators from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

#[async_trait]
impl Fetch for FileFetcher {
	async fn fetch(&self, url: &Url) -> Result<Resource, FetchError> {
		if url.scheme() != "file" {
			return Err(FetchError::UnsupportedScheme {
				scheme: url.scheme().to_string(),
				url: url.clone(),
			});
		}
		let path = url.to_file_path().map_err(|()| FetchError::NotFound(url.clone()))?;
		match tokio::fs::read(&path).await {
			Ok(bytes) => Ok(Resource::new(url.clone(), bytes)),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(FetchError::NotFound(url.clone())),
			Err(err) => Err(FetchError::Io {
				url: url.clone(),
				source: Arc::new(err),
			}),
		}
	}
}

/// Serves resources from an in-memory table.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
	entries: RwLock<HashMap<Url, Bytes>>,
}

impl MemoryFetcher {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&self, url: Url, bytes: impl Into<Bytes>) {
		self.entries.write().insert(url, bytes.into());
	}

	pub fn with(self, url: Url, bytes: impl Into<Bytes>) -> Self {
		self.insert(url, bytes);
		self
	}
}

#[async_trait]
impl Fetch for MemoryFetcher {
	async fn fetch(&self, url: &Url) -> Result<Resource, FetchError> {
		let bytes = self.entries.read().get(url).cloned();
		bytes
			.map(|bytes| Resource::new(url.clone(), bytes))
			.ok_or_else(|| FetchError::NotFound(url.clone()))
	}
}
