use async_trait::async_trait;

use crate::attribute::{AttributeCompiler, AttributeKind};
use crate::error::CompileError;
use crate::fetch::resolve_locator;
use crate::value::Value;

/// `img` / `image`: loads the resource the value locates, relative to the
/// attribute's base.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageKind;

#[async_trait]
impl AttributeKind for ImageKind {
	fn name(&self) -> &'static str {
		"image"
	}

	async fn construct(&self, attr: &AttributeCompiler) -> Result<Value, CompileError> {
		let url = resolve_locator(attr.value().trim(), attr.base_uri()).map_err(|err| {
			tracing::debug!(value = attr.value(), error = %err, "image.invalid_locator");
			attr.mismatch()
		})?;
		let resource = attr.env().fetcher().fetch(&url).await?;
		tracing::trace!(url = %resource.url(), bytes = resource.bytes().len(), "image.loaded");
		Ok(Value::Resource(resource))
	}
}
