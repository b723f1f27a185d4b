use async_trait::async_trait;
use trellis_markup::Element;

use crate::element::{ElementCompiler, ElementKind};
use crate::error::CompileError;
use crate::schema::Schema;
use crate::value::Value;

/// Scalar element whose result is its typed `value` attribute.
///
/// The value type is the tag itself (`<int value="3">`) or, for `<data>`, the
/// raw `type` attribute.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataKind;

#[async_trait]
impl ElementKind for DataKind {
	fn name(&self) -> &'static str {
		"data"
	}

	fn define(&self, element: &Element, schema: &mut Schema) {
		let tag = element.tag().to_lowercase();
		let ty = match tag.as_str() {
			"data" => element.attribute("type").unwrap_or("string"),
			other => other,
		};
		schema.define("name", "string").define("type", "string").define("value", ty);
	}

	async fn construct(&self, compiler: &ElementCompiler) -> Result<Value, CompileError> {
		Ok(compiler.attribute_or("value", Value::Null))
	}
}
