use async_trait::async_trait;

use crate::element::{ElementCompiler, ElementKind};
use crate::error::CompileError;
use crate::value::{Object, Value};

/// Generic record element.
///
/// Every resolved attribute becomes a property. A non-object child result
/// with a `name` attribute becomes a named property; other child results are
/// appended as children.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectKind;

#[async_trait]
impl ElementKind for ObjectKind {
	fn name(&self) -> &'static str {
		"object"
	}

	async fn construct(&self, compiler: &ElementCompiler) -> Result<Value, CompileError> {
		let object = Object::new(compiler.tag());
		for (name, value) in compiler.attributes() {
			object.set(&name, value);
		}
		Ok(object.into())
	}

	async fn post_construct(&self, compiler: &ElementCompiler, value: Value) -> Result<Value, CompileError> {
		let Some(object) = value.as_object() else {
			return Ok(value);
		};
		for child in compiler.children() {
			let Some(result) = child.result() else {
				continue;
			};
			match (child.element().attribute("name"), &result) {
				(_, Value::Object(_)) | (None, _) => object.push_child(result),
				(Some(name), _) => object.set(name, result),
			}
		}
		Ok(value)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use trellis_markup::Element;

	use super::*;
	use crate::environment::Environment;
	use crate::pass::CompilePass;

	#[tokio::test]
	async fn gathers_attributes_and_children() {
		let tree = Element::builder("object")
			.attr("title", "menu")
			.child(Element::builder("int").attr("name", "count").attr("value", "3"))
			.child(Element::builder("float").attr("value", "0.5"))
			.child(Element::builder("object").attr("name", "nested"))
			.build();
		let pass = CompilePass::new(Environment::default(), None);
		let value = pass.element(&tree).unwrap().process().await.unwrap();
		let object = value.as_object().unwrap();

		assert_eq!(object.get("title"), Some(Value::from("menu")));
		assert_eq!(object.get("count"), Some(Value::Int(3)));
		let children = object.children();
		assert_eq!(children.len(), 2);
		assert_eq!(children[0], Value::Float(0.5));
		assert_eq!(children[1].as_object().unwrap().get("name"), Some(Value::from("nested")));
	}
}
