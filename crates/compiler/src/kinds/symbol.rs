use async_trait::async_trait;

use crate::attribute::{AttributeCompiler, AttributeKind};
use crate::error::CompileError;
use crate::value::Value;

/// `class` / `constructor`: the value defined at a dotted namespace path.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstructorKind;

#[async_trait]
impl AttributeKind for ConstructorKind {
	fn name(&self) -> &'static str {
		"constructor"
	}

	async fn construct(&self, attr: &AttributeCompiler) -> Result<Value, CompileError> {
		attr.env().namespace().reflect(attr.value().trim())
	}
}

/// `instance`: calls the constructor defined at a dotted namespace path.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstanceKind;

#[async_trait]
impl AttributeKind for InstanceKind {
	fn name(&self) -> &'static str {
		"instance"
	}

	async fn construct(&self, attr: &AttributeCompiler) -> Result<Value, CompileError> {
		match attr.env().namespace().reflect(attr.value().trim())? {
			Value::Constructor(constructor) => Ok(constructor.call()),
			_ => Err(attr.mismatch()),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::attribute::AttributeKey;
	use crate::environment::Environment;
	use crate::error::ReferenceKind;
	use crate::namespace::Namespace;
	use crate::registry::Registry;
	use crate::value::Constructor;

	fn compile(kind: Arc<dyn AttributeKind>, ty: &str, value: &str) -> Arc<AttributeCompiler> {
		let namespace = Namespace::new();
		namespace.define("app.Controller", Constructor::object("app.Controller", "controller"), true);
		namespace.define("app.title", "Demo", true);
		let env = Environment::new(Arc::new(Registry::new())).with_namespace(Arc::new(namespace));
		Arc::new(AttributeCompiler::new(AttributeKey::new("c", ty, value), None, kind, env))
	}

	#[tokio::test]
	async fn constructor_reflects_symbols() {
		let value = compile(Arc::new(ConstructorKind), "class", "app.Controller").process().await.unwrap();
		assert!(matches!(value, Value::Constructor(ref c) if c.path() == "app.Controller"));

		let err = compile(Arc::new(ConstructorKind), "class", "app.Missing").process().await.unwrap_err();
		assert!(matches!(err, CompileError::UnresolvedReference { kind: ReferenceKind::Symbol, .. }));
	}

	#[tokio::test]
	async fn instance_calls_constructor() {
		let value = compile(Arc::new(InstanceKind), "instance", "app.Controller").process().await.unwrap();
		assert_eq!(value.as_object().map(|o| o.class()).as_deref(), Some("controller"));

		let err = compile(Arc::new(InstanceKind), "instance", "app.title").process().await.unwrap_err();
		assert!(matches!(err, CompileError::TypeMismatch { .. }));
	}
}
