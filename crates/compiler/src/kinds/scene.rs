//! Display-object elements consumed by scene-graph renderers.

use async_trait::async_trait;
use trellis_markup::Element;

use crate::element::{ElementCompiler, ElementKind};
use crate::error::CompileError;
use crate::schema::Schema;
use crate::value::{Object, Value};

const NUMBERS: &[&str] = &[
	"alpha", "cacheID", "id", "x", "y", "rotation", "scaleX", "scaleY", "regX", "regY", "skewX", "skewY",
];
const FLAGS: &[&str] = &["mouseEnabled", "visible", "snapToPixel", "tickEnabled", "lazy"];
const STRINGS: &[&str] = &["name", "cursor", "compositeOperation"];
const ARRAYS: &[&str] = &["filters", "transformMatrix"];

fn define_display(schema: &mut Schema) {
	for name in NUMBERS {
		schema.define(name, "number");
	}
	for name in FLAGS {
		schema.define(name, "bool");
	}
	for name in STRINGS {
		schema.define(name, "string");
	}
	for name in ARRAYS {
		schema.define(name, "array");
	}
	schema
		.define_attribute("reg", "number", false, false)
		.define_attribute("scale", "number", false, false)
		.define_attribute("controller", "instance", false, false)
		.define_attribute("href", "string", false, false);
}

/// Applies the shorthand attributes that auto-assign does not cover.
fn finish_display(compiler: &ElementCompiler, object: &Object) {
	if let Some(reg) = compiler.attribute("reg") {
		object.set("regX", reg.clone());
		object.set("regY", reg);
	}
	if let Some(scale) = compiler.attribute("scale") {
		object.set("scaleX", scale.clone());
		object.set("scaleY", scale);
	}
	if let Some(href) = compiler.attribute("href") {
		object.set("href", href);
	}
	if let Some(controller) = compiler.attribute("controller") {
		object.set("controller", controller);
	}
}

/// Display object holding other display objects.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerKind;

#[async_trait]
impl ElementKind for ContainerKind {
	fn name(&self) -> &'static str {
		"container"
	}

	fn define(&self, _element: &Element, schema: &mut Schema) {
		define_display(schema);
	}

	async fn post_construct(&self, compiler: &ElementCompiler, value: Value) -> Result<Value, CompileError> {
		let object = value
			.as_object()
			.ok_or_else(|| CompileError::message(format!("container built a {}", value.type_name())))?;
		finish_display(compiler, object);
		for child in compiler.child_results() {
			if matches!(child, Value::Object(_)) {
				object.push_child(child);
			}
		}
		Ok(value)
	}
}

/// Vector drawing leaf.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapeKind;

#[async_trait]
impl ElementKind for ShapeKind {
	fn name(&self) -> &'static str {
		"shape"
	}

	fn define(&self, _element: &Element, schema: &mut Schema) {
		define_display(schema);
	}

	async fn post_construct(&self, compiler: &ElementCompiler, value: Value) -> Result<Value, CompileError> {
		if let Some(object) = value.as_object() {
			finish_display(compiler, object);
		}
		Ok(value)
	}
}

/// Image leaf; `src` is loaded through the environment's fetcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapKind;

#[async_trait]
impl ElementKind for BitmapKind {
	fn name(&self) -> &'static str {
		"bitmap"
	}

	fn define(&self, _element: &Element, schema: &mut Schema) {
		define_display(schema);
		schema.define("src", "image");
	}

	async fn post_construct(&self, compiler: &ElementCompiler, value: Value) -> Result<Value, CompileError> {
		if let Some(object) = value.as_object() {
			finish_display(compiler, object);
		}
		Ok(value)
	}
}
