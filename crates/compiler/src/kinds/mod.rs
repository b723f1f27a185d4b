//! Built-in element and attribute kinds.

mod boolean;
mod data;
mod image;
mod list;
mod number;
mod object;
mod scene;
mod symbol;

use std::sync::Arc;

pub use boolean::BooleanKind;
pub use data::DataKind;
pub use image::ImageKind;
pub use list::ListKind;
pub use number::NumberKind;
pub use object::ObjectKind;
pub use scene::{BitmapKind, ContainerKind, ShapeKind};
pub use symbol::{ConstructorKind, InstanceKind};

use crate::registry::Registry;

/// Associates every built-in kind with its documented names.
pub fn register_builtins(registry: &Registry) {
	registry.associate_attribute(Arc::new(BooleanKind), &["bool", "boolean"]);
	registry.associate_attribute(Arc::new(NumberKind), &["number", "int", "integer", "float"]);
	registry.associate_attribute(Arc::new(ConstructorKind), &["class", "constructor"]);
	registry.associate_attribute(Arc::new(InstanceKind), &["instance"]);
	registry.associate_attribute(Arc::new(ImageKind), &["img", "image"]);
	registry.associate_attribute(Arc::new(ListKind), &["array", "list"]);

	registry.associate_element(
		Arc::new(DataKind),
		&["data", "bool", "boolean", "number", "int", "integer", "float"],
	);
	registry.associate_element(Arc::new(ObjectKind), &["object"]);
	registry.associate_element(Arc::new(ContainerKind), &["container"]);
	registry.associate_element(Arc::new(ShapeKind), &["shape"]);
	registry.associate_element(Arc::new(BitmapKind), &["bitmap"]);

	tracing::debug!(tags = registry.tags().len(), types = registry.types().len(), "registry.builtins_registered");
}
