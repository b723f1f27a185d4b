//! Name → kind registries for element tags and attribute types.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

use crate::attribute::AttributeKind;
use crate::element::ElementKind;
use crate::error::{CompileError, ReferenceKind};

/// Outcome of registering one name.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Association {
	/// Name was new.
	Inserted,
	/// Name existed; the new kind replaced the old one.
	Replaced,
}

struct Associations<K: ?Sized> {
	label: ReferenceKind,
	by_name: RwLock<HashMap<Box<str>, Arc<K>>>,
}

impl<K: ?Sized> Associations<K> {
	fn new(label: ReferenceKind) -> Self {
		Self {
			label,
			by_name: RwLock::new(HashMap::default()),
		}
	}

	fn associate(&self, kind: Arc<K>, names: &[&str]) -> Vec<Association> {
		if names.is_empty() {
			tracing::warn!(registry = %self.label, "registry.associate_without_names");
			return Vec::new();
		}

		let mut by_name = self.by_name.write();
		names
			.iter()
			.map(|name| {
				let key: Box<str> = name.trim().to_lowercase().into();
				match by_name.insert(key, kind.clone()) {
					Some(_) => {
						tracing::warn!(registry = %self.label, name, "registry.association_overwritten");
						Association::Replaced
					}
					None => Association::Inserted,
				}
			})
			.collect()
	}

	fn get(&self, name: &str) -> Result<Arc<K>, CompileError> {
		self.by_name
			.read()
			.get(name.trim().to_lowercase().as_str())
			.cloned()
			.ok_or_else(|| CompileError::unresolved(self.label, name))
	}

	fn names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.by_name.read().keys().map(|k| k.to_string()).collect();
		names.sort();
		names
	}
}

/// Tag and type registries shared by every compile pass of a process.
///
/// Registration is last-writer-wins so built-in associations can be patched.
pub struct Registry {
	elements: Associations<dyn ElementKind>,
	attributes: Associations<dyn AttributeKind>,
}

impl Default for Registry {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("tags", &self.tags())
			.field("types", &self.types())
			.finish()
	}
}

impl Registry {
	/// Creates a registry with no associations.
	pub fn new() -> Self {
		Self {
			elements: Associations::new(ReferenceKind::Tag),
			attributes: Associations::new(ReferenceKind::Type),
		}
	}

	/// Creates a registry holding the built-in element and attribute kinds.
	pub fn with_builtins() -> Self {
		let registry = Self::new();
		crate::kinds::register_builtins(&registry);
		registry
	}

	/// Associates an element kind with one or more tag names (case-insensitive).
	pub fn associate_element(&self, kind: Arc<dyn ElementKind>, tags: &[&str]) -> Vec<Association> {
		self.elements.associate(kind, tags)
	}

	/// Associates an attribute kind with one or more type names (case-insensitive).
	pub fn associate_attribute(&self, kind: Arc<dyn AttributeKind>, types: &[&str]) -> Vec<Association> {
		self.attributes.associate(kind, types)
	}

	pub fn element_kind(&self, tag: &str) -> Result<Arc<dyn ElementKind>, CompileError> {
		self.elements.get(tag)
	}

	pub fn attribute_kind(&self, ty: &str) -> Result<Arc<dyn AttributeKind>, CompileError> {
		self.attributes.get(ty)
	}

	/// Registered tag names, sorted.
	pub fn tags(&self) -> Vec<String> {
		self.elements.names()
	}

	/// Registered type names, sorted.
	pub fn types(&self) -> Vec<String> {
		self.attributes.names()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::kinds::{BooleanKind, NumberKind, ObjectKind};

	#[test]
	fn last_registration_wins() {
		let registry = Registry::new();
		assert_eq!(
			registry.associate_attribute(Arc::new(BooleanKind), &["flag", "Bool"]),
			vec![Association::Inserted, Association::Inserted]
		);
		assert_eq!(
			registry.associate_attribute(Arc::new(NumberKind), &["FLAG"]),
			vec![Association::Replaced]
		);
		assert_eq!(registry.attribute_kind("Flag").unwrap().name(), "number");
		assert_eq!(registry.attribute_kind("bool").unwrap().name(), "boolean");
	}

	#[test]
	fn empty_name_list_is_a_no_op() {
		let registry = Registry::new();
		assert!(registry.associate_element(Arc::new(ObjectKind), &[]).is_empty());
		assert!(registry.tags().is_empty());
	}

	#[test]
	fn unknown_names_are_unresolved() {
		let registry = Registry::new();
		assert!(matches!(
			registry.element_kind("scene"),
			Err(CompileError::UnresolvedReference { kind: ReferenceKind::Tag, .. })
		));
		assert!(matches!(
			registry.attribute_kind("color"),
			Err(CompileError::UnresolvedReference { kind: ReferenceKind::Type, .. })
		));
	}

	#[test]
	fn builtins_cover_documented_types() {
		let registry = Registry::with_builtins();
		for ty in ["bool", "boolean", "number", "int", "integer", "float", "class", "constructor", "instance", "img", "image", "array", "list"] {
			assert!(registry.attribute_kind(ty).is_ok(), "missing attribute type {ty}");
		}
		for tag in ["data", "bool", "int", "object", "container", "shape", "bitmap"] {
			assert!(registry.element_kind(tag).is_ok(), "missing tag {tag}");
		}
	}
}
