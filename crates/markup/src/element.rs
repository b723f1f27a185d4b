use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use url::Url;

/// Process-unique identity of one markup element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
	fn next() -> Self {
		static NEXT: AtomicU64 = AtomicU64::new(1);
		Self(NEXT.fetch_add(1, Ordering::Relaxed))
	}

	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// A raw markup attribute: a name and its unparsed string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	name: Box<str>,
	value: Box<str>,
}

impl Attribute {
	pub fn new(name: impl Into<Box<str>>, value: impl Into<Box<str>>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value(&self) -> &str {
		&self.value
	}
}

/// One markup element with its attributes and child elements.
#[derive(Debug)]
pub struct Element {
	id: NodeId,
	tag: Box<str>,
	attributes: Vec<Attribute>,
	children: Vec<Arc<Element>>,
	base: Option<Url>,
}

impl Element {
	/// Starts building an element with the given tag.
	pub fn builder(tag: impl Into<Box<str>>) -> ElementBuilder {
		ElementBuilder {
			tag: tag.into(),
			attributes: Vec::new(),
			children: Vec::new(),
			base: None,
		}
	}

	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Tag name exactly as written in the source.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Attributes in document order.
	pub fn attributes(&self) -> &[Attribute] {
		&self.attributes
	}

	/// Returns the raw value of the named attribute.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.iter().find(|a| a.name() == name).map(Attribute::value)
	}

	/// Child elements in document order.
	pub fn children(&self) -> &[Arc<Element>] {
		&self.children
	}

	/// Base locator that relative references inside this element resolve against.
	pub fn base_uri(&self) -> Option<&Url> {
		self.base.as_ref()
	}

	/// Iterates all descendants in pre-order, excluding `self`.
	pub fn descendants(&self) -> Descendants<'_> {
		Descendants {
			stack: self.children.iter().rev().collect(),
		}
	}
}

/// Pre-order iterator over the descendants of an [`Element`].
#[derive(Debug)]
pub struct Descendants<'a> {
	stack: Vec<&'a Arc<Element>>,
}

impl<'a> Iterator for Descendants<'a> {
	type Item = &'a Arc<Element>;

	fn next(&mut self) -> Option<Self::Item> {
		let next = self.stack.pop()?;
		self.stack.extend(next.children.iter().rev());
		Some(next)
	}
}

/// Builder for [`Element`] trees.
///
/// Children without an explicit base inherit their parent's base when the tree
/// is built.
#[derive(Debug, Clone)]
pub struct ElementBuilder {
	tag: Box<str>,
	attributes: Vec<Attribute>,
	children: Vec<ElementBuilder>,
	base: Option<Url>,
}

impl ElementBuilder {
	/// Sets an attribute. Setting the same name twice keeps the first position
	/// and the last value.
	pub fn attr(mut self, name: impl Into<Box<str>>, value: impl Into<Box<str>>) -> Self {
		let attr = Attribute::new(name, value);
		match self.attributes.iter_mut().find(|a| a.name == attr.name) {
			Some(existing) => *existing = attr,
			None => self.attributes.push(attr),
		}
		self
	}

	pub fn child(mut self, child: ElementBuilder) -> Self {
		self.children.push(child);
		self
	}

	pub fn children(mut self, children: impl IntoIterator<Item = ElementBuilder>) -> Self {
		self.children.extend(children);
		self
	}

	pub fn base(mut self, base: Url) -> Self {
		self.base = Some(base);
		self
	}

	pub fn build(self) -> Arc<Element> {
		self.build_with(None)
	}

	pub(crate) fn build_with(self, inherited: Option<&Url>) -> Arc<Element> {
		let base = self.base.or_else(|| inherited.cloned());
		let children = self.children.into_iter().map(|c| c.build_with(base.as_ref())).collect();
		Arc::new(Element {
			id: NodeId::next(),
			tag: self.tag,
			attributes: self.attributes,
			children,
			base,
		})
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn tree() -> Arc<Element> {
		Element::builder("scene")
			.attr("title", "demo")
			.child(Element::builder("group").child(Element::builder("shape").attr("id", "a")))
			.child(Element::builder("shape").attr("id", "b"))
			.build()
	}

	#[test]
	fn node_ids_are_unique() {
		let a = tree();
		let b = tree();
		assert_ne!(a.id(), b.id());
		assert_ne!(a.children()[0].id(), a.children()[1].id());
	}

	#[test]
	fn descendants_are_pre_order() {
		let root = tree();
		let tags: Vec<_> = root.descendants().map(|e| e.tag().to_string()).collect();
		assert_eq!(tags, vec!["group", "shape", "shape"]);
		let ids: Vec<_> = root.descendants().filter_map(|e| e.attribute("id")).collect();
		assert_eq!(ids, vec!["a", "b"]);
	}

	#[test]
	fn repeated_attribute_keeps_position() {
		let el = Element::builder("shape").attr("x", "1").attr("y", "2").attr("x", "3").build();
		let attrs: Vec<_> = el.attributes().iter().map(|a| (a.name(), a.value())).collect();
		assert_eq!(attrs, vec![("x", "3"), ("y", "2")]);
	}

	#[test]
	fn children_inherit_base() {
		let base = Url::parse("file:///scenes/").unwrap();
		let el = Element::builder("scene")
			.base(base.clone())
			.child(Element::builder("shape"))
			.build();
		assert_eq!(el.children()[0].base_uri(), Some(&base));
	}
}
