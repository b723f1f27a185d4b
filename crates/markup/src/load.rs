//! KDL loading.
//!
//! The first top-level node becomes the root element. Node names map to tags,
//! `name=value` properties to attributes and child blocks to child elements.
//! Non-string property values keep their textual form, so typing stays with
//! the compiler's attribute schema.

use kdl::{KdlDocument, KdlNode, KdlValue};

use crate::{Element, ElementBuilder, MarkupError};

pub(crate) fn root_from_kdl(input: &str) -> Result<ElementBuilder, MarkupError> {
	let doc: KdlDocument = input.parse()?;
	let mut nodes = doc.nodes().iter();
	let root = nodes.next().ok_or(MarkupError::Empty)?;
	let ignored = nodes.count();
	if ignored > 0 {
		tracing::debug!(ignored, root = root.name().value(), "markup.extra_roots_ignored");
	}
	element_from_node(root)
}

fn element_from_node(node: &KdlNode) -> Result<ElementBuilder, MarkupError> {
	let mut builder = Element::builder(node.name().value());

	for entry in node.entries() {
		let Some(name) = entry.name() else {
			return Err(MarkupError::PositionalArgument {
				node: node.name().value().to_string(),
			});
		};
		builder = builder.attr(name.value(), value_text(entry.value()));
	}

	if let Some(children) = node.children() {
		for child in children.nodes() {
			builder = builder.child(element_from_node(child)?);
		}
	}

	Ok(builder)
}

fn value_text(value: &KdlValue) -> String {
	match value {
		KdlValue::String(s) => s.clone(),
		KdlValue::Integer(i) => i.to_string(),
		KdlValue::Float(f) => f.to_string(),
		KdlValue::Bool(b) => b.to_string(),
		KdlValue::Null => "null".to_string(),
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use url::Url;

	use crate::{Document, MarkupError};

	#[test]
	fn loads_tags_attributes_and_children() {
		let doc = Document::parse_kdl(
			r#"
			container name="stage" x=10 {
				shape id="a"
				shape id="b" alpha=0.5
			}
			"#,
			None,
		)
		.unwrap();

		let root = doc.root();
		assert_eq!(root.tag(), "container");
		assert_eq!(root.attribute("name"), Some("stage"));
		assert_eq!(root.attribute("x"), Some("10"));
		let ids: Vec<_> = root.children().iter().filter_map(|c| c.attribute("id")).collect();
		assert_eq!(ids, vec!["a", "b"]);
		assert_eq!(root.children()[1].attribute("alpha"), Some("0.5"));
	}

	#[test]
	fn base_is_inherited_by_every_element() {
		let base = Url::parse("https://example.com/scenes/").unwrap();
		let doc = Document::parse_kdl("scene { bitmap src=\"a.png\" }", Some(base.clone())).unwrap();
		assert_eq!(doc.base_uri(), Some(&base));
		assert_eq!(doc.root().children()[0].base_uri(), Some(&base));
	}

	#[test]
	fn empty_document_is_rejected() {
		assert!(matches!(Document::parse_kdl("", None), Err(MarkupError::Empty)));
	}

	#[test]
	fn positional_arguments_are_rejected() {
		let err = Document::parse_kdl("shape \"oops\"", None).unwrap_err();
		assert!(matches!(err, MarkupError::PositionalArgument { ref node } if node == "shape"));
	}

	#[test]
	fn invalid_kdl_surfaces_parse_error() {
		assert!(matches!(Document::parse_kdl("shape {", None), Err(MarkupError::Kdl(_))));
	}
}
