use std::sync::Arc;

use url::Url;

use crate::{Element, ElementBuilder, MarkupError};

/// A markup document: one root element plus the locator it was loaded from.
#[derive(Debug, Clone)]
pub struct Document {
	root: Arc<Element>,
	base: Option<Url>,
}

impl Document {
	pub fn new(root: Arc<Element>) -> Self {
		let base = root.base_uri().cloned();
		Self { root, base }
	}

	/// Builds the tree from `root`, giving every element `base` unless it sets
	/// its own.
	pub fn from_builder(root: ElementBuilder, base: Option<Url>) -> Self {
		Self {
			root: root.build_with(base.as_ref()),
			base,
		}
	}

	/// Parses a KDL document.
	///
	/// The first node is the root. Node names become tags, `name=value`
	/// properties become attributes, child blocks become child elements.
	pub fn parse_kdl(input: &str, base: Option<Url>) -> Result<Self, MarkupError> {
		let root = crate::load::root_from_kdl(input)?;
		Ok(Self::from_builder(root, base))
	}

	pub fn root(&self) -> &Arc<Element> {
		&self.root
	}

	pub fn base_uri(&self) -> Option<&Url> {
		self.base.as_ref()
	}
}
