use bitflags::bitflags;
use indexmap::IndexMap;

bitflags! {
	/// Per-attribute behaviour flags.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct AttributeFlags: u8 {
		/// Copy the compiled value onto the constructed object.
		const AUTO_ASSIGN = 0x1;
		/// Hand the resolved value down to every child before it is processed.
		const FORWARD = 0x2;
	}
}

/// One declared attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
	ty: Box<str>,
	flags: AttributeFlags,
}

impl AttributeDef {
	/// Declared type, trimmed and lower-cased.
	pub fn ty(&self) -> &str {
		&self.ty
	}

	pub fn flags(&self) -> AttributeFlags {
		self.flags
	}

	pub fn auto_assign(&self) -> bool {
		self.flags.contains(AttributeFlags::AUTO_ASSIGN)
	}

	pub fn forward(&self) -> bool {
		self.flags.contains(AttributeFlags::FORWARD)
	}

	/// `string` attributes are copied raw, without an attribute compiler.
	pub fn is_string(&self) -> bool {
		&*self.ty == "string"
	}
}

/// Attribute declarations of one element compiler, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
	entries: IndexMap<Box<str>, AttributeDef>,
}

impl Schema {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares `name` as auto-assigned and not forwarded.
	pub fn define(&mut self, name: &str, ty: &str) -> &mut Self {
		self.define_attribute(name, ty, true, false)
	}

	/// Declares `name` with explicit flags. Redeclaring replaces the entry.
	pub fn define_attribute(&mut self, name: &str, ty: &str, auto_assign: bool, forward: bool) -> &mut Self {
		let mut flags = AttributeFlags::empty();
		flags.set(AttributeFlags::AUTO_ASSIGN, auto_assign);
		flags.set(AttributeFlags::FORWARD, forward);
		self.entries.insert(
			name.into(),
			AttributeDef {
				ty: ty.trim().to_lowercase().into(),
				flags,
			},
		);
		self
	}

	pub fn get(&self, name: &str) -> Option<&AttributeDef> {
		self.entries.get(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeDef)> {
		self.entries.iter().map(|(name, def)| (&**name, def))
	}

	/// Names flagged for forwarding, in declaration order.
	pub fn forwarded(&self) -> impl Iterator<Item = &str> {
		self.iter().filter(|(_, def)| def.forward()).map(|(name, _)| name)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
