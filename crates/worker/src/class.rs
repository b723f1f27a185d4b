/// Step classes used for scheduling observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Top-level document processing.
	Document,
	/// One element compiler, including its attribute and child phases.
	Element,
	/// One attribute compiler.
	Attribute,
	/// Bookkeeping that settles a completion once its work task has joined.
	Settle,
}

impl TaskClass {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Document => "document",
			Self::Element => "element",
			Self::Attribute => "attribute",
			Self::Settle => "settle",
		}
	}
}
