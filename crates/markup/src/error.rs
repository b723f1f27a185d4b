/// Errors raised while loading a markup document.
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
	/// The source held no element to use as the root.
	#[error("markup document has no root element")]
	Empty,

	/// A node used a positional argument, which has no attribute name.
	#[error("<{node}> has a positional argument; use name=value properties instead")]
	PositionalArgument {
		/// Tag of the offending node.
		node: String,
	},

	/// The source is not valid KDL.
	#[error(transparent)]
	Kdl(#[from] kdl::KdlError),
}
