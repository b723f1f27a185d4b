//! KDL configuration for the `trellis` binary.
//!
//! ```kdl
//! base "https://cdn.example/scenes/"
//! symbols {
//!     app.title "Demo"
//!     app.debug #true
//! }
//! ```

use std::path::{Path, PathBuf};

use kdl::{KdlDocument, KdlNode, KdlValue};
use thiserror::Error;
use trellis_compiler::{Namespace, Value};
use url::Url;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Fatal configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("KDL parse error: {0}")]
	Kdl(#[from] kdl::KdlError),

	#[error("I/O error reading {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },

	#[error("invalid base locator '{value}': {error}")]
	InvalidBase { value: String, error: url::ParseError },

	#[error("'{node}' expects a single {expected} argument")]
	InvalidArgument { node: String, expected: &'static str },
}

/// Recoverable configuration problems, reported and then ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
	UnknownNode { name: String },
	SymbolRedefined { path: String },
}

impl std::fmt::Display for ConfigWarning {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ConfigWarning::UnknownNode { name } => write!(f, "unknown config node '{name}' will be ignored"),
			ConfigWarning::SymbolRedefined { path } => write!(f, "symbol '{path}' defined twice; last value wins"),
		}
	}
}

/// Parsed configuration.
#[derive(Debug, Default)]
pub struct Config {
	pub base: Option<Url>,
	pub symbols: Vec<(String, Value)>,
	pub warnings: Vec<ConfigWarning>,
}

impl Config {
	/// Defines every configured symbol in `namespace`, later entries winning.
	pub fn apply(&self, namespace: &Namespace) {
		for (path, value) in &self.symbols {
			if !namespace.define(path, value.clone(), true) {
				tracing::warn!(path, "config.symbol_rejected");
			}
		}
	}
}

pub async fn load_config(path: &Path) -> Result<Config> {
	let input = tokio::fs::read_to_string(path).await.map_err(|error| ConfigError::Io {
		path: path.to_path_buf(),
		error,
	})?;
	parse_config_str(&input)
}

/// Parses a KDL config. Unknown top-level nodes become warnings.
pub fn parse_config_str(input: &str) -> Result<Config> {
	let doc: KdlDocument = input.parse()?;
	let mut config = Config::default();

	for node in doc.nodes() {
		match node.name().value() {
			"base" => config.base = Some(parse_base(node)?),
			"symbols" => parse_symbols(node, &mut config)?,
			other => config.warnings.push(ConfigWarning::UnknownNode { name: other.to_string() }),
		}
	}

	Ok(config)
}

fn parse_base(node: &KdlNode) -> Result<Url> {
	let value = single_argument(node)?
		.as_string()
		.ok_or_else(|| invalid_argument(node, "string"))?;
	Url::parse(value).map_err(|error| ConfigError::InvalidBase {
		value: value.to_string(),
		error,
	})
}

fn parse_symbols(node: &KdlNode, config: &mut Config) -> Result<()> {
	let Some(children) = node.children() else {
		return Ok(());
	};
	for symbol in children.nodes() {
		let path = symbol.name().value().to_string();
		let value = symbol_value(single_argument(symbol)?);
		if config.symbols.iter().any(|(existing, _)| *existing == path) {
			config.warnings.push(ConfigWarning::SymbolRedefined { path: path.clone() });
		}
		config.symbols.push((path, value));
	}
	Ok(())
}

fn single_argument(node: &KdlNode) -> Result<&KdlValue> {
	match node.entries() {
		[entry] if entry.name().is_none() => Ok(entry.value()),
		_ => Err(invalid_argument(node, "positional")),
	}
}

fn invalid_argument(node: &KdlNode, expected: &'static str) -> ConfigError {
	ConfigError::InvalidArgument {
		node: node.name().value().to_string(),
		expected,
	}
}

fn symbol_value(value: &KdlValue) -> Value {
	match value {
		KdlValue::String(s) => Value::from(s.as_str()),
		KdlValue::Integer(i) => i64::try_from(*i).map_or(Value::Float(*i as f64), Value::Int),
		KdlValue::Float(f) => Value::Float(*f),
		KdlValue::Bool(b) => Value::Bool(*b),
		KdlValue::Null => Value::Null,
	}
}
