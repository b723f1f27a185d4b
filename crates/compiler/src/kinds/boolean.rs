use async_trait::async_trait;

use crate::attribute::{AttributeCompiler, AttributeKind};
use crate::error::CompileError;
use crate::value::Value;

/// `bool` / `boolean`: `0`, `1`, `false`, `true`, case-insensitive.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanKind;

#[async_trait]
impl AttributeKind for BooleanKind {
	fn name(&self) -> &'static str {
		"boolean"
	}

	async fn construct(&self, attr: &AttributeCompiler) -> Result<Value, CompileError> {
		parse_bool(attr.value()).map(Value::Bool).ok_or_else(|| attr.mismatch())
	}
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
	match raw.trim().to_lowercase().as_str() {
		"0" | "false" => Some(false),
		"1" | "true" => Some(true),
		_ => None,
	}
}
