use async_trait::async_trait;

use crate::attribute::{AttributeCompiler, AttributeKind};
use crate::error::CompileError;
use crate::value::Value;

/// `array` / `list`: comma-separated items. Numeric items become
/// [`Value::Float`], the rest stay strings. Empty items are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListKind;

#[async_trait]
impl AttributeKind for ListKind {
	fn name(&self) -> &'static str {
		"list"
	}

	async fn construct(&self, attr: &AttributeCompiler) -> Result<Value, CompileError> {
		Ok(Value::List(split_items(attr.value())))
	}
}

fn split_items(raw: &str) -> Vec<Value> {
	raw.split(',')
		.map(str::trim)
		.filter(|item| !item.is_empty())
		.map(|item| match item.parse::<f64>() {
			Ok(number) if number.is_finite() => Value::Float(number),
			_ => Value::from(item),
		})
		.collect()
}
