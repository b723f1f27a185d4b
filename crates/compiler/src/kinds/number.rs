use async_trait::async_trait;

use crate::attribute::{AttributeCompiler, AttributeKind};
use crate::error::CompileError;
use crate::value::Value;

/// `number` / `float` parse to [`Value::Float`], `int` / `integer` to
/// [`Value::Int`]. Both accept a numeric prefix and ignore trailing text.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberKind;

#[async_trait]
impl AttributeKind for NumberKind {
	fn name(&self) -> &'static str {
		"number"
	}

	async fn construct(&self, attr: &AttributeCompiler) -> Result<Value, CompileError> {
		let parsed = match attr.ty() {
			"int" | "integer" => parse_int_prefix(attr.value()).map(Value::Int),
			_ => parse_float_prefix(attr.value()).map(Value::Float),
		};
		parsed.ok_or_else(|| attr.mismatch())
	}
}

/// Integer prefix: optional sign, `0x` selects hex. `None` when no digit is
/// found or the value does not fit.
pub(crate) fn parse_int_prefix(raw: &str) -> Option<i64> {
	let (negative, rest) = split_sign(raw.trim_start());
	let (radix, digits) = match rest.get(..2) {
		Some("0x" | "0X") => (16, &rest[2..]),
		_ => (10, rest),
	};

	// Accumulated with the final sign so i64::MIN stays representable.
	let mut value: i64 = 0;
	let mut seen = false;
	for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
		seen = true;
		let digit = i64::from(digit);
		value = value.checked_mul(i64::from(radix))?;
		value = if negative { value.checked_sub(digit)? } else { value.checked_add(digit)? };
	}
	seen.then_some(value)
}

/// Decimal prefix with optional fraction and exponent, or `Infinity`.
pub(crate) fn parse_float_prefix(raw: &str) -> Option<f64> {
	let trimmed = raw.trim_start();
	let (negative, rest) = split_sign(trimmed);
	if rest.starts_with("Infinity") {
		return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
	}

	let bytes = rest.as_bytes();
	let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

	let mut end = digits(0);
	let mut mantissa = end;
	if bytes.get(end) == Some(&b'.') {
		let fraction = digits(end + 1);
		mantissa += fraction;
		end += 1 + fraction;
	}
	if mantissa == 0 {
		return None;
	}
	if matches!(bytes.get(end), Some(b'e' | b'E')) {
		let mut at = end + 1;
		if matches!(bytes.get(at), Some(b'+' | b'-')) {
			at += 1;
		}
		let exponent = digits(at);
		if exponent > 0 {
			end = at + exponent;
		}
	}

	let sign_len = trimmed.len() - rest.len();
	trimmed[..sign_len + end].parse().ok()
}

fn split_sign(s: &str) -> (bool, &str) {
	match s.as_bytes().first() {
		Some(b'-') => (true, &s[1..]),
		Some(b'+') => (false, &s[1..]),
		_ => (false, s),
	}
}
