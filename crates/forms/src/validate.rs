//! Reply validation against a form's [`Schema`].
//!
//! Replies come from untrusted clients, so every value is checked against the element it
//! answers before it is handed to caller code.
//!
//! Custom form replies need one extra step. Older clients send one value per element,
//! including `null` placeholders for labels, while newer clients omit the label placeholders.
//! [`reconcile`] maps the shorter layout back onto the full one so callers always index values
//! by schema position. Only missing labels are tolerated; any other shortfall is an error.

use serde_json::Value;

use crate::response::{FieldValue, Submission};
use crate::schema::{Element, FormKind, Schema};

/// Result type for reply validation.
pub type Result<T, E = ValidationError> = std::result::Result<T, E>;

/// A reply that does not conform to its form's schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
	/// Reply data was empty or `null` without a cancel reason.
	#[error("form response can't be null without cancel reason")]
	EmptyReply,
	/// Reply data exceeded the configured size limit.
	#[error("form response is {len} bytes, limit is {limit}")]
	ReplyTooLarge {
		/// Size of the reply.
		len: usize,
		/// Configured limit.
		limit: usize,
	},
	/// Cancel code outside the known reasons.
	#[error("unknown cancel reason {0}")]
	UnknownCancelReason(u8),
	/// Reply data was not JSON. Rejected as malformed, not as an internal failure.
	#[error("failed to decode form response data: {0}")]
	Decode(String),
	/// Custom form reply was not a JSON array.
	#[error("expected array, got {0}")]
	NotAnArray(String),
	/// More values than schema elements.
	#[error("too many result elements, expected {expected}, got {actual}")]
	TooManyValues {
		/// Number of schema elements.
		expected: usize,
		/// Number of values received.
		actual: usize,
	},
	/// Value count matches neither accepted layout.
	#[error(
		"wrong number of result elements, expected either {expected} (with label values) or \
		 {without_labels} (without label values), got {actual}"
	)]
	LengthMismatch {
		/// Count including label placeholders.
		expected: usize,
		/// Count without label placeholders.
		without_labels: usize,
		/// Number of values received.
		actual: usize,
	},
	/// A non-label slot was left without a value after reconciliation.
	#[error("element {index} ({element}) has no value after correcting for labels")]
	UnaccountedSlot {
		/// Schema position.
		index: usize,
		/// Element name.
		element: &'static str,
	},
	/// Value has the wrong JSON type for its element.
	#[error("{element}: expected {expected}, got {actual} {raw}")]
	TypeMismatch {
		/// Element name.
		element: &'static str,
		/// Expected representation.
		expected: &'static str,
		/// JSON type received.
		actual: &'static str,
		/// Offending value.
		raw: String,
	},
	/// Dropdown index outside the option list.
	#[error("dropdown: option {value} does not exist ({options} options)")]
	NoSuchOption {
		/// Offending index.
		value: String,
		/// Number of options.
		options: usize,
	},
	/// Slider value outside its range.
	#[error("slider: value {value} is out of bounds (min {min}, max {max})")]
	OutOfBounds {
		/// Offending value.
		value: f64,
		/// Slider minimum.
		min: f64,
		/// Slider maximum.
		max: f64,
	},
	/// Non-interactive element carried a value.
	#[error("the value of {element} must be null, got {raw}")]
	NotNull {
		/// Element name.
		element: &'static str,
		/// Offending value.
		raw: String,
	},
	/// Action reply was not an integer.
	#[error("expected int, got {0}")]
	NotAnInteger(String),
	/// Action reply named a button that does not exist.
	#[error("button {index} does not exist ({count} buttons)")]
	NoSuchButton {
		/// Offending index.
		index: i64,
		/// Number of buttons.
		count: usize,
	},
	/// Message reply was neither `true` nor `false`.
	#[error("expected bool, got {0}")]
	NotABoolean(String),
}

/// Validates raw reply data against `schema`.
pub fn validate(schema: &Schema, raw: &str) -> Result<Submission> {
	match schema.kind() {
		FormKind::Action => validate_selection(raw, schema.button_count()).map(Submission::Selection),
		FormKind::Message => validate_binary(raw).map(Submission::Selection),
		FormKind::Modal => validate_modal(raw, schema.elements()).map(Submission::Values),
	}
}

/// Validates the pressed-button index of an action form.
pub fn validate_selection(raw: &str, button_count: usize) -> Result<usize> {
	let index: i64 = raw
		.parse()
		.map_err(|_| ValidationError::NotAnInteger(raw.to_string()))?;
	usize::try_from(index)
		.ok()
		.filter(|&i| i < button_count)
		.ok_or(ValidationError::NoSuchButton {
			index,
			count: button_count,
		})
}

/// Validates a message form reply: `true` selects the first button, `false` the second.
pub fn validate_binary(raw: &str) -> Result<usize> {
	match raw {
		"true" => Ok(0),
		"false" => Ok(1),
		_ => Err(ValidationError::NotABoolean(raw.to_string())),
	}
}

/// Validates a custom form reply, returning one typed value per schema element.
pub fn validate_modal(raw: &str, elements: &[Element]) -> Result<Vec<FieldValue>> {
	let data: Value = serde_json::from_str(raw).map_err(|e| ValidationError::Decode(e.to_string()))?;
	let Value::Array(values) = data else {
		return Err(ValidationError::NotAnArray(raw.to_string()));
	};
	let values = reconcile(values, elements)?;
	values
		.iter()
		.zip(elements)
		.map(|(value, element)| validate_element(element, value))
		.collect()
}

/// Aligns reply values with schema positions.
///
/// A full-length reply is returned unchanged. A reply that omits exactly the label
/// placeholders is spread over the non-label positions, with `null` filled in for each label.
pub fn reconcile(values: Vec<Value>, elements: &[Element]) -> Result<Vec<Value>> {
	let expected = elements.len();
	let actual = values.len();
	if actual > expected {
		return Err(ValidationError::TooManyValues { expected, actual });
	}
	if actual == expected {
		return Ok(values);
	}

	let non_label: Vec<usize> = elements
		.iter()
		.enumerate()
		.filter(|(_, e)| !matches!(e, Element::Label))
		.map(|(i, _)| i)
		.collect();
	if actual != non_label.len() {
		return Err(ValidationError::LengthMismatch {
			expected,
			without_labels: non_label.len(),
			actual,
		});
	}

	let mut slots: Vec<Option<Value>> = vec![None; expected];
	for (value, &index) in values.into_iter().zip(&non_label) {
		slots[index] = Some(value);
	}

	slots
		.into_iter()
		.zip(elements)
		.enumerate()
		.map(|(index, (slot, element))| match (slot, element) {
			(Some(value), _) => Ok(value),
			(None, Element::Label) => Ok(Value::Null),
			(None, element) => Err(ValidationError::UnaccountedSlot {
				index,
				element: element.name(),
			}),
		})
		.collect()
}

/// Validates one reply value against the element it answers.
pub fn validate_element(element: &Element, value: &Value) -> Result<FieldValue> {
	match *element {
		Element::Dropdown { options } => {
			let Value::Number(n) = value else {
				return Err(mismatch(element, "int", value));
			};
			if n.is_f64() {
				return Err(mismatch(element, "int", value));
			}
			n.as_u64()
				.and_then(|i| usize::try_from(i).ok())
				.filter(|&i| i < options)
				.map(FieldValue::Choice)
				.ok_or_else(|| ValidationError::NoSuchOption {
					value: n.to_string(),
					options,
				})
		}
		Element::Slider { min, max } => {
			let Some(n) = value.as_f64() else {
				return Err(mismatch(element, "float", value));
			};
			if n < min || n > max {
				return Err(ValidationError::OutOfBounds { value: n, min, max });
			}
			Ok(FieldValue::Number(n))
		}
		Element::Input => match value {
			Value::String(s) => Ok(FieldValue::Text(s.clone())),
			_ => Err(mismatch(element, "string", value)),
		},
		Element::Toggle => match value {
			Value::Bool(b) => Ok(FieldValue::Flag(*b)),
			_ => Err(mismatch(element, "bool", value)),
		},
		Element::Button | Element::Label | Element::Header | Element::Divider => match value {
			Value::Null => Ok(FieldValue::Empty),
			_ => Err(ValidationError::NotNull {
				element: element.name(),
				raw: value.to_string(),
			}),
		},
	}
}

fn mismatch(element: &Element, expected: &'static str, value: &Value) -> ValidationError {
	ValidationError::TypeMismatch {
		element: element.name(),
		expected,
		actual: json_type(value),
		raw: value.to_string(),
	}
}

fn json_type(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(n) if n.is_f64() => "float",
		Value::Number(_) => "int",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests;
