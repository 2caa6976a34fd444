//! Form builders.
//!
//! Each builder produces a [`FormRequest`]: the JSON payload sent to the client together with
//! the [`Schema`] its reply is checked against. Text is passed through unchanged; translation
//! is left to the host.

use serde::Serialize;
use serde_json::{Value, json};

use crate::schema::{Element, Schema};

/// A form ready to be issued.
#[derive(Debug, Clone, PartialEq)]
pub struct FormRequest {
	schema: Schema,
	payload: Value,
}

impl FormRequest {
	/// Pairs a payload with the schema of its reply.
	pub fn new(schema: Schema, payload: Value) -> Self {
		Self { schema, payload }
	}

	/// Reply contract.
	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	/// Wire payload.
	pub fn payload(&self) -> &Value {
		&self.payload
	}
}

/// Invalid builder arguments.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
	/// Slider minimum above its maximum.
	#[error("slider {label:?}: min {min} is greater than max {max}")]
	SliderRange {
		/// Control label.
		label: String,
		/// Requested minimum.
		min: f64,
		/// Requested maximum.
		max: f64,
	},
	/// Slider step not strictly positive.
	#[error("slider {label:?}: step must be greater than zero, got {step}")]
	SliderStep {
		/// Control label.
		label: String,
		/// Requested step.
		step: f64,
	},
	/// Slider default outside its range.
	#[error("slider {label:?}: default {default} is outside {min} ..= {max}")]
	SliderDefault {
		/// Control label.
		label: String,
		/// Requested default.
		default: f64,
		/// Slider minimum.
		min: f64,
		/// Slider maximum.
		max: f64,
	},
	/// Dropdown default naming a missing option.
	#[error("dropdown {label:?}: no option at index {default} ({options} options)")]
	DropdownDefault {
		/// Control label.
		label: String,
		/// Requested default index.
		default: usize,
		/// Number of options.
		options: usize,
	},
}

/// Image shown on an action form button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ButtonIcon {
	/// Resource pack texture path.
	Path(String),
	/// Remote image URL.
	Url(String),
}

/// Dropdown control of a [`ModalForm`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dropdown {
	options: Vec<String>,
	text: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	default: Option<usize>,
	#[serde(skip_serializing_if = "Option::is_none")]
	tooltip: Option<String>,
}

impl Dropdown {
	/// Creates a dropdown over `options`.
	pub fn new(label: impl Into<String>, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			options: options.into_iter().map(Into::into).collect(),
			text: label.into(),
			default: None,
			tooltip: None,
		}
	}

	/// Preselects the option at `index`.
	pub fn default(mut self, index: usize) -> Self {
		self.default = Some(index);
		self
	}

	/// Sets the hover text.
	pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
		self.tooltip = Some(tooltip.into());
		self
	}

	fn check(&self) -> Result<(), BuildError> {
		match self.default {
			Some(default) if default >= self.options.len() => Err(BuildError::DropdownDefault {
				label: self.text.clone(),
				default,
				options: self.options.len(),
			}),
			_ => Ok(()),
		}
	}
}

/// Slider control of a [`ModalForm`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slider {
	max: f64,
	min: f64,
	step: f64,
	text: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	default: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	tooltip: Option<String>,
}

impl Slider {
	/// Creates a slider over `min ..= max` with a step of `1`.
	pub fn new(label: impl Into<String>, min: f64, max: f64) -> Self {
		Self {
			max,
			min,
			step: 1.0,
			text: label.into(),
			default: None,
			tooltip: None,
		}
	}

	/// Sets the increment between selectable values.
	pub fn step(mut self, step: f64) -> Self {
		self.step = step;
		self
	}

	/// Sets the initial value.
	pub fn default(mut self, value: f64) -> Self {
		self.default = Some(value);
		self
	}

	/// Sets the hover text.
	pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
		self.tooltip = Some(tooltip.into());
		self
	}

	fn check(&self) -> Result<(), BuildError> {
		let label = || self.text.clone();
		if self.min.is_nan() || self.max.is_nan() || self.min > self.max {
			return Err(BuildError::SliderRange {
				label: label(),
				min: self.min,
				max: self.max,
			});
		}
		if self.step.is_nan() || self.step <= 0.0 {
			return Err(BuildError::SliderStep {
				label: label(),
				step: self.step,
			});
		}
		match self.default {
			Some(default) if !(self.min..=self.max).contains(&default) => Err(BuildError::SliderDefault {
				label: label(),
				default,
				min: self.min,
				max: self.max,
			}),
			_ => Ok(()),
		}
	}
}

/// Text input control of a [`ModalForm`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextField {
	text: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	placeholder: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	default: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	tooltip: Option<String>,
}

impl TextField {
	/// Creates an empty text field.
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			text: label.into(),
			placeholder: None,
			default: None,
			tooltip: None,
		}
	}

	/// Sets the hint shown while the field is empty.
	pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}

	/// Sets the initial text.
	pub fn default(mut self, text: impl Into<String>) -> Self {
		self.default = Some(text.into());
		self
	}

	/// Sets the hover text.
	pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
		self.tooltip = Some(tooltip.into());
		self
	}
}

/// Toggle control of a [`ModalForm`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toggle {
	text: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	default: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	tooltip: Option<String>,
}

impl Toggle {
	/// Creates a toggle that starts off.
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			text: label.into(),
			default: None,
			tooltip: None,
		}
	}

	/// Sets the initial state.
	pub fn default(mut self, on: bool) -> Self {
		self.default = Some(on);
		self
	}

	/// Sets the hover text.
	pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
		self.tooltip = Some(tooltip.into());
		self
	}
}

/// One serialized form element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Entry {
	Button { image: Option<ButtonIcon>, text: String },
	Label { text: String },
	Header { text: String },
	Divider { text: &'static str },
	Dropdown(Dropdown),
	Slider(Slider),
	Input(TextField),
	Toggle(Toggle),
}

impl Entry {
	fn divider() -> Self {
		Self::Divider { text: "" }
	}

	fn element(&self) -> Element {
		match self {
			Self::Button { .. } => Element::Button,
			Self::Label { .. } => Element::Label,
			Self::Header { .. } => Element::Header,
			Self::Divider { .. } => Element::Divider,
			Self::Dropdown(d) => Element::Dropdown {
				options: d.options.len(),
			},
			Self::Slider(s) => Element::Slider { min: s.min, max: s.max },
			Self::Input(_) => Element::Input,
			Self::Toggle(_) => Element::Toggle,
		}
	}
}

fn elements_of(entries: &[Entry]) -> Vec<Element> {
	entries.iter().map(Entry::element).collect()
}

/// Menu of buttons; the reply is the index of the pressed button.
///
/// Labels, headers and dividers may be interleaved with buttons and do not count towards the
/// button index.
#[derive(Debug, Clone, Default)]
pub struct ActionForm {
	title: String,
	body: String,
	entries: Vec<Entry>,
}

impl ActionForm {
	/// Creates an empty action form.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the title.
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	/// Sets the text shown above the buttons.
	pub fn body(mut self, body: impl Into<String>) -> Self {
		self.body = body.into();
		self
	}

	/// Appends a button.
	pub fn button(mut self, text: impl Into<String>, icon: Option<ButtonIcon>) -> Self {
		self.entries.push(Entry::Button {
			image: icon,
			text: text.into(),
		});
		self
	}

	/// Appends static text.
	pub fn label(mut self, text: impl Into<String>) -> Self {
		self.entries.push(Entry::Label { text: text.into() });
		self
	}

	/// Appends a section header.
	pub fn header(mut self, text: impl Into<String>) -> Self {
		self.entries.push(Entry::Header { text: text.into() });
		self
	}

	/// Appends a divider.
	pub fn divider(mut self) -> Self {
		self.entries.push(Entry::divider());
		self
	}

	/// Assembles the request.
	pub fn build(self) -> FormRequest {
		let schema = Schema::action(elements_of(&self.entries));
		let payload = json!({
			"type": "form",
			"title": self.title,
			"content": self.body,
			"elements": self.entries,
		});
		FormRequest::new(schema, payload)
	}
}

/// Two-button dialog; the reply tells which of the two was pressed.
#[derive(Debug, Clone, Default)]
pub struct MessageForm {
	title: String,
	body: String,
	button1: String,
	button2: String,
}

impl MessageForm {
	/// Creates an empty message form.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the title.
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	/// Sets the message text.
	pub fn body(mut self, body: impl Into<String>) -> Self {
		self.body = body.into();
		self
	}

	/// Sets the first button, reported as selection `0`.
	pub fn button1(mut self, text: impl Into<String>) -> Self {
		self.button1 = text.into();
		self
	}

	/// Sets the second button, reported as selection `1`.
	pub fn button2(mut self, text: impl Into<String>) -> Self {
		self.button2 = text.into();
		self
	}

	/// Assembles the request.
	pub fn build(self) -> FormRequest {
		let payload = json!({
			"type": "modal",
			"title": self.title,
			"content": self.body,
			"button1": self.button1,
			"button2": self.button2,
		});
		FormRequest::new(Schema::message(), payload)
	}
}

/// Custom form of input controls; the reply carries one value per element.
#[derive(Debug, Clone, Default)]
pub struct ModalForm {
	title: String,
	submit: Option<String>,
	entries: Vec<Entry>,
}

impl ModalForm {
	/// Creates an empty custom form.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the title.
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	/// Overrides the submit button text.
	pub fn submit_button(mut self, text: impl Into<String>) -> Self {
		self.submit = Some(text.into());
		self
	}

	/// Appends static text.
	pub fn label(mut self, text: impl Into<String>) -> Self {
		self.entries.push(Entry::Label { text: text.into() });
		self
	}

	/// Appends a section header.
	pub fn header(mut self, text: impl Into<String>) -> Self {
		self.entries.push(Entry::Header { text: text.into() });
		self
	}

	/// Appends a divider.
	pub fn divider(mut self) -> Self {
		self.entries.push(Entry::divider());
		self
	}

	/// Appends a dropdown.
	pub fn dropdown(mut self, dropdown: Dropdown) -> Self {
		self.entries.push(Entry::Dropdown(dropdown));
		self
	}

	/// Appends a slider.
	pub fn slider(mut self, slider: Slider) -> Self {
		self.entries.push(Entry::Slider(slider));
		self
	}

	/// Appends a text field.
	pub fn text_field(mut self, field: TextField) -> Self {
		self.entries.push(Entry::Input(field));
		self
	}

	/// Appends a toggle.
	pub fn toggle(mut self, toggle: Toggle) -> Self {
		self.entries.push(Entry::Toggle(toggle));
		self
	}

	/// Checks every control and assembles the request.
	pub fn build(self) -> Result<FormRequest, BuildError> {
		for entry in &self.entries {
			match entry {
				Entry::Dropdown(d) => d.check()?,
				Entry::Slider(s) => s.check()?,
				_ => {}
			}
		}

		let schema = Schema::modal(elements_of(&self.entries));
		let mut payload = json!({
			"type": "custom_form",
			"title": self.title,
			"content": self.entries,
		});
		if let (Some(submit), Value::Object(map)) = (self.submit, &mut payload) {
			map.insert("submit".into(), Value::String(submit));
		}
		Ok(FormRequest::new(schema, payload))
	}
}

#[cfg(test)]
mod tests;
