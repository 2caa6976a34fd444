//! Structural description of a form, used to validate its reply.

use std::sync::Arc;

/// One element of a form, in display order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element {
	/// A selectable button of an action or message form.
	Button,
	/// A dropdown with `options` choices.
	Dropdown {
		/// Number of selectable options.
		options: usize,
	},
	/// A numeric slider over `min ..= max`.
	Slider {
		/// Smallest accepted value.
		min: f64,
		/// Largest accepted value.
		max: f64,
	},
	/// A free text field.
	Input,
	/// A boolean toggle.
	Toggle,
	/// Static text.
	Label,
	/// Section header.
	Header,
	/// Section divider.
	Divider,
}

impl Element {
	/// Lowercase element name used in validation messages.
	pub const fn name(&self) -> &'static str {
		match self {
			Self::Button => "button",
			Self::Dropdown { .. } => "dropdown",
			Self::Slider { .. } => "slider",
			Self::Input => "input",
			Self::Toggle => "toggle",
			Self::Label => "label",
			Self::Header => "header",
			Self::Divider => "divider",
		}
	}

	/// Returns true for controls that carry a value in a custom form reply.
	pub const fn is_interactive(&self) -> bool {
		matches!(
			self,
			Self::Dropdown { .. } | Self::Slider { .. } | Self::Input | Self::Toggle
		)
	}
}

/// Form layout family, which decides the reply format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
	/// Button list; the reply is the index of the pressed button.
	Action,
	/// Two-button dialog; the reply is `true` or `false`.
	Message,
	/// Custom form; the reply is a JSON array of control values.
	Modal,
}

/// Immutable reply contract of an issued form.
///
/// Cloning is cheap; the element list is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
	kind: FormKind,
	elements: Arc<[Element]>,
}

impl Schema {
	/// Creates a schema from its kind and ordered elements.
	pub fn new(kind: FormKind, elements: impl Into<Arc<[Element]>>) -> Self {
		Self {
			kind,
			elements: elements.into(),
		}
	}

	/// Action form schema.
	pub fn action(elements: impl Into<Arc<[Element]>>) -> Self {
		Self::new(FormKind::Action, elements)
	}

	/// Two-button message form schema.
	pub fn message() -> Self {
		Self::new(FormKind::Message, [Element::Button, Element::Button])
	}

	/// Custom form schema.
	pub fn modal(elements: impl Into<Arc<[Element]>>) -> Self {
		Self::new(FormKind::Modal, elements)
	}

	/// Layout family.
	pub fn kind(&self) -> FormKind {
		self.kind
	}

	/// Elements in display order.
	pub fn elements(&self) -> &[Element] {
		&self.elements
	}

	/// Number of [`Element::Button`] entries.
	pub fn button_count(&self) -> usize {
		self.elements
			.iter()
			.filter(|e| matches!(e, Element::Button))
			.count()
	}
}
