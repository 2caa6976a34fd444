use std::any::Any;

/// A continuation panicked while the cell was settling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("continuation panicked: {message}")]
pub struct Panicked {
	message: String,
}

impl Panicked {
	/// Extracts a readable message from a panic payload.
	pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
		let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
			(*s).to_string()
		} else if let Some(s) = payload.downcast_ref::<String>() {
			s.clone()
		} else {
			"non-string panic payload".to_string()
		};
		Self { message }
	}

	/// Returns the panic message.
	pub fn message(&self) -> &str {
		&self.message
	}
}
