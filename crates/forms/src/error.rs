//! Rejection errors delivered through a form's future.

use std::fmt;
use std::sync::Arc;

use serverui_settle::Panicked;

use crate::validate::ValidationError;

/// Why a form was rejected instead of answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
	/// The client's reply did not match the form's schema.
	MalformedResponse,
	/// The session ended before the client replied.
	SessionEnded,
	/// The server withdrew the form, for example after a host-side timeout.
	Withdrawn,
	/// The server failed while sending the form or processing its reply.
	InternalFailure,
}

impl fmt::Display for RejectReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::MalformedResponse => "malformed response",
			Self::SessionEnded => "session ended",
			Self::Withdrawn => "withdrawn",
			Self::InternalFailure => "internal failure",
		})
	}
}

type Cause = Arc<dyn std::error::Error + Send + Sync>;

/// Terminal error of a rejected form.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{reason}: {message}")]
pub struct FormRejectError {
	reason: RejectReason,
	message: String,
	#[source]
	source: Option<Cause>,
}

impl FormRejectError {
	/// Creates an error without an underlying cause.
	pub fn new(reason: RejectReason, message: impl Into<String>) -> Self {
		Self {
			reason,
			message: message.into(),
			source: None,
		}
	}

	/// Attaches the underlying cause.
	#[must_use]
	pub fn with_source(mut self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
		self.source = Some(Arc::from(source.into()));
		self
	}

	/// Rejection for a reply that failed validation.
	pub fn malformed(error: ValidationError) -> Self {
		Self::new(
			RejectReason::MalformedResponse,
			format!("failed to process form: {error}"),
		)
		.with_source(error)
	}

	/// Rejection for a session that ended while the form was pending.
	pub fn session_ended(message: impl Into<String>) -> Self {
		Self::new(RejectReason::SessionEnded, message)
	}

	/// Rejection for a failure on the server side.
	pub fn internal(message: impl Into<String>) -> Self {
		Self::new(RejectReason::InternalFailure, message)
	}

	/// Rejection for a form withdrawn by the host.
	pub fn withdrawn(message: impl Into<String>) -> Self {
		Self::new(RejectReason::Withdrawn, message)
	}

	/// Rejection category.
	pub fn reason(&self) -> RejectReason {
		self.reason
	}

	/// Human-readable description.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Returns the validation failure behind a [`RejectReason::MalformedResponse`].
	pub fn validation_error(&self) -> Option<&ValidationError> {
		self.source.as_deref()?.downcast_ref::<ValidationError>()
	}
}

impl From<Panicked> for FormRejectError {
	fn from(panic: Panicked) -> Self {
		Self::internal(format!("crashed while handling form: {}", panic.message())).with_source(panic)
	}
}
