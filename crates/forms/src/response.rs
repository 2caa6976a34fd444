//! Reply payloads and typed form outcomes.

use crate::FormFuture;
use crate::error::FormRejectError;

/// Why the client dismissed a form without answering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
	/// The player closed the form.
	UserClosed,
	/// The client was busy showing something else.
	UserBusy,
}

impl CancelReason {
	/// All reasons, indexed by wire code.
	pub const ALL: [Self; 2] = [Self::UserClosed, Self::UserBusy];

	/// Decodes a wire cancel code.
	pub fn from_code(code: u8) -> Option<Self> {
		Self::ALL.get(usize::from(code)).copied()
	}

	/// Wire cancel code.
	pub const fn code(self) -> u8 {
		match self {
			Self::UserClosed => 0,
			Self::UserBusy => 1,
		}
	}
}

/// Typed value of one custom form slot.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
	/// Slot of a non-interactive element.
	Empty,
	/// Selected dropdown option.
	Choice(usize),
	/// Slider position.
	Number(f64),
	/// Text field content.
	Text(String),
	/// Toggle state.
	Flag(bool),
}

impl FieldValue {
	/// Returns the dropdown option, if this is one.
	pub fn as_choice(&self) -> Option<usize> {
		match self {
			Self::Choice(i) => Some(*i),
			_ => None,
		}
	}

	/// Returns the slider value, if this is one.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			_ => None,
		}
	}

	/// Returns the text, if this is one.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the toggle state, if this is one.
	pub fn as_flag(&self) -> Option<bool> {
		match self {
			Self::Flag(b) => Some(*b),
			_ => None,
		}
	}
}

/// Validated content of a completed form.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
	/// Index of the pressed button (action forms) or `0`/`1` for the first/second button of a
	/// message form.
	Selection(usize),
	/// One value per schema element of a custom form, in schema order.
	Values(Vec<FieldValue>),
}

/// Successful outcome of a form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormResponse {
	/// The client dismissed the form.
	Cancelled(CancelReason),
	/// The client submitted the form.
	Completed(Submission),
}

impl FormResponse {
	/// Returns true if the client dismissed the form.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled(_))
	}

	/// Returns the cancel reason of a dismissed form.
	pub fn cancel_reason(&self) -> Option<CancelReason> {
		match self {
			Self::Cancelled(reason) => Some(*reason),
			Self::Completed(_) => None,
		}
	}

	/// Returns the selected button of an action or message form.
	pub fn selection(&self) -> Option<usize> {
		match self {
			Self::Completed(Submission::Selection(i)) => Some(*i),
			_ => None,
		}
	}

	/// Returns the slot values of a custom form.
	pub fn values(&self) -> Option<&[FieldValue]> {
		match self {
			Self::Completed(Submission::Values(values)) => Some(values),
			_ => None,
		}
	}
}

/// Reply body as framed by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPayload {
	/// Raw form data text.
	Data(String),
	/// Raw cancel reason code.
	Cancelled(u8),
	/// Neither data nor a cancel reason was present.
	Empty,
}

/// Outcome of processing one reply, folded into the form's future.
#[derive(Debug)]
pub(crate) enum Response {
	Cancelled(CancelReason),
	Completed(Submission),
	Rejected(FormRejectError),
}

impl Response {
	/// Settles `future` with this outcome.
	pub fn settle(self, future: &FormFuture) -> bool {
		match self {
			Self::Cancelled(reason) => future.resolve(FormResponse::Cancelled(reason)),
			Self::Completed(submission) => future.resolve(FormResponse::Completed(submission)),
			Self::Rejected(error) => future.reject(error),
		}
	}
}
