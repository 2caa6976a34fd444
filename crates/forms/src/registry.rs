//! Per-session registry of in-flight forms.
//!
//! Every issued form owns one entry keyed by `(session, request id)` until exactly one of the
//! terminating events takes it: a reply, the end of the session, an internal failure, or an
//! explicit rejection by the host. Taking an entry out of the table is the only way to settle
//! its future, so whichever event removes it first decides the outcome and every later event
//! for the same key finds nothing and does nothing.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use parking_lot::Mutex;
use serverui_settle::Panicked;
use tracing::{debug, error, warn};

use crate::FormFuture;
use crate::config::EngineConfig;
use crate::error::FormRejectError;
use crate::id::{CounterIdGen, RequestId, SessionKey};
use crate::response::{CancelReason, ReplyPayload, Response};
use crate::schema::Schema;
use crate::validate::{self, ValidationError};

/// How a delivered reply settled its form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delivery {
	/// The client dismissed the form.
	Cancelled,
	/// The reply passed validation.
	Completed,
	/// The reply failed validation.
	Malformed,
	/// The reply could not be processed.
	Failed,
}

/// An issued form awaiting its outcome.
struct PendingRequest {
	schema: Schema,
	future: FormFuture,
}

/// Forms of one session.
#[derive(Default)]
struct SessionForms {
	ids: CounterIdGen,
	pending: HashMap<RequestId, PendingRequest>,
}

impl SessionForms {
	/// Returns the next id not held by a pending form.
	fn allocate(&mut self) -> RequestId {
		loop {
			let id = self.ids.next();
			if !self.pending.contains_key(&id) {
				return id;
			}
		}
	}
}

/// Registry of in-flight forms for every session.
///
/// Thread-safe; share it behind an `Arc` or inside a [`crate::FormEngine`]. Futures are always
/// settled after the table lock is released, so continuations may call back into the registry.
pub struct RequestRegistry<S> {
	sessions: Mutex<HashMap<S, SessionForms>>,
	max_reply_bytes: usize,
}

impl<S: SessionKey> Default for RequestRegistry<S> {
	fn default() -> Self {
		Self::new(&EngineConfig::default())
	}
}

impl<S: SessionKey> RequestRegistry<S> {
	/// Creates an empty registry using the reply limits of `config`.
	pub fn new(config: &EngineConfig) -> Self {
		Self {
			sessions: Mutex::new(HashMap::new()),
			max_reply_bytes: config.max_reply_bytes,
		}
	}

	/// Registers a new pending form for `session`.
	///
	/// Returns the id to stamp into the outgoing payload and the future the caller awaits.
	pub fn issue(&self, session: &S, schema: Schema) -> (RequestId, FormFuture) {
		let future = FormFuture::new();
		let id = {
			let mut sessions = self.sessions.lock();
			let forms = sessions.entry(session.clone()).or_default();
			let id = forms.allocate();
			forms.pending.insert(
				id,
				PendingRequest {
					schema,
					future: future.clone(),
				},
			);
			id
		};
		debug!(session = ?session, request_id = %id, "forms.issue");
		(id, future)
	}

	/// Removes the pending form, if any, in the same step that decides who settles it.
	fn take(&self, session: &S, id: RequestId) -> Option<PendingRequest> {
		self.sessions.lock().get_mut(session)?.pending.remove(&id)
	}

	/// Routes a reply to its pending form.
	///
	/// Unknown or already settled ids are ignored and yield `None`; duplicate and late packets
	/// are expected. Otherwise the reply is validated against the form's schema and the future
	/// is settled. Never panics: failures while processing become rejections.
	pub fn deliver_reply(&self, session: &S, id: RequestId, payload: ReplyPayload) -> Option<Delivery> {
		let Some(entry) = self.take(session, id) else {
			debug!(session = ?session, request_id = %id, "forms.reply.unknown");
			return None;
		};

		let response = catch_unwind(AssertUnwindSafe(|| {
			interpret(&entry.schema, payload, self.max_reply_bytes)
		}))
		.unwrap_or_else(|panic| Response::Rejected(FormRejectError::from(Panicked::from_payload(panic))));

		let delivery = match &response {
			Response::Cancelled(_) => Delivery::Cancelled,
			Response::Completed(_) => Delivery::Completed,
			Response::Rejected(err) if err.validation_error().is_some() => {
				warn!(session = ?session, request_id = %id, error = %err, "forms.reply.malformed");
				Delivery::Malformed
			}
			Response::Rejected(err) => {
				error!(session = ?session, request_id = %id, error = %err, "forms.reply.failed");
				Delivery::Failed
			}
		};
		response.settle(&entry.future);
		Some(delivery)
	}

	/// Rejects every pending form of `session` and forgets the session.
	///
	/// Returns the number of forms swept; a repeated call returns `0`.
	pub fn deliver_session_termination(&self, session: &S) -> usize {
		let Some(forms) = self.sessions.lock().remove(session) else {
			return 0;
		};
		let swept = forms.pending.len();
		for (id, entry) in forms.pending {
			entry.future.reject(FormRejectError::session_ended(format!(
				"session {session:?} ended before responding to form {id}"
			)));
		}
		if swept > 0 {
			debug!(session = ?session, swept, "forms.session.swept");
		}
		swept
	}

	/// Rejects a pending form after a failure detected outside the registry.
	///
	/// Returns `false` if the form was no longer pending.
	pub fn deliver_internal_failure(
		&self,
		session: &S,
		id: RequestId,
		cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
	) -> bool {
		let cause = cause.into();
		let message = format!("crashed when handling form {id}: {cause}");
		error!(session = ?session, request_id = %id, error = %cause, "forms.internal_failure");
		self.cancel(session, id, FormRejectError::internal(message).with_source(cause))
	}

	/// Takes a pending form out and rejects it with `error`, e.g. on a host-side timeout.
	///
	/// Returns `false` if the form was no longer pending.
	pub fn cancel(&self, session: &S, id: RequestId, error: FormRejectError) -> bool {
		match self.take(session, id) {
			Some(entry) => entry.future.reject(error),
			None => false,
		}
	}

	/// Returns true if the form is still awaiting its outcome.
	pub fn is_pending(&self, session: &S, id: RequestId) -> bool {
		self.sessions
			.lock()
			.get(session)
			.is_some_and(|forms| forms.pending.contains_key(&id))
	}

	/// Number of pending forms of `session`.
	pub fn pending_count(&self, session: &S) -> usize {
		self.sessions
			.lock()
			.get(session)
			.map_or(0, |forms| forms.pending.len())
	}

	/// Number of pending forms across all sessions.
	pub fn total_pending(&self) -> usize {
		self.sessions
			.lock()
			.values()
			.map(|forms| forms.pending.len())
			.sum()
	}
}

/// Turns a reply payload into the outcome of the form it answers.
fn interpret(schema: &Schema, payload: ReplyPayload, max_reply_bytes: usize) -> Response {
	let validated = match payload {
		ReplyPayload::Cancelled(code) => CancelReason::from_code(code)
			.map(Response::Cancelled)
			.ok_or(ValidationError::UnknownCancelReason(code)),
		ReplyPayload::Data(raw) => check_data(&raw, max_reply_bytes)
			.and_then(|data| validate::validate(schema, data))
			.map(Response::Completed),
		ReplyPayload::Empty => {
			return Response::Rejected(FormRejectError::internal(
				"expected either form data or a cancel reason in the reply",
			));
		}
	};
	validated.unwrap_or_else(|err| Response::Rejected(FormRejectError::malformed(err)))
}

fn check_data(raw: &str, limit: usize) -> validate::Result<&str> {
	if raw.len() > limit {
		return Err(ValidationError::ReplyTooLarge { len: raw.len(), limit });
	}
	let data = raw.trim();
	if data.is_empty() || data == "null" {
		return Err(ValidationError::EmptyReply);
	}
	Ok(data)
}
