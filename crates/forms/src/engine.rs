//! Host-facing engine binding the registry to a transport.

use std::panic::{AssertUnwindSafe, catch_unwind};

use serverui_settle::Panicked;
use tracing::{error, warn};

use crate::FormFuture;
use crate::config::EngineConfig;
use crate::error::FormRejectError;
use crate::form::FormRequest;
use crate::id::{RequestId, SessionKey};
use crate::registry::{Delivery, RequestRegistry};
use crate::response::ReplyPayload;
use crate::transport::Transport;

/// Form engine constructed once by the host.
///
/// Outbound, [`FormEngine::issue`] registers a form and hands its payload to the transport.
/// Inbound, the transport reports what happened through [`FormEngine::on_reply`],
/// [`FormEngine::on_session_end`] and [`FormEngine::on_internal_failure`]. None of these
/// return errors or panic; outcomes reach callers only through their [`FormFuture`].
pub struct FormEngine<S, T> {
	config: EngineConfig,
	registry: RequestRegistry<S>,
	transport: T,
}

impl<S, T> FormEngine<S, T>
where
	S: SessionKey,
	T: Transport<S>,
{
	/// Creates an engine with default configuration.
	pub fn new(transport: T) -> Self {
		Self::with_config(transport, EngineConfig::default())
	}

	/// Creates an engine with `config`.
	pub fn with_config(transport: T, config: EngineConfig) -> Self {
		Self {
			registry: RequestRegistry::new(&config),
			config,
			transport,
		}
	}

	/// Shows `request` to `session`.
	///
	/// Returns the id stamped into the payload and the future of the form's outcome. If the
	/// payload cannot be serialized or the transport refuses it or panics, the future is already
	/// rejected and nothing stays registered.
	pub fn issue(&self, session: &S, request: &FormRequest) -> (RequestId, FormFuture) {
		let (id, future) = self.registry.issue(session, request.schema().clone());
		let payload = match serde_json::to_string(request.payload()) {
			Ok(payload) => payload,
			Err(e) => {
				self.registry.cancel(
					session,
					id,
					FormRejectError::internal(format!("failed to serialize form {id}")).with_source(e),
				);
				return (id, future);
			}
		};
		match catch_unwind(AssertUnwindSafe(|| self.transport.send(session, id, &payload))) {
			Ok(true) => {}
			Ok(false) => {
				warn!(session = ?session, request_id = %id, "forms.transport.refused");
				self.registry.cancel(
					session,
					id,
					FormRejectError::internal(format!("transport refused to deliver form {id}")),
				);
			}
			Err(panic) => {
				let panic = Panicked::from_payload(panic);
				error!(session = ?session, request_id = %id, error = %panic, "forms.transport.panicked");
				self.registry.cancel(session, id, FormRejectError::from(panic));
			}
		}
		(id, future)
	}

	/// Reports a reply from `session` to form `id`.
	pub fn on_reply(&self, session: &S, id: RequestId, payload: ReplyPayload) {
		let delivery = self.registry.deliver_reply(session, id, payload);
		if delivery == Some(Delivery::Malformed) && self.config.kick_on_malformed {
			self.transport
				.disconnect(session, "sent a malformed form response");
		}
	}

	/// Reports that `session` ended; every form still pending on it is rejected.
	pub fn on_session_end(&self, session: &S) -> usize {
		self.registry.deliver_session_termination(session)
	}

	/// Reports a failure the transport hit while handling a packet for form `id`.
	pub fn on_internal_failure(
		&self,
		session: &S,
		id: RequestId,
		cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
	) -> bool {
		self.registry.deliver_internal_failure(session, id, cause)
	}

	/// Withdraws a pending form, e.g. when a host-side timeout expires.
	///
	/// A reply arriving later is ignored. Returns `false` if the form had already settled.
	pub fn cancel(&self, session: &S, id: RequestId, message: impl Into<String>) -> bool {
		self.registry
			.cancel(session, id, FormRejectError::withdrawn(message))
	}

	/// Engine configuration.
	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Underlying request registry.
	pub fn registry(&self) -> &RequestRegistry<S> {
		&self.registry
	}

	/// Underlying transport.
	pub fn transport(&self) -> &T {
		&self.transport
	}
}
