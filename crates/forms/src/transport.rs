//! Boundary with the host's packet transport.

use std::sync::Arc;

use crate::id::RequestId;

/// Delivers form payloads to client sessions.
///
/// Implemented by the host. Calls are made from whichever thread issues a form and must not
/// block on the client's reply.
pub trait Transport<S>: Send + Sync {
	/// Sends a serialized form to `session`.
	///
	/// Returns `false` when the transport refuses delivery, e.g. because the session is gone.
	fn send(&self, session: &S, request_id: RequestId, payload: &str) -> bool;

	/// Drops `session` after it sent an unacceptable reply.
	fn disconnect(&self, session: &S, reason: &str) {
		let _ = (session, reason);
	}
}

impl<S, T> Transport<S> for Arc<T>
where
	T: Transport<S> + ?Sized,
{
	fn send(&self, session: &S, request_id: RequestId, payload: &str) -> bool {
		(**self).send(session, request_id, payload)
	}

	fn disconnect(&self, session: &S, reason: &str) {
		(**self).disconnect(session, reason);
	}
}
