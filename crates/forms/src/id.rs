use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Key identifying a connected client session.
///
/// Sessions are owned by the host; the registry only hashes and compares them.
pub trait SessionKey: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {}

impl<T> SessionKey for T where T: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {}

/// Per-session form identifier stamped into the outgoing payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u32);

impl fmt::Display for RequestId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl From<u32> for RequestId {
	fn from(id: u32) -> Self {
		Self(id)
	}
}

/// Sequential id generator; wraps on overflow.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CounterIdGen(u32);

impl CounterIdGen {
	/// Returns the next id and advances the counter.
	pub fn next(&mut self) -> RequestId {
		let id = self.0;
		self.0 = self.0.wrapping_add(1);
		RequestId(id)
	}
}
