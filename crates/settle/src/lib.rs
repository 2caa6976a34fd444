//! Single-resolution settlable future.
//!
//! [`Settlable`] is a shared result cell that starts pending and settles exactly once, either
//! fulfilled with a value or rejected with an error. Settling is first-writer-wins: any later
//! [`Settlable::resolve`] or [`Settlable::reject`] is a silent no-op, so racing code paths may
//! all try to settle the same cell without coordinating.
//!
//! Continuations are attached with [`Settlable::subscribe`] (or [`Settlable::catch`] and
//! [`Settlable::on_settle`]). They run synchronously when the cell is already settled, and
//! otherwise on whichever thread performs the settlement, in subscription order. Async code can
//! suspend on [`Settlable::wait`].
//!
//! ```
//! use serverui_settle::{Panicked, Settlable};
//!
//! #[derive(Debug, Clone)]
//! struct Failed(String);
//!
//! impl From<Panicked> for Failed {
//! 	fn from(p: Panicked) -> Self {
//! 		Failed(p.to_string())
//! 	}
//! }
//!
//! let cell: Settlable<u32, Failed> = Settlable::new();
//! let doubled = cell.subscribe(|v| Ok::<_, Failed>(v * 2), |e| Err(Failed(e.0.clone())));
//!
//! assert!(cell.resolve(21));
//! assert!(!cell.reject(Failed("late".into())));
//! assert_eq!(doubled.outcome().map(|r| r.ok()), Some(Some(42)));
//! ```

#![warn(missing_docs)]

mod panic;

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

pub use panic::Panicked;

type Observer<T, E> = Box<dyn FnOnce(Result<&T, &E>) + Send + 'static>;
type Outcome<T, E> = Result<Arc<T>, Arc<E>>;

enum State<T, E> {
	Pending(Vec<Observer<T, E>>),
	Settled(Outcome<T, E>),
}

struct Inner<T, E> {
	state: Mutex<State<T, E>>,
}

/// Shared handle to a single-resolution result cell.
///
/// Cloning the handle shares the cell; every clone observes the same settlement.
pub struct Settlable<T, E> {
	inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for Settlable<T, E> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T, E> Default for Settlable<T, E>
where
	T: Send + Sync + 'static,
	E: Send + Sync + 'static,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<T, E> fmt::Debug for Settlable<T, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = match &*self.inner.state.lock() {
			State::Pending(observers) => format!("pending({} observers)", observers.len()),
			State::Settled(Ok(_)) => "fulfilled".to_string(),
			State::Settled(Err(_)) => "rejected".to_string(),
		};
		f.debug_struct("Settlable").field("state", &state).finish()
	}
}

impl<T, E> Settlable<T, E>
where
	T: Send + Sync + 'static,
	E: Send + Sync + 'static,
{
	/// Creates a pending cell.
	#[must_use]
	pub fn new() -> Self {
		Self::with_state(State::Pending(Vec::new()))
	}

	/// Creates a cell that is already fulfilled with `value`.
	#[must_use]
	pub fn fulfilled(value: T) -> Self {
		Self::with_state(State::Settled(Ok(Arc::new(value))))
	}

	/// Creates a cell that is already rejected with `error`.
	#[must_use]
	pub fn rejected(error: E) -> Self {
		Self::with_state(State::Settled(Err(Arc::new(error))))
	}

	fn with_state(state: State<T, E>) -> Self {
		Self {
			inner: Arc::new(Inner {
				state: Mutex::new(state),
			}),
		}
	}

	/// Fulfils the cell with `value`.
	///
	/// Returns `true` if this call settled the cell, `false` if it was already settled (in which
	/// case `value` is dropped and nothing changes).
	pub fn resolve(&self, value: T) -> bool {
		self.settle(Ok(Arc::new(value)))
	}

	/// Rejects the cell with `error`.
	///
	/// Returns `true` if this call settled the cell, `false` if it was already settled.
	pub fn reject(&self, error: E) -> bool {
		self.settle(Err(Arc::new(error)))
	}

	fn settle(&self, outcome: Outcome<T, E>) -> bool {
		let observers = {
			let mut state = self.inner.state.lock();
			match &mut *state {
				State::Pending(observers) => {
					let observers = std::mem::take(observers);
					*state = State::Settled(outcome.clone());
					observers
				}
				State::Settled(_) => return false,
			}
		};
		run_observers(observers, &outcome);
		true
	}

	/// Registers a raw observer of the settlement.
	///
	/// Runs immediately if the cell is already settled. A panicking observer is logged and does
	/// not prevent the remaining observers from running.
	pub fn on_settle<F>(&self, observer: F)
	where
		F: FnOnce(Result<&T, &E>) + Send + 'static,
	{
		let settled = {
			let mut state = self.inner.state.lock();
			match &mut *state {
				State::Pending(observers) => {
					observers.push(Box::new(observer));
					return;
				}
				State::Settled(outcome) => outcome.clone(),
			}
		};
		let observer: Observer<T, E> = Box::new(observer);
		run_observers(vec![observer], &settled);
	}

	/// Chains continuations and returns a future for their outcome.
	///
	/// `on_fulfilled` or `on_rejected` runs once the cell settles (immediately if it already
	/// has). `Ok` fulfils the derived cell and `Err` rejects it. A continuation that panics
	/// rejects the derived cell with [`Panicked`] instead of unwinding into the caller.
	pub fn subscribe<U, E2, F, R>(&self, on_fulfilled: F, on_rejected: R) -> Settlable<U, E2>
	where
		U: Send + Sync + 'static,
		E2: From<Panicked> + Send + Sync + 'static,
		F: FnOnce(&T) -> Result<U, E2> + Send + 'static,
		R: FnOnce(&E) -> Result<U, E2> + Send + 'static,
	{
		let derived = Settlable::new();
		let target = derived.clone();
		self.on_settle(move |outcome| {
			let result = catch_unwind(AssertUnwindSafe(move || match outcome {
				Ok(value) => on_fulfilled(value),
				Err(error) => on_rejected(error),
			}));
			match result {
				Ok(Ok(value)) => {
					target.resolve(value);
				}
				Ok(Err(error)) => {
					target.reject(error);
				}
				Err(payload) => {
					target.reject(E2::from(Panicked::from_payload(payload)));
				}
			}
		});
		derived
	}

	/// Chains a rejection handler, passing a fulfilled value through unchanged.
	pub fn catch<E2, R>(&self, on_rejected: R) -> Settlable<T, E2>
	where
		T: Clone,
		E2: From<Panicked> + Send + Sync + 'static,
		R: FnOnce(&E) -> Result<T, E2> + Send + 'static,
	{
		self.subscribe(|value| Ok(value.clone()), on_rejected)
	}

	/// Suspends until the cell settles and returns a copy of the outcome.
	pub async fn wait(&self) -> Result<T, E>
	where
		T: Clone,
		E: Clone,
	{
		let (tx, rx) = oneshot::channel();
		self.on_settle(move |outcome| {
			let _ = tx.send(outcome.map(T::clone).map_err(E::clone));
		});
		match rx.await {
			Ok(outcome) => outcome,
			// The observer is held by the cell, which `&self` keeps alive.
			Err(_) => std::future::pending().await,
		}
	}

	/// Returns a copy of the outcome, or `None` while pending.
	pub fn outcome(&self) -> Option<Result<T, E>>
	where
		T: Clone,
		E: Clone,
	{
		match &*self.inner.state.lock() {
			State::Pending(_) => None,
			State::Settled(Ok(value)) => Some(Ok(T::clone(value))),
			State::Settled(Err(error)) => Some(Err(E::clone(error))),
		}
	}

	/// Returns true while the cell has not settled.
	pub fn is_pending(&self) -> bool {
		matches!(*self.inner.state.lock(), State::Pending(_))
	}

	/// Returns true if the cell settled as fulfilled.
	pub fn is_fulfilled(&self) -> bool {
		matches!(*self.inner.state.lock(), State::Settled(Ok(_)))
	}

	/// Returns true if the cell settled as rejected.
	pub fn is_rejected(&self) -> bool {
		matches!(*self.inner.state.lock(), State::Settled(Err(_)))
	}
}

fn run_observers<T, E>(observers: Vec<Observer<T, E>>, outcome: &Outcome<T, E>) {
	let borrowed = match outcome {
		Ok(value) => Ok(&**value),
		Err(error) => Err(&**error),
	};
	for observer in observers {
		if let Err(payload) = catch_unwind(AssertUnwindSafe(|| observer(borrowed))) {
			let panic = Panicked::from_payload(payload);
			tracing::error!(error = %panic, "settle.observer.panicked");
		}
	}
}
