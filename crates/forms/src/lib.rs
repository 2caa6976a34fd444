//! Server-driven UI forms.
//!
//! A server pushes a form to a remote client and later receives exactly one outcome for it: the
//! client's reply, an explicit cancellation, the end of the client's session, or an internal
//! failure. This crate correlates those outcomes with the request that caused them:
//!
//! * [`form`]: builders assembling the wire payload together with the structural [`Schema`]
//!   used to check the reply.
//! * [`validate`]: pure reply validators, including the label reconciliation that absorbs the
//!   two reply layouts clients have used for custom forms.
//! * [`registry::RequestRegistry`]: per-session table of in-flight forms with exactly-once
//!   settlement.
//! * [`FormEngine`]: the instance a host constructs once, binding the registry to a
//!   [`Transport`].
//!
//! Callers receive a [`FormFuture`] per issued form. Every failure reaches them through its
//! rejection path as a [`FormRejectError`].

#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod form;
mod id;
pub mod registry;
pub mod response;
pub mod schema;
pub mod transport;
pub mod validate;

pub use config::{ConfigError, EngineConfig};
pub use engine::FormEngine;
pub use error::{FormRejectError, RejectReason};
pub use form::{
	ActionForm, BuildError, ButtonIcon, Dropdown, FormRequest, MessageForm, ModalForm, Slider, TextField, Toggle,
};
pub use id::{RequestId, SessionKey};
pub use registry::{Delivery, RequestRegistry};
pub use response::{CancelReason, FieldValue, FormResponse, ReplyPayload, Submission};
pub use schema::{Element, FormKind, Schema};
pub use serverui_settle::{Panicked, Settlable};
pub use transport::Transport;
pub use validate::ValidationError;

#[cfg(test)]
use {tokio as _, tracing_subscriber as _};

/// Future handed to callers for one issued form.
pub type FormFuture = Settlable<FormResponse, FormRejectError>;
