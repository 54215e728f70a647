//! # Callback Errors
//!
//! Structural misuse of a callback registry is reported through
//! [`CallbackError`]. These are programmer errors: they are surfaced
//! immediately and never retried.
//!
//! An abort requested by a hook is **not** an error. It travels as
//! [`Flow::Abort`](crate::Flow::Abort) and ends up as
//! [`Outcome::Aborted`](crate::Outcome::Aborted).

use crate::hook::HookId;
use crate::kind::HookKind;

/// Configuration errors raised by [`Callbacks`](crate::Callbacks).
///
/// Model error types usually wrap this with `#[from]` so `?` lifts it into
/// the model's own error enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallbackError {
    /// Event names must be non-empty and may not end in `!`, `?` or `=`.
    #[error("Invalid callback event name: {0:?}")]
    InvalidEventName(String),

    /// The event was never defined on this registry.
    #[error("Undefined callback event: {0}")]
    UndefinedEvent(String),

    /// The event exists but was defined without this hook kind.
    #[error("{kind} callbacks are not enabled for event {event}")]
    KindNotEnabled { event: String, kind: HookKind },

    /// No hook with this identity is registered under (event, kind).
    #[error("No {kind} callback {hook} registered for event {event}")]
    UnknownHook {
        event: String,
        kind: HookKind,
        hook: HookId,
    },
}

impl CallbackError {
    pub(crate) fn undefined(event: &str) -> Self {
        CallbackError::UndefinedEvent(event.to_string())
    }
}
