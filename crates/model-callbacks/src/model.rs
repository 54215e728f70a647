//! # CallbackModel Trait
//!
//! The contract an owning type implements to run its lifecycle chains.
//!
//! An implementor points at its process-wide [`Callbacks`] registry (usually a
//! [`SharedCallbacks`](crate::SharedCallbacks) static) and receives
//! [`run_callbacks`](CallbackModel::run_callbacks) as a provided method. This is
//! the explicit replacement for a class-level chain shared by all instances: the
//! registry is built once and every instance reads the same one.

use crate::callbacks::Callbacks;
use crate::error::CallbackError;
use crate::kind::Outcome;

/// A plain data object with lifecycle callbacks.
///
/// ```rust
/// use model_callbacks::{CallbackError, CallbackModel, Callbacks, Flow, Outcome, SharedCallbacks};
///
/// #[derive(Default)]
/// struct Person { frozen: bool, saved: bool }
///
/// static PERSON_CALLBACKS: SharedCallbacks<Person, CallbackError> = SharedCallbacks::new();
///
/// impl CallbackModel for Person {
///     type Error = CallbackError;
///
///     fn callbacks() -> Result<&'static Callbacks<Self, Self::Error>, CallbackError> {
///         PERSON_CALLBACKS.get_or_build(|callbacks| {
///             callbacks.define_model_callbacks(&["save"])?;
///             callbacks.before("save", "check_frozen", |p: &mut Person| {
///                 Ok(if p.frozen { Flow::Abort } else { Flow::Continue })
///             })
///         })
///     }
/// }
///
/// let mut person = Person::default();
/// let outcome = person.run_callbacks("save", |p| { p.saved = true; Ok(()) }).unwrap();
/// assert_eq!(outcome, Outcome::Completed(()));
///
/// let mut frozen = Person { frozen: true, ..Person::default() };
/// assert!(frozen.run_callbacks("save", |p| { p.saved = true; Ok(()) }).unwrap().is_aborted());
/// assert!(!frozen.saved);
/// ```
pub trait CallbackModel: Sized + 'static {
    /// Error raised by hooks and units of work. Configuration errors lift into it.
    type Error: From<CallbackError>;

    /// The registry shared by every instance of this type.
    fn callbacks() -> Result<&'static Callbacks<Self, Self::Error>, CallbackError>;

    /// Runs the `event` chain around `unit` on this instance.
    fn run_callbacks<R, U>(&mut self, event: &str, unit: U) -> Result<Outcome<R>, Self::Error>
    where
        U: FnOnce(&mut Self) -> Result<R, Self::Error>,
    {
        Self::callbacks()?.run(event, self, unit)
    }
}
